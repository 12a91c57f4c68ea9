//! AWS-oriented adapters and handlers for the DynamoDB dispatch Lambda.
//!
//! This crate owns runtime integration details (the API Gateway event
//! boundary, the operation handlers, the DynamoDB-backed item store,
//! configuration and telemetry). Request contracts and rendering live in
//! `dynamo_dispatch_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
