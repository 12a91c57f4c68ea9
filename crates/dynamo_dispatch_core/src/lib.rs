//! Shared dispatch domain primitives.
//!
//! This crate owns the request envelope, the attribute value model, the typed
//! outcome of an operation and its rendering to response text. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod attribute;
pub mod contract;
pub mod outcome;
pub mod render;
