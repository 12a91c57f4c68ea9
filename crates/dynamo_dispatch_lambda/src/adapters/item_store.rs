use std::collections::BTreeMap;

use async_trait::async_trait;
use dynamo_dispatch_core::contract::{AttributeValueUpdate, Item, QueryParams, ScanParams};
use dynamo_dispatch_core::outcome::DispatchError;

/// Failure reported by the store for a single call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(error: StoreError) -> Self {
        DispatchError::Store {
            code: error.code,
            message: error.message,
        }
    }
}

/// The five store primitives the handlers are built on.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn put_item(&self, table_name: &str, item: &Item) -> Result<(), StoreError>;

    async fn update_item(
        &self,
        table_name: &str,
        key: &Item,
        attribute_updates: &BTreeMap<String, AttributeValueUpdate>,
    ) -> Result<(), StoreError>;

    async fn delete_item(&self, table_name: &str, key: &Item) -> Result<(), StoreError>;

    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>, StoreError>;

    /// Queries with every attribute selected.
    async fn query(&self, params: &QueryParams) -> Result<Vec<Item>, StoreError>;
}
