use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dynamo_dispatch_core::attribute::AttributeValue;
use dynamo_dispatch_core::contract::{AttributeValueUpdate, Item, QueryParams, ScanParams};

use crate::adapters::item_store::{ItemStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreCall {
    Put { table_name: String, item: Item },
    Update { table_name: String, key: Item },
    Delete { table_name: String, key: Item },
    Scan { table_name: String },
    Query { table_name: String },
}

/// Records every call and answers reads with canned items.
pub(crate) struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    items: Vec<Item>,
    fail_put_at: Option<usize>,
    failure: Option<StoreError>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            items: Vec::new(),
            fail_put_at: None,
            failure: None,
        }
    }

    pub(crate) fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Fails the `attempt`-th put (1-indexed) with `error`.
    pub(crate) fn failing_put_at(mut self, attempt: usize, error: StoreError) -> Self {
        self.fail_put_at = Some(attempt);
        self.failure = Some(error);
        self
    }

    /// Fails every non-put call with `error`.
    pub(crate) fn failing_with(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    fn read_failure(&self) -> Result<(), StoreError> {
        match (&self.failure, self.fail_put_at) {
            (Some(error), None) => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ItemStore for RecordingStore {
    async fn put_item(&self, table_name: &str, item: &Item) -> Result<(), StoreError> {
        self.record(StoreCall::Put {
            table_name: table_name.to_string(),
            item: item.clone(),
        });
        let attempt = self
            .calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Put { .. }))
            .count();
        match (self.fail_put_at, &self.failure) {
            (Some(fail_at), Some(error)) if fail_at == attempt => Err(error.clone()),
            _ => Ok(()),
        }
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &Item,
        _attribute_updates: &BTreeMap<String, AttributeValueUpdate>,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::Update {
            table_name: table_name.to_string(),
            key: key.clone(),
        });
        self.read_failure()
    }

    async fn delete_item(&self, table_name: &str, key: &Item) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            table_name: table_name.to_string(),
            key: key.clone(),
        });
        self.read_failure()
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>, StoreError> {
        self.record(StoreCall::Scan {
            table_name: params.table_name.clone(),
        });
        self.read_failure()?;
        Ok(self.items.clone())
    }

    async fn query(&self, params: &QueryParams) -> Result<Vec<Item>, StoreError> {
        self.record(StoreCall::Query {
            table_name: params.table_name.clone(),
        });
        self.read_failure()?;
        Ok(self.items.clone())
    }
}

pub(crate) fn item(pairs: &[(&str, &str)]) -> Item {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value.to_string())))
        .collect()
}
