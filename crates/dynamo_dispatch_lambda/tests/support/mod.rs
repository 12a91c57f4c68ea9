use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use dynamo_dispatch_core::attribute::AttributeValue;
use dynamo_dispatch_core::contract::{
    AttributeAction, AttributeValueUpdate, Item, QueryParams, ScanParams,
};
use dynamo_dispatch_lambda::adapters::item_store::{ItemStore, StoreError};

/// Table-per-name store keyed on the `id` attribute. With a put budget set,
/// puts beyond it fail with a validation error.
#[derive(Default)]
pub struct MemoryItemStore {
    tables: Mutex<HashMap<String, BTreeMap<String, Item>>>,
    put_budget: Mutex<Option<usize>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_puts_after(self, successful_puts: usize) -> Self {
        *self.put_budget.lock().expect("poisoned mutex") = Some(successful_puts);
        self
    }

    pub fn table(&self, table_name: &str) -> Vec<Item> {
        self.tables
            .lock()
            .expect("poisoned mutex")
            .get(table_name)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    fn rows(&self, table_name: &str) -> Result<Vec<Item>, StoreError> {
        self.tables
            .lock()
            .expect("poisoned mutex")
            .get(table_name)
            .map(|rows| rows.values().cloned().collect())
            .ok_or_else(|| {
                StoreError::with_code("ResourceNotFoundException", "Requested resource not found")
            })
    }
}

fn key_of(item: &Item) -> Result<String, StoreError> {
    match item.get("id") {
        Some(AttributeValue::S(id)) => Ok(id.clone()),
        _ => Err(StoreError::with_code(
            "ValidationException",
            "One of the required keys was not given a value",
        )),
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn put_item(&self, table_name: &str, item: &Item) -> Result<(), StoreError> {
        {
            let mut budget = self.put_budget.lock().expect("poisoned mutex");
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(StoreError::with_code(
                        "ValidationException",
                        "Item size has exceeded the maximum allowed size",
                    ));
                }
                *remaining -= 1;
            }
        }

        let key = key_of(item)?;
        self.tables
            .lock()
            .expect("poisoned mutex")
            .entry(table_name.to_string())
            .or_default()
            .insert(key, item.clone());
        Ok(())
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &Item,
        attribute_updates: &BTreeMap<String, AttributeValueUpdate>,
    ) -> Result<(), StoreError> {
        let id = key_of(key)?;
        let mut tables = self.tables.lock().expect("poisoned mutex");
        let row = tables
            .entry(table_name.to_string())
            .or_default()
            .entry(id)
            .or_insert_with(|| key.clone());

        for (name, update) in attribute_updates {
            match (update.action.unwrap_or(AttributeAction::Put), &update.value) {
                (AttributeAction::Delete, _) => {
                    row.remove(name);
                }
                (_, Some(value)) => {
                    row.insert(name.clone(), value.clone());
                }
                (_, None) => {}
            }
        }
        Ok(())
    }

    async fn delete_item(&self, table_name: &str, key: &Item) -> Result<(), StoreError> {
        let id = key_of(key)?;
        if let Some(rows) = self.tables.lock().expect("poisoned mutex").get_mut(table_name) {
            rows.remove(&id);
        }
        Ok(())
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>, StoreError> {
        self.rows(&params.table_name)
    }

    async fn query(&self, params: &QueryParams) -> Result<Vec<Item>, StoreError> {
        // Only `id = :id` conditions are understood.
        let wanted = params
            .expression_attribute_values
            .as_ref()
            .and_then(|values| values.get(":id"))
            .cloned();
        Ok(self
            .rows(&params.table_name)?
            .into_iter()
            .filter(|row| wanted.is_none() || row.get("id") == wanted.as_ref())
            .collect())
    }
}
