use serde_json::{Map, Value};

use crate::contract::Item;

/// One JSON object per item, in the order the store returned them.
pub fn render_query_items(items: &[Item]) -> Value {
    Value::Array(items.iter().map(item_to_json).collect())
}

/// Every attribute value of every item as text, keys discarded.
pub fn render_scan_items(items: &[Item]) -> Value {
    Value::Array(
        items
            .iter()
            .flat_map(|item| item.values())
            .map(|value| Value::String(value.render_text()))
            .collect(),
    )
}

pub fn item_to_json(item: &Item) -> Value {
    let mut object = Map::with_capacity(item.len());
    for (name, value) in item {
        object.insert(name.clone(), value.to_json());
    }
    Value::Object(object)
}
