use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::AttributeValue;
use crate::outcome::DispatchError;

/// One stored item, keyed by attribute name. Ordered so that every rendering
/// of an item walks its attributes in the same order.
pub type Item = BTreeMap<String, AttributeValue>;

/// Placeholder (`:value`) to attribute value bindings for expressions.
pub type ExpressionValues = BTreeMap<String, AttributeValue>;

/// Placeholder (`#name`) to attribute name bindings for expressions.
pub type ExpressionNames = BTreeMap<String, String>;

/// Inbound request body. Only `action` is read up front; each parameter
/// section stays raw until [`Envelope::into_params`] parses the one the
/// action names, so the other sections are never looked at.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub add: Option<Value>,
    #[serde(default)]
    pub update: Option<Value>,
    #[serde(default)]
    pub delete: Option<Value>,
    #[serde(default)]
    pub scan: Option<Value>,
    #[serde(default)]
    pub query: Option<Value>,
}

/// Accepted key spellings, matched ignoring ASCII case, and the field each
/// one lands in.
type FieldSpellings = &'static [(&'static str, &'static str)];

const ENVELOPE_FIELDS: FieldSpellings = &[
    ("action", "action"),
    ("add", "add"),
    ("update", "update"),
    ("delete", "delete"),
    ("scan", "scan"),
    ("query", "query"),
];

const ADD_FIELDS: FieldSpellings = &[
    ("tableName", "tableName"),
    ("items", "items"),
    ("item", "items"),
];

const UPDATE_FIELDS: FieldSpellings = &[
    ("tableName", "tableName"),
    ("key", "key"),
    ("tableKey", "key"),
    ("attributeUpdates", "attributeUpdates"),
    ("item", "attributeUpdates"),
];

const DELETE_FIELDS: FieldSpellings = &[("tableName", "tableName"), ("key", "key")];

const SCAN_FIELDS: FieldSpellings = &[
    ("tableName", "tableName"),
    ("projectionExpression", "projectionExpression"),
    ("filterExpression", "filterExpression"),
    ("expressionAttributeValues", "expressionAttributeValues"),
    ("expressionAttributeNames", "expressionAttributeNames"),
    ("indexName", "indexName"),
];

const QUERY_FIELDS: FieldSpellings = &[
    ("tableName", "tableName"),
    ("keyConditionExpression", "keyConditionExpression"),
    ("expressionAttributeValues", "expressionAttributeValues"),
    ("expressionAttributeNames", "expressionAttributeNames"),
    ("indexName", "indexName"),
];

const ATTRIBUTE_UPDATE_FIELDS: FieldSpellings = &[("action", "action"), ("value", "value")];

impl Envelope {
    /// Parses a request body. Envelope keys match in any letter case.
    pub fn from_json(raw: &str) -> Result<Self, DispatchError> {
        let value: Value = serde_json::from_str(raw).map_err(malformed)?;
        let envelope = canonical_keys(value, ENVELOPE_FIELDS);
        serde_json::from_value(envelope).map_err(malformed)
    }

    /// Resolves the action discriminator. Null, empty and whitespace-only
    /// actions are rejected; anything else maps onto [`Action`].
    pub fn action(&self) -> Result<Action, DispatchError> {
        match self.action.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(Action::parse(raw)),
            _ => Err(DispatchError::MissingAction),
        }
    }

    /// Parses the parameter section `action` names into `T`. Section keys
    /// match in any letter case, legacy spellings included.
    pub fn into_params<T: DeserializeOwned>(self, action: &Action) -> Result<T, DispatchError> {
        let (params, fields) = match action {
            Action::Add => (self.add, ADD_FIELDS),
            Action::Update => (self.update, UPDATE_FIELDS),
            Action::Delete => (self.delete, DELETE_FIELDS),
            Action::Scan => (self.scan, SCAN_FIELDS),
            Action::Query => (self.query, QUERY_FIELDS),
            Action::Unsupported(raw) => return Err(DispatchError::UnsupportedAction(raw.clone())),
        };
        let section = action.section().unwrap_or("params");
        let Some(params) = params else {
            return Err(DispatchError::MissingParameters {
                action: action.as_str().to_string(),
                section,
            });
        };

        let mut params = canonical_keys(params, fields);
        if let Some(Value::Object(updates)) = params.get_mut("attributeUpdates") {
            for update in updates.values_mut() {
                *update = canonical_keys(update.take(), ATTRIBUTE_UPDATE_FIELDS);
            }
        }

        serde_json::from_value(params).map_err(|error| {
            DispatchError::MalformedBody(format!("'{section}' parameters: {error}"))
        })
    }
}

fn malformed(error: serde_json::Error) -> DispatchError {
    DispatchError::MalformedBody(error.to_string())
}

/// Renames object keys matching a known spelling to their field name. Keys
/// that match nothing are kept as sent.
fn canonical_keys(value: Value, fields: FieldSpellings) -> Value {
    let Value::Object(object) = value else {
        return value;
    };

    Value::Object(
        object
            .into_iter()
            .map(|(key, value)| {
                let key = fields
                    .iter()
                    .find(|(spelling, _)| spelling.eq_ignore_ascii_case(&key))
                    .map_or(key, |(_, field)| field.to_string());
                (key, value)
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
    Scan,
    Query,
    Unsupported(String),
}

impl Action {
    /// Case-insensitive match against the five known verbs.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ADD" => Self::Add,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "SCAN" => Self::Scan,
            "QUERY" => Self::Query,
            _ => Self::Unsupported(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "ADD",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Scan => "SCAN",
            Self::Query => "QUERY",
            Self::Unsupported(raw) => raw,
        }
    }

    /// Envelope field that carries this action's parameters.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Self::Add => Some("add"),
            Self::Update => Some("update"),
            Self::Delete => Some("delete"),
            Self::Scan => Some("scan"),
            Self::Query => Some("query"),
            Self::Unsupported(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddParams {
    pub table_name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    pub table_name: String,
    pub key: Item,
    #[serde(default)]
    pub attribute_updates: BTreeMap<String, AttributeValueUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    pub table_name: String,
    #[serde(default)]
    pub key: Item,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanParams {
    pub table_name: String,
    #[serde(default)]
    pub projection_expression: Option<String>,
    #[serde(default)]
    pub filter_expression: Option<String>,
    #[serde(default)]
    pub expression_attribute_values: Option<ExpressionValues>,
    #[serde(default)]
    pub expression_attribute_names: Option<ExpressionNames>,
    #[serde(default)]
    pub index_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub table_name: String,
    #[serde(default)]
    pub key_condition_expression: Option<String>,
    #[serde(default)]
    pub expression_attribute_values: Option<ExpressionValues>,
    #[serde(default)]
    pub expression_attribute_names: Option<ExpressionNames>,
    #[serde(default)]
    pub index_name: Option<String>,
}

/// Per-attribute update action for the legacy `AttributeUpdates` parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueUpdate {
    #[serde(default)]
    pub action: Option<AttributeAction>,
    #[serde(default)]
    pub value: Option<AttributeValue>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttributeAction {
    #[serde(rename = "PUT", alias = "Put", alias = "put")]
    Put,
    #[serde(rename = "ADD", alias = "Add", alias = "add")]
    Add,
    #[serde(rename = "DELETE", alias = "Delete", alias = "delete")]
    Delete,
}
