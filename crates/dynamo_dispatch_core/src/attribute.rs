use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A typed attribute value in DynamoDB JSON form, e.g. `{"S": "text"}` or
/// `{"N": "42"}`. Binary payloads travel as base64 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S", alias = "s")]
    S(String),
    #[serde(rename = "N", alias = "n")]
    N(String),
    #[serde(rename = "B", alias = "b", with = "base64_bytes")]
    B(Vec<u8>),
    #[serde(rename = "SS", alias = "ss")]
    Ss(Vec<String>),
    #[serde(rename = "NS", alias = "ns")]
    Ns(Vec<String>),
    #[serde(rename = "BS", alias = "bs", with = "base64_bytes_list")]
    Bs(Vec<Vec<u8>>),
    #[serde(rename = "M", alias = "m")]
    M(BTreeMap<String, AttributeValue>),
    #[serde(rename = "L", alias = "l")]
    L(Vec<AttributeValue>),
    #[serde(rename = "BOOL", alias = "bool", alias = "Bool")]
    Bool(bool),
    #[serde(rename = "NULL", alias = "null", alias = "Null")]
    Null(bool),
}

impl AttributeValue {
    /// Natural JSON form of the value, without the type tag.
    pub fn to_json(&self) -> Value {
        match self {
            Self::S(text) => Value::String(text.clone()),
            Self::N(number) => number_json(number),
            Self::B(bytes) => Value::String(STANDARD.encode(bytes)),
            Self::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
            Self::Ns(values) => {
                Value::Array(values.iter().map(|value| number_json(value)).collect())
            }
            Self::Bs(values) => Value::Array(
                values
                    .iter()
                    .map(|bytes| Value::String(STANDARD.encode(bytes)))
                    .collect(),
            ),
            Self::M(map) => Value::Object(
                map.iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            Self::L(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Null(_) => Value::Null,
        }
    }

    /// Text form used where only a string fits. Strings stay verbatim,
    /// everything else becomes compact JSON text.
    pub fn render_text(&self) -> String {
        match self {
            Self::S(text) => text.clone(),
            other => other.to_json().to_string(),
        }
    }
}

// Numbers that would not survive a trip through serde_json (precision,
// exponent or trailing zeros) stay strings.
fn number_json(text: &str) -> Value {
    match text.parse::<Number>() {
        Ok(number) if number.to_string() == text => Value::Number(number),
        _ => Value::String(text.to_string()),
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(|error| serde::de::Error::custom(format!("invalid base64 binary: {error}")))
    }
}

mod base64_bytes_list {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|bytes| STANDARD.encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|text| {
                STANDARD.decode(text.as_bytes()).map_err(|error| {
                    serde::de::Error::custom(format!("invalid base64 binary: {error}"))
                })
            })
            .collect()
    }
}
