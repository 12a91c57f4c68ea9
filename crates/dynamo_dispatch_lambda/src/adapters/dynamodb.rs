use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{
    AttributeAction as SdkAttributeAction, AttributeValue as SdkAttributeValue,
    AttributeValueUpdate as SdkAttributeValueUpdate, Select,
};
use dynamo_dispatch_core::attribute::AttributeValue;
use dynamo_dispatch_core::contract::{
    AttributeAction, AttributeValueUpdate, ExpressionNames, Item, QueryParams, ScanParams,
};

use crate::adapters::item_store::{ItemStore, StoreError};

/// [`ItemStore`] backed by the DynamoDB client. The client is cheap to clone
/// and is built once per process.
#[derive(Debug, Clone)]
pub struct DynamoDbItemStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoDbItemStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_dynamodb::Client::new(config))
    }
}

#[async_trait]
impl ItemStore for DynamoDbItemStore {
    async fn put_item(&self, table_name: &str, item: &Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(to_sdk_item(item)))
            .send()
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &Item,
        attribute_updates: &BTreeMap<String, AttributeValueUpdate>,
    ) -> Result<(), StoreError> {
        let updates = attribute_updates
            .iter()
            .map(|(name, update)| (name.clone(), to_sdk_update(update)))
            .collect::<HashMap<_, _>>();

        self.client
            .update_item()
            .table_name(table_name)
            .set_key(Some(to_sdk_item(key)))
            .set_attribute_updates(Some(updates).filter(|updates| !updates.is_empty()))
            .send()
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn delete_item(&self, table_name: &str, key: &Item) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(to_sdk_item(key)))
            .send()
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(&params.table_name)
            .set_index_name(params.index_name.clone())
            .set_projection_expression(params.projection_expression.clone())
            .set_filter_expression(params.filter_expression.clone())
            .set_expression_attribute_values(
                params.expression_attribute_values.as_ref().map(to_sdk_item),
            )
            .set_expression_attribute_names(
                params.expression_attribute_names.as_ref().map(to_sdk_names),
            )
            .send()
            .await
            .map_err(store_error)?;

        from_sdk_items(output.items.unwrap_or_default())
    }

    async fn query(&self, params: &QueryParams) -> Result<Vec<Item>, StoreError> {
        let output = self
            .client
            .query()
            .table_name(&params.table_name)
            .select(Select::AllAttributes)
            .set_index_name(params.index_name.clone())
            .set_key_condition_expression(params.key_condition_expression.clone())
            .set_expression_attribute_values(
                params.expression_attribute_values.as_ref().map(to_sdk_item),
            )
            .set_expression_attribute_names(
                params.expression_attribute_names.as_ref().map(to_sdk_names),
            )
            .send()
            .await
            .map_err(store_error)?;

        from_sdk_items(output.items.unwrap_or_default())
    }
}

// Service errors carry the message DynamoDB sent; transport and
// construction failures only have the SDK's error chain.
fn store_error<E>(error: SdkError<E, HttpResponse>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match error.as_service_error() {
        Some(service_error) => StoreError {
            code: service_error.code().map(str::to_string),
            message: service_error
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(service_error).to_string()),
        },
        None => StoreError::new(DisplayErrorContext(&error).to_string()),
    }
}

pub fn to_sdk_item(item: &BTreeMap<String, AttributeValue>) -> HashMap<String, SdkAttributeValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), to_sdk_value(value)))
        .collect()
}

pub fn to_sdk_value(value: &AttributeValue) -> SdkAttributeValue {
    match value {
        AttributeValue::S(text) => SdkAttributeValue::S(text.clone()),
        AttributeValue::N(number) => SdkAttributeValue::N(number.clone()),
        AttributeValue::B(bytes) => SdkAttributeValue::B(Blob::new(bytes.clone())),
        AttributeValue::Ss(values) => SdkAttributeValue::Ss(values.clone()),
        AttributeValue::Ns(values) => SdkAttributeValue::Ns(values.clone()),
        AttributeValue::Bs(values) => SdkAttributeValue::Bs(
            values
                .iter()
                .map(|bytes| Blob::new(bytes.clone()))
                .collect(),
        ),
        AttributeValue::M(map) => SdkAttributeValue::M(to_sdk_item(map)),
        AttributeValue::L(values) => {
            SdkAttributeValue::L(values.iter().map(to_sdk_value).collect())
        }
        AttributeValue::Bool(flag) => SdkAttributeValue::Bool(*flag),
        AttributeValue::Null(flag) => SdkAttributeValue::Null(*flag),
    }
}

fn to_sdk_names(names: &ExpressionNames) -> HashMap<String, String> {
    names.clone().into_iter().collect()
}

fn to_sdk_update(update: &AttributeValueUpdate) -> SdkAttributeValueUpdate {
    SdkAttributeValueUpdate::builder()
        .set_action(update.action.map(|action| match action {
            AttributeAction::Put => SdkAttributeAction::Put,
            AttributeAction::Add => SdkAttributeAction::Add,
            AttributeAction::Delete => SdkAttributeAction::Delete,
        }))
        .set_value(update.value.as_ref().map(to_sdk_value))
        .build()
}

fn from_sdk_items(items: Vec<HashMap<String, SdkAttributeValue>>) -> Result<Vec<Item>, StoreError> {
    items.into_iter().map(from_sdk_item).collect()
}

pub fn from_sdk_item(item: HashMap<String, SdkAttributeValue>) -> Result<Item, StoreError> {
    item.into_iter()
        .map(|(name, value)| from_sdk_value(value).map(|value| (name, value)))
        .collect()
}

pub fn from_sdk_value(value: SdkAttributeValue) -> Result<AttributeValue, StoreError> {
    Ok(match value {
        SdkAttributeValue::S(text) => AttributeValue::S(text),
        SdkAttributeValue::N(number) => AttributeValue::N(number),
        SdkAttributeValue::B(blob) => AttributeValue::B(blob.into_inner()),
        SdkAttributeValue::Ss(values) => AttributeValue::Ss(values),
        SdkAttributeValue::Ns(values) => AttributeValue::Ns(values),
        SdkAttributeValue::Bs(values) => {
            AttributeValue::Bs(values.into_iter().map(Blob::into_inner).collect())
        }
        SdkAttributeValue::M(map) => AttributeValue::M(from_sdk_item(map)?),
        SdkAttributeValue::L(values) => AttributeValue::L(
            values
                .into_iter()
                .map(from_sdk_value)
                .collect::<Result<_, _>>()?,
        ),
        SdkAttributeValue::Bool(flag) => AttributeValue::Bool(flag),
        SdkAttributeValue::Null(flag) => AttributeValue::Null(flag),
        _ => {
            return Err(StoreError::new(
                "store returned an attribute value of an unknown type",
            ))
        }
    })
}
