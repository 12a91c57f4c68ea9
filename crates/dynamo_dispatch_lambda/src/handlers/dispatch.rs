use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dynamo_dispatch_core::contract::{
    Action, AddParams, DeleteParams, Envelope, QueryParams, ScanParams, UpdateParams,
};
use dynamo_dispatch_core::outcome::{render_body, DispatchError, Outcome, TEXT_CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::item_store::ItemStore;
use crate::config::DispatchConfig;
use crate::handlers::operations::{add_items, delete_items, query_items, scan_items, update_items};

/// Response header carrying `ok` or `error`, so callers can tell the two
/// apart without reading the body.
pub const OUTCOME_HEADER: &str = "X-Dispatch-Outcome";
/// Set on errors only: `not_found`, `bad_request` or `store`.
pub const ERROR_KIND_HEADER: &str = "X-Dispatch-Error-Kind";

const COMPONENT: &str = "dispatcher";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Entry point for an API Gateway proxy event.
pub async fn handle_event(
    event: Value,
    config: &DispatchConfig,
    store: &dyn ItemStore,
) -> ApiGatewayResponse {
    let outcome = match extract_body(&event) {
        Ok(body) => handle_body(body.as_deref(), config, store).await,
        Err(error) => Err(error),
    };
    into_response(&outcome, config)
}

/// Routes a raw request body to its operation handler.
pub async fn handle_body(
    raw_body: Option<&str>,
    config: &DispatchConfig,
    store: &dyn ItemStore,
) -> Outcome {
    let Some(raw_body) = raw_body.filter(|body| !body.is_empty()) else {
        let error = DispatchError::MissingBody;
        tracing::warn!(component = COMPONENT, event = "missing_body", message = %error);
        return Err(error);
    };

    if config.log_request_body {
        tracing::info!(
            component = COMPONENT,
            event = "request_received",
            body = raw_body
        );
    }

    let envelope = Envelope::from_json(raw_body)?;
    dispatch(envelope, store).await
}

pub async fn dispatch(envelope: Envelope, store: &dyn ItemStore) -> Outcome {
    let action = envelope.action()?;
    tracing::debug!(
        component = COMPONENT,
        event = "action_resolved",
        action = action.as_str()
    );

    match &action {
        Action::Add => {
            let params: AddParams = envelope.into_params(&action)?;
            add_items(store, &params).await
        }
        Action::Update => {
            let params: UpdateParams = envelope.into_params(&action)?;
            update_items(store, &params).await
        }
        Action::Delete => {
            let params: DeleteParams = envelope.into_params(&action)?;
            delete_items(store, &params).await
        }
        Action::Scan => {
            let params: ScanParams = envelope.into_params(&action)?;
            scan_items(store, &params).await
        }
        Action::Query => {
            let params: QueryParams = envelope.into_params(&action)?;
            query_items(store, &params).await
        }
        Action::Unsupported(raw) => {
            tracing::warn!(component = COMPONENT, event = "unsupported_action", action = %raw);
            Err(DispatchError::UnsupportedAction(raw.clone()))
        }
    }
}

/// Pulls the request body out of the proxy event. A missing or null body is
/// not an error here; the dispatcher reports it.
fn extract_body(event: &Value) -> Result<Option<String>, DispatchError> {
    let Some(object) = event.as_object() else {
        return Err(DispatchError::MalformedBody(
            "Request payload must be a JSON object".to_string(),
        ));
    };

    let base64_encoded = object
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match object.get("body") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if base64_encoded => decode_base64_body(text).map(Some),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(body @ Value::Object(_)) => Ok(Some(body.to_string())),
        Some(_) => Err(DispatchError::MalformedBody(
            "Request body must be a string or a JSON object".to_string(),
        )),
    }
}

fn decode_base64_body(text: &str) -> Result<String, DispatchError> {
    let bytes = STANDARD
        .decode(text.as_bytes())
        .map_err(|error| DispatchError::MalformedBody(format!("invalid base64 body: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|error| DispatchError::MalformedBody(format!("body is not UTF-8: {error}")))
}

fn into_response(outcome: &Outcome, config: &DispatchConfig) -> ApiGatewayResponse {
    let (status_code, headers) = match outcome {
        Ok(output) => (
            200,
            json!({
                "Content-Type": output.content_type(),
                OUTCOME_HEADER: "ok",
            }),
        ),
        Err(error) => {
            let kind = error.kind();
            let status_code = if config.reflect_status {
                kind.status_code()
            } else {
                200
            };
            (
                status_code,
                json!({
                    "Content-Type": TEXT_CONTENT_TYPE,
                    OUTCOME_HEADER: "error",
                    ERROR_KIND_HEADER: kind.as_str(),
                }),
            )
        }
    };

    ApiGatewayResponse {
        status_code,
        headers,
        body: render_body(outcome),
    }
}
