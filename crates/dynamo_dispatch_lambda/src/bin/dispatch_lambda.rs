use dynamo_dispatch_lambda::adapters::dynamodb::DynamoDbItemStore;
use dynamo_dispatch_lambda::config::DispatchConfig;
use dynamo_dispatch_lambda::handlers::dispatch::{handle_event, ApiGatewayResponse};
use dynamo_dispatch_lambda::telemetry;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    config: &DispatchConfig,
    store: &DynamoDbItemStore,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_event(event.payload, config, store).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = DispatchConfig::from_env()?;
    telemetry::initialise(&config.log_filter)?;

    // One client per process, reused by every invocation this sandbox serves.
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbItemStore::from_config(&aws_config);

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        handle_request(&config, &store, event)
    }))
    .await
}
