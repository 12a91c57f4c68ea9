//! One handler per store primitive. Each builds its store call from the
//! envelope section, awaits it, and turns the response into an [`Outcome`].

use std::time::Instant;

use dynamo_dispatch_core::contract::{
    AddParams, DeleteParams, QueryParams, ScanParams, UpdateParams,
};
use dynamo_dispatch_core::outcome::{DispatchError, OperationOutput, Outcome, CREATED, OK};
use dynamo_dispatch_core::render::{render_query_items, render_scan_items};

use crate::adapters::item_store::{ItemStore, StoreError};

const COMPONENT: &str = "operation_handler";

/// Puts items one at a time in input order. The first failure stops the
/// batch; items already written stay written.
pub async fn add_items(store: &dyn ItemStore, params: &AddParams) -> Outcome {
    let started_at = Instant::now();
    tracing::info!(
        component = COMPONENT,
        event = "add_started",
        table_name = %params.table_name,
        planned_items = params.items.len(),
    );

    for (index, item) in params.items.iter().enumerate() {
        if let Err(error) = store.put_item(&params.table_name, item).await {
            tracing::warn!(
                component = COMPONENT,
                event = "add_failed",
                table_name = %params.table_name,
                items_written = index,
                duration_ms = started_at.elapsed().as_millis() as u64,
                error = %error,
            );
            return Err(error.into());
        }
    }

    log_completed(
        "add_completed",
        &params.table_name,
        started_at,
        params.items.len(),
    );
    Ok(OperationOutput::Text(CREATED.to_string()))
}

pub async fn update_items(store: &dyn ItemStore, params: &UpdateParams) -> Outcome {
    let started_at = Instant::now();
    store
        .update_item(&params.table_name, &params.key, &params.attribute_updates)
        .await
        .map_err(|error| log_failed("update_failed", &params.table_name, started_at, error))?;

    log_completed("update_completed", &params.table_name, started_at, 1);
    Ok(OperationOutput::Text(OK.to_string()))
}

pub async fn delete_items(store: &dyn ItemStore, params: &DeleteParams) -> Outcome {
    let started_at = Instant::now();
    store
        .delete_item(&params.table_name, &params.key)
        .await
        .map_err(|error| log_failed("delete_failed", &params.table_name, started_at, error))?;

    log_completed("delete_completed", &params.table_name, started_at, 1);
    Ok(OperationOutput::Text(OK.to_string()))
}

pub async fn scan_items(store: &dyn ItemStore, params: &ScanParams) -> Outcome {
    let started_at = Instant::now();
    let items = store
        .scan(params)
        .await
        .map_err(|error| log_failed("scan_failed", &params.table_name, started_at, error))?;

    log_completed(
        "scan_completed",
        &params.table_name,
        started_at,
        items.len(),
    );
    Ok(OperationOutput::Json(render_scan_items(&items)))
}

pub async fn query_items(store: &dyn ItemStore, params: &QueryParams) -> Outcome {
    let started_at = Instant::now();
    let items = store
        .query(params)
        .await
        .map_err(|error| log_failed("query_failed", &params.table_name, started_at, error))?;

    log_completed(
        "query_completed",
        &params.table_name,
        started_at,
        items.len(),
    );
    Ok(OperationOutput::Json(render_query_items(&items)))
}

fn log_completed(event: &str, table_name: &str, started_at: Instant, items: usize) {
    tracing::info!(
        component = COMPONENT,
        event,
        table_name,
        items,
        duration_ms = started_at.elapsed().as_millis() as u64,
    );
}

fn log_failed(
    event: &str,
    table_name: &str,
    started_at: Instant,
    error: StoreError,
) -> DispatchError {
    tracing::warn!(
        component = COMPONENT,
        event,
        table_name,
        error_code = error.code.as_deref().unwrap_or("unknown"),
        duration_ms = started_at.elapsed().as_millis() as u64,
        error = %error,
    );
    error.into()
}
