//! Subscription CRUD, listing and spend aggregation over HTTP.
//!
//! Use-case errors become responses here: validation errors are 400,
//! a missing subscription is 404, and storage failures are 500 with only
//! the public message in the body.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use std::fmt::Display;

use crate::dtos::{
    CreateSubscriptionRequest, CreateSubscriptionResponse, DeleteSubscriptionResponse,
    ListSubscriptionsQuery, SubscriptionListResponse, SubscriptionResponse,
    TotalSumQuery, TotalSumResponse, UpdateSubscriptionRequest, UpdateSubscriptionResponse,
};
use crate::services::{record_error, record_subscription_operation};
use crate::startup::AppState;
use crate::usecases::{ErrorKind, UseCaseError};

const INVALID_ID: &str = "id must be positive integer";
const INVALID_JSON: &str = "invalid json";
const INVALID_QUERY: &str = "invalid query";

/// Reject a request the extractors could not decode.
fn malformed(operation: &'static str, message: &'static str, detail: impl Display) -> AppError {
    tracing::warn!(operation, detail = %detail, "Malformed request: {}", message);
    record_subscription_operation(operation, "rejected");
    record_error("malformed_request", operation);
    AppError::BadRequest(anyhow::anyhow!(message))
}

/// Map a use-case error onto its HTTP form, recording it on the way.
fn failed(operation: &'static str, err: UseCaseError) -> AppError {
    let kind = err.kind();
    record_error(kind.as_str(), operation);

    if kind.is_failure() {
        record_subscription_operation(operation, "failure");
        // Body carries the public message; the storage cause is logged.
        return AppError::InternalError(anyhow::Error::new(err));
    }

    record_subscription_operation(operation, "rejected");
    tracing::warn!(operation, error_kind = kind.as_str(), "{}", kind);
    match kind {
        ErrorKind::SubscriptionNotFound => AppError::NotFound(anyhow::Error::new(kind)),
        _ => AppError::BadRequest(anyhow::Error::new(kind)),
    }
}

/// Create a subscription
#[utoipa::path(
    post,
    path = "/subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = CreateSubscriptionResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateSubscriptionResponse>), AppError> {
    let Json(request) = payload.map_err(|e| malformed("create", INVALID_JSON, e))?;

    let response = state
        .usecases
        .create
        .execute(request)
        .await
        .map_err(|e| failed("create", e))?;

    tracing::info!(subscription_id = response.id, "Subscription created");
    record_subscription_operation("create", "success");

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a subscription by ID
#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    params(
        ("id" = i64, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Subscription not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn get_subscription(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let Path(id) = id.map_err(|e| malformed("get", INVALID_ID, e))?;

    let response = state
        .usecases
        .get
        .execute(id)
        .await
        .map_err(|e| failed("get", e))?;

    record_subscription_operation("get", "success");
    Ok(Json(response))
}

/// Update a subscription
///
/// Only the fields present in the body change. Sending `end_date` as `""`
/// or `null` clears it.
#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    params(
        ("id" = i64, Path, description = "Subscription ID")
    ),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Patch applied, or nothing to apply", body = UpdateSubscriptionResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Subscription not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn update_subscription(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> Result<Json<UpdateSubscriptionResponse>, AppError> {
    let Path(id) = id.map_err(|e| malformed("update", INVALID_ID, e))?;
    let Json(request) = payload.map_err(|e| malformed("update", INVALID_JSON, e))?;

    let response = state
        .usecases
        .update
        .execute(id, request)
        .await
        .map_err(|e| failed("update", e))?;

    tracing::info!(
        subscription_id = id,
        updated = response.updated,
        "Subscription update handled"
    );
    record_subscription_operation("update", "success");

    Ok(Json(response))
}

/// Delete a subscription
#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    params(
        ("id" = i64, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription deleted", body = DeleteSubscriptionResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Subscription not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteSubscriptionResponse>, AppError> {
    let Path(id) = id.map_err(|e| malformed("delete", INVALID_ID, e))?;

    let response = state
        .usecases
        .delete
        .execute(id)
        .await
        .map_err(|e| failed("delete", e))?;

    tracing::info!(subscription_id = id, "Subscription deleted");
    record_subscription_operation("delete", "success");

    Ok(Json(response))
}

/// List subscriptions
#[utoipa::path(
    get,
    path = "/subscriptions",
    params(ListSubscriptionsQuery),
    responses(
        (status = 200, description = "One page of subscriptions", body = SubscriptionListResponse),
        (status = 400, description = "Invalid filter or paging", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    query: Result<Query<ListSubscriptionsQuery>, QueryRejection>,
) -> Result<Json<SubscriptionListResponse>, AppError> {
    let Query(query) = query.map_err(|e| malformed("list", INVALID_QUERY, e))?;

    let response = state
        .usecases
        .list
        .execute(query)
        .await
        .map_err(|e| failed("list", e))?;

    record_subscription_operation("list", "success");
    Ok(Json(response))
}

/// Total price of matching subscriptions
///
/// `start_date` and `end_date` bound the subscription start date, both
/// inclusive.
#[utoipa::path(
    get,
    path = "/subscriptions/total",
    params(TotalSumQuery),
    responses(
        (status = 200, description = "Total price", body = TotalSumResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn get_total_sum(
    State(state): State<AppState>,
    query: Result<Query<TotalSumQuery>, QueryRejection>,
) -> Result<Json<TotalSumResponse>, AppError> {
    let Query(query) = query.map_err(|e| malformed("total_sum", INVALID_QUERY, e))?;

    let response = state
        .usecases
        .total_sum
        .execute(query)
        .await
        .map_err(|e| failed("total_sum", e))?;

    record_subscription_operation("total_sum", "success");
    Ok(Json(response))
}
