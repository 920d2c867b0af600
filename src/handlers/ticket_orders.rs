//! Ticket order endpoints mounted under `/api/ticketorders`.
//!
//! Each handler validates its input, makes at most one store call and
//! projects the result. Validation messages are part of the client contract.
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::models::{CustomerView, EventView, TicketOrder, TicketOrderPayload, TicketOrderView};
use crate::routes::TICKET_ORDERS_PATH;
use crate::state::AppState;
use crate::utils::error::{AppError, EVENT_NAME_REQUIRED, INVALID_DATA, MISMATCHED_ORDER_ID};
use crate::utils::response::{created, ApiErrorResponse};

pub const DEFAULT_FIRST_LIMIT: i64 = 5000;
pub const DEFAULT_LAST_LIMIT: i64 = 100;

type OrderBody = Result<Json<Option<TicketOrderPayload>>, JsonRejection>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "eventName")]
    pub event_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventsWindowParams {
    #[serde(rename = "firstLimit", default = "default_first_limit")]
    pub first_limit: i64,
    #[serde(rename = "lastLimit", default = "default_last_limit")]
    pub last_limit: i64,
}

fn default_first_limit() -> i64 {
    DEFAULT_FIRST_LIMIT
}

fn default_last_limit() -> i64 {
    DEFAULT_LAST_LIMIT
}

fn order_not_found(order_id: i32) -> AppError {
    AppError::NotFound(format!("Ticket order {} was not found", order_id))
}

/// Unwraps a request body, treating a missing, `null` or malformed body the
/// same way.
fn require_payload(body: OrderBody) -> Result<TicketOrderPayload, AppError> {
    match body {
        Ok(Json(Some(payload))) => Ok(payload),
        Ok(Json(None)) => Err(AppError::ValidationError(INVALID_DATA.to_string())),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Unreadable ticket order body");
            Err(AppError::ValidationError(INVALID_DATA.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ticketorders",
    tag = "ticketorders",
    responses(
        (status = 200, description = "Every order with its event and customer names", body = [TicketOrderView])
    )
)]
/// List all ticket orders.
pub async fn list_ticket_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketOrderView>>, AppError> {
    let orders = state.store.list_orders().await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/ticketorders/{id}",
    tag = "ticketorders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = TicketOrderView),
        (status = 404, description = "No order with this id")
    )
)]
/// Fetch one ticket order by id.
pub async fn get_ticket_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Json<TicketOrderView>, AppError> {
    state
        .store
        .get_order(order_id)
        .await?
        .map(Json)
        .ok_or_else(|| order_not_found(order_id))
}

#[utoipa::path(
    get,
    path = "/api/ticketorders/search",
    tag = "ticketorders",
    params(("eventName" = String, Query, description = "Case-sensitive substring of the event name")),
    responses(
        (status = 200, description = "Matching orders", body = [TicketOrderView]),
        (status = 400, description = "Missing or empty event name", body = ApiErrorResponse)
    )
)]
/// Find ticket orders whose event name contains the given text.
pub async fn search_ticket_orders(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TicketOrderView>>, AppError> {
    let event_name = match params.event_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AppError::ValidationError(EVENT_NAME_REQUIRED.to_string())),
    };

    let orders = state.store.find_orders_by_event_name(event_name).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/ticketorders",
    tag = "ticketorders",
    request_body = TicketOrderPayload,
    responses(
        (status = 201, description = "Order created; `Location` points at it", body = TicketOrder),
        (status = 400, description = "Invalid body or unknown event/customer", body = ApiErrorResponse),
        (status = 409, description = "Explicit order id already taken", body = ApiErrorResponse)
    )
)]
/// Create a ticket order.
pub async fn create_ticket_order(
    State(state): State<AppState>,
    body: OrderBody,
) -> Result<Response, AppError> {
    let payload = require_payload(body)?;
    let (requested_id, draft) = payload.into_new_order(Utc::now());

    let order = state.store.create_order(requested_id, draft).await?;
    tracing::info!(order_id = order.order_id, "Ticket order created");

    let location = format!("{}/{}", TICKET_ORDERS_PATH, order.order_id);
    Ok(created(location, order))
}

#[utoipa::path(
    put,
    path = "/api/ticketorders/{id}",
    tag = "ticketorders",
    params(("id" = i32, Path, description = "Order id; must equal the body's orderID")),
    request_body = TicketOrderPayload,
    responses(
        (status = 204, description = "Order replaced"),
        (status = 400, description = "Invalid body or mismatched order id", body = ApiErrorResponse),
        (status = 404, description = "No order with this id")
    )
)]
/// Replace every field of an existing ticket order.
pub async fn replace_ticket_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    body: OrderBody,
) -> Result<StatusCode, AppError> {
    let payload = require_payload(body)?;
    if payload.order_id.unwrap_or_default() != order_id {
        return Err(AppError::ValidationError(MISMATCHED_ORDER_ID.to_string()));
    }

    let draft = payload
        .into_replacement()
        .ok_or_else(|| AppError::ValidationError(INVALID_DATA.to_string()))?;

    state
        .store
        .replace_order(order_id, draft)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    tracing::info!(order_id, "Ticket order replaced");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/ticketorders/{id}",
    tag = "ticketorders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "The deleted order", body = TicketOrder),
        (status = 404, description = "No order with this id")
    )
)]
/// Delete a ticket order and return what was removed.
pub async fn delete_ticket_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Json<TicketOrder>, AppError> {
    let order = state
        .store
        .delete_order(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    tracing::info!(order_id, "Ticket order deleted");

    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/api/ticketorders/customers",
    tag = "ticketorders",
    responses(
        (status = 200, description = "Customer lookup entries", body = [CustomerView])
    )
)]
/// List customers for the order form.
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerView>>, AppError> {
    let customers = state.store.list_customers().await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/ticketorders/events",
    tag = "ticketorders",
    params(
        ("firstLimit" = Option<i64>, Query, description = "Events taken from the start, by ascending id (default 5000)"),
        ("lastLimit" = Option<i64>, Query, description = "Events taken from the end, by descending id (default 100)")
    ),
    responses(
        (status = 200, description = "Head and tail of the event list; overlapping events repeat", body = [EventView])
    )
)]
/// List events for the order form.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventsWindowParams>,
) -> Result<Json<Vec<EventView>>, AppError> {
    let events = state
        .store
        .list_events_window(params.first_limit, params.last_limit)
        .await?;
    Ok(Json(events))
}
