use std::path::Path;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::health_check;
use crate::handlers::openapi::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use crate::handlers::ticket_orders::{
    create_ticket_order, delete_ticket_order, get_ticket_order, list_customers, list_events,
    list_ticket_orders, replace_ticket_order, search_ticket_orders,
};
use crate::state::AppState;

pub const TICKET_ORDERS_PATH: &str = "/api/ticketorders";

pub fn create_routes(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            TICKET_ORDERS_PATH,
            get(list_ticket_orders).post(create_ticket_order),
        )
        .route(
            &format!("{}/search", TICKET_ORDERS_PATH),
            get(search_ticket_orders),
        )
        .route(
            &format!("{}/customers", TICKET_ORDERS_PATH),
            get(list_customers),
        )
        .route(&format!("{}/events", TICKET_ORDERS_PATH), get(list_events))
        .route(
            &format!("{}/:id", TICKET_ORDERS_PATH),
            get(get_ticket_order)
                .put(replace_ticket_order)
                .delete(delete_ticket_order),
        )
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
