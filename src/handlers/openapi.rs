//! OpenAPI document for the HTTP API, served as JSON next to Swagger UI.
use utoipa::OpenApi;

use crate::handlers::{self, ticket_orders};
use crate::models::{CustomerView, EventView, TicketOrder, TicketOrderPayload, TicketOrderView};
use crate::utils::response::{ApiErrorBody, ApiErrorResponse};

pub const SWAGGER_UI_PATH: &str = "/swagger";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "WebCityEventsAPI",
        version = "v1",
        description = "Ticket orders for city events, with event and customer lookups"
    ),
    paths(
        handlers::health_check,
        ticket_orders::list_ticket_orders,
        ticket_orders::get_ticket_order,
        ticket_orders::search_ticket_orders,
        ticket_orders::create_ticket_order,
        ticket_orders::replace_ticket_order,
        ticket_orders::delete_ticket_order,
        ticket_orders::list_customers,
        ticket_orders::list_events,
    ),
    components(schemas(
        TicketOrder,
        TicketOrderView,
        TicketOrderPayload,
        CustomerView,
        EventView,
        ApiErrorResponse,
        ApiErrorBody,
    )),
    tags(
        (name = "ticketorders", description = "Ticket orders and their lookups"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;
