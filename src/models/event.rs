use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: i32,
    pub event_name: String,
}

/// Lookup entry for the event select on the order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventView {
    #[serde(rename = "eventID")]
    pub event_id: i32,
    #[serde(rename = "eventName")]
    pub event_name: String,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id,
            event_name: event.event_name,
        }
    }
}
