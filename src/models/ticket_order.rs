use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Naive timestamp layouts accepted for `orderDate`, all read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A stored ticket order as it lives in the `ticket_orders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TicketOrder {
    #[serde(rename = "orderID")]
    pub order_id: i32,
    #[serde(rename = "eventID")]
    pub event_id: i32,
    #[serde(rename = "customerID")]
    pub customer_id: i32,
    #[serde(rename = "orderDate")]
    pub order_date: DateTime<Utc>,
    #[serde(rename = "ticketCount")]
    pub ticket_count: i32,
}

impl TicketOrder {
    pub fn from_draft(order_id: i32, draft: TicketOrderDraft) -> Self {
        Self {
            order_id,
            event_id: draft.event_id,
            customer_id: draft.customer_id,
            order_date: draft.order_date,
            ticket_count: draft.ticket_count,
        }
    }
}

/// An order joined with its event and customer, flattened for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TicketOrderView {
    #[serde(rename = "orderID")]
    pub order_id: i32,
    #[serde(rename = "eventID")]
    pub event_id: i32,
    #[serde(rename = "customerID")]
    pub customer_id: i32,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "orderDate")]
    pub order_date: DateTime<Utc>,
    #[serde(rename = "ticketCount")]
    pub ticket_count: i32,
}

/// Every mutable column of an order. Stores write all of them on create and
/// on replace; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOrderDraft {
    pub event_id: i32,
    pub customer_id: i32,
    pub order_date: DateTime<Utc>,
    pub ticket_count: i32,
}

/// Request body for `POST` and `PUT /api/ticketorders`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TicketOrderPayload {
    /// `0` or absent on create lets the store pick the id.
    #[serde(rename = "orderID", default)]
    pub order_id: Option<i32>,
    #[serde(rename = "eventID")]
    pub event_id: i32,
    #[serde(rename = "customerID")]
    pub customer_id: i32,
    /// RFC 3339, a naive date-time or `YYYY-MM-DD`, read as UTC. Defaults to
    /// now on create; required on replace.
    #[serde(
        rename = "orderDate",
        default,
        deserialize_with = "deserialize_order_date"
    )]
    #[schema(value_type = Option<String>, example = "2024-05-01")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(rename = "ticketCount")]
    pub ticket_count: i32,
}

impl TicketOrderPayload {
    /// Id the client asked for on create. `0` is what the front end sends
    /// for a new order and means the store picks one.
    pub fn requested_id(&self) -> Option<i32> {
        self.order_id.filter(|id| *id != 0)
    }

    pub fn into_new_order(self, now: DateTime<Utc>) -> (Option<i32>, TicketOrderDraft) {
        let requested_id = self.requested_id();
        let draft = TicketOrderDraft {
            event_id: self.event_id,
            customer_id: self.customer_id,
            order_date: self.order_date.unwrap_or(now),
            ticket_count: self.ticket_count,
        };
        (requested_id, draft)
    }

    /// A replacement must carry every field, so a missing date is rejected.
    pub fn into_replacement(self) -> Option<TicketOrderDraft> {
        let order_date = self.order_date?;
        Some(TicketOrderDraft {
            event_id: self.event_id,
            customer_id: self.customer_id,
            order_date,
            ticket_count: self.ticket_count,
        })
    }
}

/// Parses the `orderDate` shapes clients send: RFC 3339, a naive date-time,
/// or the bare `YYYY-MM-DD` produced by an HTML date input.
pub fn parse_order_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_order_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_order_date(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid orderDate '{}'", value))),
    }
}
