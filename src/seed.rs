//! Demo data for local runs. Events and customers have no HTTP endpoints, so
//! this is how a fresh store gets something to order against.
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use crate::models::{Customer, Event, TicketOrderDraft};
use crate::store::{StoreResult, TicketStore};

pub struct Fixture {
    pub events: Vec<Event>,
    pub customers: Vec<Customer>,
    pub orders: Vec<(i32, TicketOrderDraft)>,
}

pub fn demo_fixture() -> Result<Fixture> {
    let order_date = Utc
        .with_ymd_and_hms(2024, 5, 1, 0, 0, 0)
        .earliest()
        .context("demo order date is not a valid UTC timestamp")?;

    Ok(Fixture {
        events: vec![
            Event {
                event_id: 1,
                event_name: "Concert".to_string(),
            },
            Event {
                event_id: 2,
                event_name: "Theater".to_string(),
            },
        ],
        customers: vec![
            Customer {
                customer_id: 1,
                full_name: "John Doe".to_string(),
            },
            Customer {
                customer_id: 2,
                full_name: "Jane Smith".to_string(),
            },
        ],
        orders: vec![
            (
                1,
                TicketOrderDraft {
                    event_id: 1,
                    customer_id: 1,
                    order_date,
                    ticket_count: 2,
                },
            ),
            (
                2,
                TicketOrderDraft {
                    event_id: 2,
                    customer_id: 2,
                    order_date,
                    ticket_count: 3,
                },
            ),
        ],
    })
}

/// Writes the fixture. Lookups are overwritten; orders that already exist are
/// left alone so restarting against a durable store does not fail.
pub async fn apply(store: &dyn TicketStore, fixture: Fixture) -> StoreResult<()> {
    let event_count = fixture.events.len();
    let customer_count = fixture.customers.len();

    for event in fixture.events {
        store.put_event(event).await?;
    }
    for customer in fixture.customers {
        store.put_customer(customer).await?;
    }

    let mut inserted = 0;
    for (order_id, draft) in fixture.orders {
        if store.get_order(order_id).await?.is_none() {
            store.create_order(Some(order_id), draft).await?;
            inserted += 1;
        }
    }

    tracing::info!(
        events = event_count,
        customers = customer_count,
        orders = inserted,
        "Seeded demo data"
    );
    Ok(())
}
