//! In-memory implementation of [`TicketStore`].
//!
//! All three tables live behind a single `tokio::sync::RwLock`, so every call
//! observes and produces a consistent state. Nothing survives a restart.
//!
//! Generated order ids follow a high-water mark like a Postgres identity
//! column: they never go backwards and an id is not handed out twice, even
//! after the order holding it was deleted.
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TicketStore};
use crate::models::{
    Customer, CustomerView, Event, EventView, TicketOrder, TicketOrderDraft, TicketOrderView,
};

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<i32, Event>,
    customers: BTreeMap<i32, Customer>,
    orders: BTreeMap<i32, TicketOrder>,
    /// Highest order id ever stored, explicit or generated.
    last_order_id: i32,
}

impl Tables {
    fn next_order_id(&self) -> StoreResult<i32> {
        self.last_order_id
            .checked_add(1)
            .ok_or(StoreError::OrderIdsExhausted)
    }

    fn check_references(&self, draft: &TicketOrderDraft) -> StoreResult<()> {
        if self.events.contains_key(&draft.event_id)
            && self.customers.contains_key(&draft.customer_id)
        {
            Ok(())
        } else {
            Err(StoreError::MissingReference)
        }
    }

    fn view(&self, order: &TicketOrder) -> Option<TicketOrderView> {
        let event = self.events.get(&order.event_id)?;
        let customer = self.customers.get(&order.customer_id)?;
        Some(TicketOrderView {
            order_id: order.order_id,
            event_id: event.event_id,
            customer_id: customer.customer_id,
            event_name: event.event_name.clone(),
            customer_name: customer.full_name.clone(),
            order_date: order.order_date,
            ticket_count: order.ticket_count,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn list_orders(&self) -> StoreResult<Vec<TicketOrderView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter_map(|order| tables.view(order))
            .collect())
    }

    async fn get_order(&self, order_id: i32) -> StoreResult<Option<TicketOrderView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .get(&order_id)
            .and_then(|order| tables.view(order)))
    }

    async fn find_orders_by_event_name(&self, text: &str) -> StoreResult<Vec<TicketOrderView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter_map(|order| tables.view(order))
            .filter(|view| view.event_name.contains(text))
            .collect())
    }

    async fn create_order(
        &self,
        order_id: Option<i32>,
        draft: TicketOrderDraft,
    ) -> StoreResult<TicketOrder> {
        let mut tables = self.tables.write().await;
        tables.check_references(&draft)?;

        let order_id = match order_id {
            Some(id) if tables.orders.contains_key(&id) => {
                return Err(StoreError::DuplicateOrder(id))
            }
            Some(id) => id,
            None => tables.next_order_id()?,
        };

        let order = TicketOrder::from_draft(order_id, draft);
        tables.orders.insert(order_id, order.clone());
        tables.last_order_id = tables.last_order_id.max(order_id);
        Ok(order)
    }

    async fn replace_order(
        &self,
        order_id: i32,
        draft: TicketOrderDraft,
    ) -> StoreResult<Option<TicketOrder>> {
        let mut tables = self.tables.write().await;
        if !tables.orders.contains_key(&order_id) {
            return Ok(None);
        }
        tables.check_references(&draft)?;

        let order = TicketOrder::from_draft(order_id, draft);
        tables.orders.insert(order_id, order.clone());
        Ok(Some(order))
    }

    async fn delete_order(&self, order_id: i32) -> StoreResult<Option<TicketOrder>> {
        Ok(self.tables.write().await.orders.remove(&order_id))
    }

    async fn list_customers(&self) -> StoreResult<Vec<CustomerView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .values()
            .cloned()
            .map(CustomerView::from)
            .collect())
    }

    async fn list_events_window(
        &self,
        first_limit: i64,
        last_limit: i64,
    ) -> StoreResult<Vec<EventView>> {
        let tables = self.tables.read().await;
        let first = tables.events.values().take(window_len(first_limit));
        let last = tables.events.values().rev().take(window_len(last_limit));
        Ok(first.chain(last).cloned().map(EventView::from).collect())
    }

    async fn put_event(&self, event: Event) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .events
            .insert(event.event_id, event);
        Ok(())
    }

    async fn put_customer(&self, customer: Customer) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .customers
            .insert(customer.customer_id, customer);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn window_len(limit: i64) -> usize {
    usize::try_from(limit.max(0)).unwrap_or(usize::MAX)
}
