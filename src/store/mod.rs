//! Storage access for events, customers and ticket orders.
//!
//! Handlers only see [`TicketStore`]. Two backends implement it:
//! - [`postgres::PgStore`], the durable backend, using explicit join queries
//!   and one transaction per mutating call.
//! - [`memory::MemoryStore`], an in-process backend used when no database is
//!   configured and by the test suite.
//!
//! Both enforce that an order references an existing event and customer, and
//! both generate order ids monotonically: a deleted id is never handed out
//! again, and running past `i32::MAX` is [`StoreError::OrderIdsExhausted`].
use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Customer, CustomerView, Event, EventView, TicketOrder, TicketOrderDraft, TicketOrderView,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("referenced event or customer does not exist")]
    MissingReference,

    #[error("order {0} already exists")]
    DuplicateOrder(i32),

    #[error("no order ids left to assign")]
    OrderIdsExhausted,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn list_orders(&self) -> StoreResult<Vec<TicketOrderView>>;
    async fn get_order(&self, order_id: i32) -> StoreResult<Option<TicketOrderView>>;
    async fn find_orders_by_event_name(&self, text: &str) -> StoreResult<Vec<TicketOrderView>>;

    /// Inserts an order. `order_id` of `None` lets the store pick the next id.
    async fn create_order(
        &self,
        order_id: Option<i32>,
        draft: TicketOrderDraft,
    ) -> StoreResult<TicketOrder>;

    /// Overwrites every mutable column. Returns `None` if the id is unknown.
    async fn replace_order(
        &self,
        order_id: i32,
        draft: TicketOrderDraft,
    ) -> StoreResult<Option<TicketOrder>>;

    async fn delete_order(&self, order_id: i32) -> StoreResult<Option<TicketOrder>>;

    async fn list_customers(&self) -> StoreResult<Vec<CustomerView>>;

    /// First `first_limit` events by ascending id followed by the last
    /// `last_limit` by descending id. Overlapping rows appear in both halves.
    async fn list_events_window(
        &self,
        first_limit: i64,
        last_limit: i64,
    ) -> StoreResult<Vec<EventView>>;

    /// Insert or overwrite an event. Not routed; used for seeding.
    async fn put_event(&self, event: Event) -> StoreResult<()>;

    /// Insert or overwrite a customer. Not routed; used for seeding.
    async fn put_customer(&self, customer: Customer) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
