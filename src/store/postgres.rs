//! Postgres implementation of [`TicketStore`].
//!
//! Reads join `ticket_orders` with `events` and `customers` explicitly; there
//! is no lazy loading. Referential integrity comes from the foreign keys in
//! `migrations/`, and their violations are translated into [`StoreError`]
//! variants so handlers can answer with a client error.
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{StoreError, StoreResult, TicketStore};
use crate::models::{
    Customer, CustomerView, Event, EventView, TicketOrder, TicketOrderDraft, TicketOrderView,
};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
/// `nextval` ran past the identity column's maximum.
const SEQUENCE_LIMIT_EXCEEDED: &str = "2200H";

const ORDER_VIEW_SELECT: &str = "SELECT o.order_id, o.event_id, o.customer_id, \
     e.event_name, c.full_name AS customer_name, o.order_date, o.ticket_count \
     FROM ticket_orders o \
     JOIN events e ON e.event_id = o.event_id \
     JOIN customers c ON c.customer_id = o.customer_id";

const ORDER_COLUMNS: &str = "order_id, event_id, customer_id, order_date, ticket_count";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TicketStore for PgStore {
    async fn list_orders(&self) -> StoreResult<Vec<TicketOrderView>> {
        let sql = format!("{} ORDER BY o.order_id", ORDER_VIEW_SELECT);
        let orders = sqlx::query_as::<_, TicketOrderView>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn get_order(&self, order_id: i32) -> StoreResult<Option<TicketOrderView>> {
        let sql = format!("{} WHERE o.order_id = $1", ORDER_VIEW_SELECT);
        let order = sqlx::query_as::<_, TicketOrderView>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn find_orders_by_event_name(&self, text: &str) -> StoreResult<Vec<TicketOrderView>> {
        // strpos keeps `%` and `_` in the search text literal.
        let sql = format!(
            "{} WHERE strpos(e.event_name, $1) > 0 ORDER BY o.order_id",
            ORDER_VIEW_SELECT
        );
        let orders = sqlx::query_as::<_, TicketOrderView>(&sql)
            .bind(text)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn create_order(
        &self,
        order_id: Option<i32>,
        draft: TicketOrderDraft,
    ) -> StoreResult<TicketOrder> {
        let mut tx = self.pool.begin().await?;

        let order = match order_id {
            Some(order_id) => {
                let sql = format!(
                    "INSERT INTO ticket_orders ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
                    cols = ORDER_COLUMNS
                );
                let order = sqlx::query_as::<_, TicketOrder>(&sql)
                    .bind(order_id)
                    .bind(draft.event_id)
                    .bind(draft.customer_id)
                    .bind(draft.order_date)
                    .bind(draft.ticket_count)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|err| classify_write_error(err, Some(order_id)))?;

                // Keep generated ids ahead of explicitly chosen ones. The
                // sequence only ever moves forward.
                sqlx::query(
                    "SELECT setval(seq::regclass, $1) \
                     FROM pg_get_serial_sequence('ticket_orders', 'order_id') AS seq \
                     WHERE $1 > COALESCE((SELECT last_value FROM pg_sequences \
                        WHERE format('%I.%I', schemaname, sequencename) = seq), 0)",
                )
                .bind(i64::from(order_id))
                .execute(&mut *tx)
                .await?;
                order
            }
            None => {
                let sql = format!(
                    "INSERT INTO ticket_orders (event_id, customer_id, order_date, ticket_count) \
                     VALUES ($1, $2, $3, $4) RETURNING {}",
                    ORDER_COLUMNS
                );
                sqlx::query_as::<_, TicketOrder>(&sql)
                    .bind(draft.event_id)
                    .bind(draft.customer_id)
                    .bind(draft.order_date)
                    .bind(draft.ticket_count)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|err| classify_write_error(err, None))?
            }
        };

        tx.commit().await?;
        Ok(order)
    }

    async fn replace_order(
        &self,
        order_id: i32,
        draft: TicketOrderDraft,
    ) -> StoreResult<Option<TicketOrder>> {
        let sql = format!(
            "UPDATE ticket_orders \
             SET event_id = $2, customer_id = $3, order_date = $4, ticket_count = $5 \
             WHERE order_id = $1 RETURNING {}",
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, TicketOrder>(&sql)
            .bind(order_id)
            .bind(draft.event_id)
            .bind(draft.customer_id)
            .bind(draft.order_date)
            .bind(draft.ticket_count)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| classify_write_error(err, None))?;
        Ok(order)
    }

    async fn delete_order(&self, order_id: i32) -> StoreResult<Option<TicketOrder>> {
        let sql = format!(
            "DELETE FROM ticket_orders WHERE order_id = $1 RETURNING {}",
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, TicketOrder>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn list_customers(&self) -> StoreResult<Vec<CustomerView>> {
        let customers = sqlx::query_as::<_, CustomerView>(
            "SELECT customer_id, full_name FROM customers ORDER BY customer_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    async fn list_events_window(
        &self,
        first_limit: i64,
        last_limit: i64,
    ) -> StoreResult<Vec<EventView>> {
        let mut events = sqlx::query_as::<_, EventView>(
            "SELECT event_id, event_name FROM events ORDER BY event_id LIMIT $1",
        )
        .bind(first_limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        let last = sqlx::query_as::<_, EventView>(
            "SELECT event_id, event_name FROM events ORDER BY event_id DESC LIMIT $1",
        )
        .bind(last_limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        events.extend(last);
        Ok(events)
    }

    async fn put_event(&self, event: Event) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO events (event_id, event_name) VALUES ($1, $2) \
             ON CONFLICT (event_id) DO UPDATE SET event_name = EXCLUDED.event_name",
        )
        .bind(event.event_id)
        .bind(event.event_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn put_customer(&self, customer: Customer) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO customers (customer_id, full_name) VALUES ($1, $2) \
             ON CONFLICT (customer_id) DO UPDATE SET full_name = EXCLUDED.full_name",
        )
        .bind(customer.customer_id)
        .bind(customer.full_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn classify_write_error(err: sqlx::Error, order_id: Option<i32>) -> StoreError {
    let code = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned());

    match (code.as_deref(), order_id) {
        (Some(FOREIGN_KEY_VIOLATION), _) => StoreError::MissingReference,
        (Some(UNIQUE_VIOLATION), Some(order_id)) => StoreError::DuplicateOrder(order_id),
        (Some(SEQUENCE_LIMIT_EXCEEDED), None) => StoreError::OrderIdsExhausted,
        _ => StoreError::Database(err),
    }
}
