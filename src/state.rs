use std::sync::Arc;

use crate::store::TicketStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TicketStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }
}
