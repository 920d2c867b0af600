pub mod customer;
pub mod event;
pub mod ticket_order;

pub use customer::{Customer, CustomerView};
pub use event::{Event, EventView};
pub use ticket_order::{TicketOrder, TicketOrderDraft, TicketOrderPayload, TicketOrderView};
