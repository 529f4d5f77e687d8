use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted per-event ticket definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTemplate {
    pub id: uuid::Uuid,
    pub event_id: uuid::Uuid,
    pub name: String,
    pub capacity: u32,
    pub price: Decimal,
    pub sold_count: u32,
}

/// Insert struct for creating ticket definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicketTemplate {
    pub event_id: uuid::Uuid,
    pub name: String,
    pub capacity: u32,
    pub price: Decimal,
    pub sold_count: u32,
}

impl NewTicketTemplate {
    /// Clones an existing ticket definition onto another event. The
    /// clone carries no identity and its sold count starts at zero.
    #[must_use]
    pub fn clone_of(source: &TicketTemplate, event_id: uuid::Uuid) -> Self {
        Self {
            event_id,
            name: source.name.clone(),
            capacity: source.capacity,
            price: source.price,
            sold_count: 0,
        }
    }
}

/// Ticket fields as submitted by a caller, before they are attached to
/// a persisted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub name: String,
    pub capacity: u32,
    pub price: Decimal,
}

impl TicketDraft {
    /// Attaches the draft to `event_id` as an insertable record.
    #[must_use]
    pub fn for_event(&self, event_id: uuid::Uuid) -> NewTicketTemplate {
        NewTicketTemplate {
            event_id,
            name: self.name.clone(),
            capacity: self.capacity,
            price: self.price,
            sold_count: 0,
        }
    }
}
