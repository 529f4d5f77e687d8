use async_trait::async_trait;

use cadence_core::model::event::{Event, NewEvent};
use cadence_core::model::ticket::{NewTicketTemplate, TicketTemplate};

use crate::error::StoreResult;

/// Abstract persistence contract consumed by the synchronization
/// engine.
///
/// Implementations are expected to drop an event's ticket templates
/// together with the event itself; the contract deliberately has no
/// standalone ticket-delete call.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persists a new event and returns it with its assigned id.
    ///
    /// ## Errors
    /// Returns an error if the backend rejects the write.
    async fn create_event(&self, event: NewEvent) -> StoreResult<Event>;

    /// Persists a batch of new events, returned in input order.
    ///
    /// ## Errors
    /// Returns an error if the backend rejects the write.
    async fn create_events(&self, events: Vec<NewEvent>) -> StoreResult<Vec<Event>>;

    /// Replaces every field of the event identified by `id`.
    ///
    /// ## Errors
    /// Returns [`StoreError::EventNotFound`](crate::error::StoreError::EventNotFound)
    /// if no such event exists, or another error if the backend
    /// rejects the write.
    async fn update_event(&self, id: uuid::Uuid, event: NewEvent) -> StoreResult<Event>;

    /// Deletes the event identified by `id`.
    ///
    /// ## Errors
    /// Returns [`StoreError::EventNotFound`](crate::error::StoreError::EventNotFound)
    /// if no such event exists.
    async fn delete_event(&self, id: uuid::Uuid) -> StoreResult<()>;

    /// Deletes a batch of events.
    ///
    /// ## Errors
    /// Returns [`StoreError::EventNotFound`](crate::error::StoreError::EventNotFound)
    /// for the first id with no backing record.
    async fn delete_events(&self, ids: &[uuid::Uuid]) -> StoreResult<()>;

    /// Replaces the full ticket-template set of one event, returning
    /// the created records in input order.
    ///
    /// ## Errors
    /// Returns [`StoreError::EventNotFound`](crate::error::StoreError::EventNotFound)
    /// if the event does not exist, or another error if the backend
    /// rejects the write.
    async fn replace_ticket_templates(
        &self,
        event_id: uuid::Uuid,
        tickets: Vec<NewTicketTemplate>,
    ) -> StoreResult<Vec<TicketTemplate>>;

    /// Persists ticket templates for events that already carry their
    /// own sets, returning the created records in input order.
    ///
    /// ## Errors
    /// Returns [`StoreError::EventNotFound`](crate::error::StoreError::EventNotFound)
    /// if a ticket references a missing event.
    async fn create_ticket_templates(
        &self,
        tickets: Vec<NewTicketTemplate>,
    ) -> StoreResult<Vec<TicketTemplate>>;

    /// Lists every ticket template in the store, used to refresh
    /// caller-visible state after a batch of writes.
    ///
    /// ## Errors
    /// Returns an error if the backend cannot be read.
    async fn list_event_tickets(&self) -> StoreResult<Vec<TicketTemplate>>;
}
