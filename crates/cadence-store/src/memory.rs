use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cadence_core::model::event::{Event, NewEvent};
use cadence_core::model::ticket::{NewTicketTemplate, TicketTemplate};

use crate::error::{StoreError, StoreResult};
use crate::store::EventStore;

#[derive(Debug, Default)]
struct MemoryInner {
    events: HashMap<uuid::Uuid, Event>,
    tickets: HashMap<uuid::Uuid, TicketTemplate>,
}

/// In-memory [`EventStore`] implementation.
///
/// Backs the engine's test suite and embedders that have no remote
/// store. Deleting an event drops its ticket templates with it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events, ordered by start date then title for
    /// deterministic assertions.
    pub async fn events(&self) -> Vec<Event> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner.events.values().cloned().collect();
        events.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.title.cmp(&b.title))
        });
        events
    }

    pub async fn event(&self, id: uuid::Uuid) -> Option<Event> {
        self.inner.read().await.events.get(&id).cloned()
    }

    pub async fn tickets_for_event(&self, event_id: uuid::Uuid) -> Vec<TicketTemplate> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<TicketTemplate> = inner
            .tickets
            .values()
            .filter(|ticket| ticket.event_id == event_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| a.name.cmp(&b.name));
        tickets
    }
}

fn persist_event(id: uuid::Uuid, record: NewEvent) -> Event {
    Event {
        id,
        parent_event_id: record.parent_event_id,
        is_template: record.is_template,
        is_override: record.is_override,
        recurrence_rule: record.recurrence_rule,
        title: record.title,
        description: record.description,
        venue: record.venue,
        start_date: record.start_date,
        end_date: record.end_date,
        start_time: record.start_time,
        end_time: record.end_time,
        all_day: record.all_day,
        status: record.status,
    }
}

fn persist_ticket(id: uuid::Uuid, record: NewTicketTemplate) -> TicketTemplate {
    TicketTemplate {
        id,
        event_id: record.event_id,
        name: record.name,
        capacity: record.capacity,
        price: record.price,
        sold_count: record.sold_count,
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, event: NewEvent) -> StoreResult<Event> {
        let mut inner = self.inner.write().await;
        let created = persist_event(uuid::Uuid::new_v4(), event);
        inner.events.insert(created.id, created.clone());
        Ok(created)
    }

    async fn create_events(&self, events: Vec<NewEvent>) -> StoreResult<Vec<Event>> {
        let mut inner = self.inner.write().await;
        let mut created = Vec::with_capacity(events.len());
        for event in events {
            let record = persist_event(uuid::Uuid::new_v4(), event);
            inner.events.insert(record.id, record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn update_event(&self, id: uuid::Uuid, event: NewEvent) -> StoreResult<Event> {
        let mut inner = self.inner.write().await;
        if !inner.events.contains_key(&id) {
            return Err(StoreError::EventNotFound(id));
        }
        let updated = persist_event(id, event);
        inner.events.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_event(&self, id: uuid::Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.events.remove(&id).is_none() {
            return Err(StoreError::EventNotFound(id));
        }
        inner.tickets.retain(|_, ticket| ticket.event_id != id);
        Ok(())
    }

    async fn delete_events(&self, ids: &[uuid::Uuid]) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        for id in ids {
            if inner.events.remove(id).is_none() {
                return Err(StoreError::EventNotFound(*id));
            }
        }
        inner
            .tickets
            .retain(|_, ticket| !ids.contains(&ticket.event_id));
        Ok(())
    }

    async fn replace_ticket_templates(
        &self,
        event_id: uuid::Uuid,
        tickets: Vec<NewTicketTemplate>,
    ) -> StoreResult<Vec<TicketTemplate>> {
        let mut inner = self.inner.write().await;
        if !inner.events.contains_key(&event_id) {
            return Err(StoreError::EventNotFound(event_id));
        }
        inner.tickets.retain(|_, ticket| ticket.event_id != event_id);
        let mut created = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let record = persist_ticket(uuid::Uuid::new_v4(), ticket);
            inner.tickets.insert(record.id, record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn create_ticket_templates(
        &self,
        tickets: Vec<NewTicketTemplate>,
    ) -> StoreResult<Vec<TicketTemplate>> {
        let mut inner = self.inner.write().await;
        if let Some(orphan) = tickets
            .iter()
            .find(|ticket| !inner.events.contains_key(&ticket.event_id))
        {
            return Err(StoreError::EventNotFound(orphan.event_id));
        }
        let mut created = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let record = persist_ticket(uuid::Uuid::new_v4(), ticket);
            inner.tickets.insert(record.id, record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn list_event_tickets(&self) -> StoreResult<Vec<TicketTemplate>> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<TicketTemplate> = inner.tickets.values().cloned().collect();
        tickets.sort_by(|a, b| {
            a.event_id
                .cmp(&b.event_id)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(tickets)
    }
}
