//! Save-path orchestration for events, series templates, and their
//! generated occurrences.

use std::sync::Arc;

use futures::future;
use tokio::sync::RwLock;

use cadence_core::error::CoreError;
use cadence_core::model::event::{Event, EventDraft, NewEvent};
use cadence_core::model::rule::RecurrenceRule;
use cadence_core::model::ticket::{NewTicketTemplate, TicketDraft, TicketTemplate};
use cadence_store::store::EventStore;

use crate::classify::{ClassifiedOccurrences, classify};
use crate::diff::{SeriesDiff, diff};
use crate::error::{SaveStep, SeriesError, SeriesResult};
use crate::expand::{ExpandOptions, expand_with};
use crate::tickets::propagate;

/// Prior relationship of a submitted event, derived once per save and
/// matched exhaustively to select the save path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRelationship {
    /// No persisted id yet.
    New,
    /// Persisted, no rule, no parent.
    Standalone { id: uuid::Uuid },
    /// Generated occurrence of a template.
    Occurrence {
        id: uuid::Uuid,
        parent_id: uuid::Uuid,
    },
    /// Series template.
    Template { id: uuid::Uuid },
}

fn relationship_of(event: &Event) -> SeriesResult<EventRelationship> {
    match (event.is_template, event.parent_event_id) {
        (true, Some(_)) => Err(CoreError::InvariantViolation(
            "an event cannot be both a template and a generated occurrence",
        )
        .into()),
        (true, None) => Ok(EventRelationship::Template { id: event.id }),
        (false, Some(parent_id)) => Ok(EventRelationship::Occurrence {
            id: event.id,
            parent_id,
        }),
        (false, None) => Ok(EventRelationship::Standalone { id: event.id }),
    }
}

fn attach(drafts: &[TicketDraft], event_id: uuid::Uuid) -> Vec<NewTicketTemplate> {
    drafts.iter().map(|draft| draft.for_event(event_id)).collect()
}

/// ## Summary
/// Orchestrates every save and delete of events against the
/// persistence store, keeping a template and its generated
/// occurrences consistent.
///
/// Holds the caller-visible event and ticket collections; they are
/// seeded at construction and updated to the new authoritative state
/// after each completed workflow. The template write is always
/// committed before any child write referencing it; independent child
/// and ticket writes may run concurrently.
///
/// Concurrent edits of the same template are not coordinated: the last
/// completed save wins wholesale.
pub struct SeriesSynchronizer<S> {
    store: Arc<S>,
    options: ExpandOptions,
    events: RwLock<Vec<Event>>,
    tickets: RwLock<Vec<TicketTemplate>>,
}

impl<S: EventStore> SeriesSynchronizer<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_state(store, Vec::new(), Vec::new())
    }

    /// Creates a synchronizer seeded with previously loaded state.
    #[must_use]
    pub fn with_state(
        store: Arc<S>,
        events: Vec<Event>,
        tickets: Vec<TicketTemplate>,
    ) -> Self {
        Self {
            store,
            options: ExpandOptions::default(),
            events: RwLock::new(events),
            tickets: RwLock::new(tickets),
        }
    }

    #[must_use]
    pub fn with_expand_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    /// Snapshot of the authoritative event collection.
    pub async fn events(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }

    /// Snapshot of the authoritative ticket collection.
    pub async fn tickets(&self) -> Vec<TicketTemplate> {
        self.tickets.read().await.clone()
    }

    /// ## Summary
    /// Saves a submitted event, its ticket set, and its recurrence
    /// rule (or `None`), dispatching to the save path implied by the
    /// event's prior relationship.
    ///
    /// ## Side Effects
    /// Issues the persistence calls of the selected path and updates
    /// the in-memory event and ticket collections once all writes have
    /// completed.
    ///
    /// ## Errors
    /// Returns [`SeriesError::InvalidRule`] before any write if the
    /// rule fails validation or expansion, [`SeriesError::NotFound`]
    /// if the draft references an id that no longer exists, and
    /// [`SeriesError::Persistence`] if a store call fails; steps after
    /// a failed call are not attempted and no completed write is
    /// rolled back.
    #[tracing::instrument(skip(self, draft, tickets, rule), fields(
        event_id = ?draft.id,
        has_rule = rule.is_some(),
    ))]
    pub async fn save_event(
        &self,
        draft: EventDraft,
        tickets: &[TicketDraft],
        rule: Option<RecurrenceRule>,
    ) -> SeriesResult<()> {
        let relationship = match draft.id {
            None => EventRelationship::New,
            Some(id) => {
                let events = self.events.read().await;
                let existing = events
                    .iter()
                    .find(|event| event.id == id)
                    .ok_or(SeriesError::NotFound(id))?;
                relationship_of(existing)?
            }
        };

        match (relationship, rule) {
            (EventRelationship::New, None) => {
                tracing::debug!("Save path: create standalone");
                self.persist_single(None, draft.into_standalone(), tickets)
                    .await
            }
            (EventRelationship::New, Some(rule)) => {
                tracing::debug!("Save path: create series");
                self.create_series(draft, tickets, rule).await
            }
            (EventRelationship::Standalone { id }, None) => {
                tracing::debug!(%id, "Save path: update standalone");
                self.persist_single(Some(id), draft.into_standalone(), tickets)
                    .await
            }
            (EventRelationship::Standalone { id }, Some(rule)) => {
                tracing::debug!(%id, "Save path: convert standalone to series");
                self.convert_to_series(id, draft, tickets, rule).await
            }
            (EventRelationship::Occurrence { id, parent_id }, submitted_rule) => {
                if submitted_rule.is_some() {
                    tracing::warn!(%id, "Rule submitted with a single occurrence; ignored");
                }
                tracing::debug!(%id, %parent_id, "Save path: update single occurrence");
                self.persist_single(Some(id), draft.into_override(parent_id), tickets)
                    .await
            }
            (EventRelationship::Template { id }, rule) => {
                tracing::debug!(%id, rule_removed = rule.is_none(), "Save path: update series");
                self.update_series(id, draft, tickets, rule).await
            }
        }
    }

    /// ## Summary
    /// Deletes an event; for a series template the deletion cascades
    /// to all of its current children, preserved ones included.
    ///
    /// ## Errors
    /// Returns [`SeriesError::NotFound`] if a targeted record is
    /// already gone and [`SeriesError::Persistence`] on store
    /// failures.
    #[tracing::instrument(skip(self, event), fields(
        event_id = %event.id,
        is_template = event.is_template,
    ))]
    pub async fn delete_event_or_series(&self, event: &Event) -> SeriesResult<()> {
        let child_ids: Vec<uuid::Uuid> = if event.is_template {
            self.events
                .read()
                .await
                .iter()
                .filter(|candidate| candidate.parent_event_id == Some(event.id))
                .map(|candidate| candidate.id)
                .collect()
        } else {
            Vec::new()
        };

        if !child_ids.is_empty() {
            tracing::debug!(children = child_ids.len(), "Cascading series deletion");
            self.store
                .delete_events(&child_ids)
                .await
                .map_err(SeriesError::at_step(SaveStep::OccurrenceDelete))?;
        }
        self.store
            .delete_event(event.id)
            .await
            .map_err(SeriesError::at_step(SaveStep::ParentWrite))?;

        {
            let mut events = self.events.write().await;
            events.retain(|candidate| {
                candidate.id != event.id && !child_ids.contains(&candidate.id)
            });
        }
        self.refresh_tickets().await
    }

    /// Single-row save shared by the standalone and occurrence paths:
    /// write the event, replace its ticket set, refresh state.
    async fn persist_single(
        &self,
        id: Option<uuid::Uuid>,
        record: NewEvent,
        tickets: &[TicketDraft],
    ) -> SeriesResult<()> {
        let saved = match id {
            None => self
                .store
                .create_event(record)
                .await
                .map_err(SeriesError::at_step(SaveStep::ParentWrite))?,
            Some(id) => self
                .store
                .update_event(id, record)
                .await
                .map_err(SeriesError::at_step(SaveStep::ParentWrite))?,
        };
        self.store
            .replace_ticket_templates(saved.id, attach(tickets, saved.id))
            .await
            .map_err(SeriesError::at_step(SaveStep::ParentTickets))?;

        {
            let mut events = self.events.write().await;
            events.retain(|candidate| candidate.id != saved.id);
            events.push(saved);
        }
        self.refresh_tickets().await
    }

    async fn create_series(
        &self,
        draft: EventDraft,
        tickets: &[TicketDraft],
        rule: RecurrenceRule,
    ) -> SeriesResult<()> {
        let dates = expand_with(&rule, draft.start_date, self.options)?;
        let template = self
            .store
            .create_event(draft.into_template(rule))
            .await
            .map_err(SeriesError::at_step(SaveStep::ParentWrite))?;
        let plan = diff(&dates, &[], &[]);
        self.resync(&template, tickets, &plan).await
    }

    async fn convert_to_series(
        &self,
        id: uuid::Uuid,
        draft: EventDraft,
        tickets: &[TicketDraft],
        rule: RecurrenceRule,
    ) -> SeriesResult<()> {
        let dates = expand_with(&rule, draft.start_date, self.options)?;
        let template = self
            .store
            .update_event(id, draft.into_template(rule))
            .await
            .map_err(SeriesError::at_step(SaveStep::ParentWrite))?;
        // A standalone has no children, so the whole expansion is
        // created fresh; the anchor date is covered exactly once, by
        // its generated child.
        let plan = diff(&dates, &[], &[]);
        self.resync(&template, tickets, &plan).await
    }

    async fn update_series(
        &self,
        id: uuid::Uuid,
        draft: EventDraft,
        tickets: &[TicketDraft],
        rule: Option<RecurrenceRule>,
    ) -> SeriesResult<()> {
        let children: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.parent_event_id == Some(id))
            .cloned()
            .collect();
        let ClassifiedOccurrences {
            preserved,
            regenerable,
        } = classify(children);

        let (shape, plan) = match rule {
            Some(rule) => {
                let dates = expand_with(&rule, draft.start_date, self.options)?;
                let plan = diff(&dates, &preserved, &regenerable);
                (draft.into_template(rule), plan)
            }
            // Rule removed: the series collapses to its preserved
            // occurrences and the row reverts to a standalone.
            None => (
                draft.into_standalone(),
                SeriesDiff {
                    dates_to_create: Vec::new(),
                    ids_to_delete: regenerable.iter().map(|event| event.id).collect(),
                },
            ),
        };

        tracing::debug!(
            preserved = preserved.len(),
            creates = plan.dates_to_create.len(),
            deletes = plan.ids_to_delete.len(),
            "Resynchronizing series"
        );

        let template = self
            .store
            .update_event(id, shape)
            .await
            .map_err(SeriesError::at_step(SaveStep::ParentWrite))?;
        self.resync(&template, tickets, &plan).await
    }

    /// Executes a resynchronization plan against an already-written
    /// parent: replace the parent's tickets, delete regenerable
    /// children, create occurrences for the planned dates, then clone
    /// tickets onto the new occurrences. The first three writes are
    /// independent of one another and run concurrently; ticket cloning
    /// waits on the created children for their assigned ids.
    async fn resync(
        &self,
        template: &Event,
        tickets: &[TicketDraft],
        plan: &SeriesDiff,
    ) -> SeriesResult<()> {
        let occurrence_rows: Vec<NewEvent> = plan
            .dates_to_create
            .iter()
            .map(|date| NewEvent::occurrence_of(template, *date))
            .collect();
        let ticket_rows = attach(tickets, template.id);

        let replace_tickets = async {
            self.store
                .replace_ticket_templates(template.id, ticket_rows)
                .await
                .map_err(SeriesError::at_step(SaveStep::ParentTickets))
        };
        let delete_children = async {
            if plan.ids_to_delete.is_empty() {
                Ok(())
            } else {
                self.store
                    .delete_events(&plan.ids_to_delete)
                    .await
                    .map_err(SeriesError::at_step(SaveStep::OccurrenceDelete))
            }
        };
        let create_children = async {
            if occurrence_rows.is_empty() {
                Ok(Vec::new())
            } else {
                self.store
                    .create_events(occurrence_rows)
                    .await
                    .map_err(SeriesError::at_step(SaveStep::OccurrenceCreate))
            }
        };
        let (parent_tickets, (), created_children) =
            future::try_join3(replace_tickets, delete_children, create_children).await?;

        let clones = propagate(&parent_tickets, &created_children);
        if !clones.is_empty() {
            self.store
                .create_ticket_templates(clones)
                .await
                .map_err(SeriesError::at_step(SaveStep::TicketPropagation))?;
        }

        {
            let mut events = self.events.write().await;
            events.retain(|candidate| {
                candidate.id != template.id && !plan.ids_to_delete.contains(&candidate.id)
            });
            events.push(template.clone());
            events.extend(created_children);
        }
        self.refresh_tickets().await
    }

    async fn refresh_tickets(&self) -> SeriesResult<()> {
        let listed = self
            .store
            .list_event_tickets()
            .await
            .map_err(SeriesError::at_step(SaveStep::TicketRefresh))?;
        *self.tickets.write().await = listed;
        Ok(())
    }
}
