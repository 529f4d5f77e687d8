use cadence_core::model::event::Event;
use cadence_core::model::ticket::{NewTicketTemplate, TicketTemplate};

/// Plans the ticket-template clones for a batch of newly generated
/// occurrences: one clone per (occurrence, parent ticket) pair, sold
/// count reset to zero. Preserved occurrences keep their own ticket
/// sets and never appear in `new_occurrences`.
#[must_use]
pub fn propagate(
    ticket_templates: &[TicketTemplate],
    new_occurrences: &[Event],
) -> Vec<NewTicketTemplate> {
    new_occurrences
        .iter()
        .flat_map(|occurrence| {
            ticket_templates
                .iter()
                .map(|ticket| NewTicketTemplate::clone_of(ticket, occurrence.id))
        })
        .collect()
}
