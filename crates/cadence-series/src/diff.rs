use std::collections::HashSet;

use chrono::NaiveDate;

use cadence_core::model::event::Event;

/// Writes implied by comparing a rule expansion against the existing
/// children of a template.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeriesDiff {
    /// Expanded dates with no preserved occurrence covering them; each
    /// gets a freshly generated occurrence.
    pub dates_to_create: Vec<NaiveDate>,
    /// Every regenerable child. Regenerable occurrences are replaced
    /// wholesale rather than patched, so template field changes can
    /// never drift out of sync.
    pub ids_to_delete: Vec<uuid::Uuid>,
}

/// Computes the creates and deletes a resynchronization must issue.
/// A regenerable occurrence sharing a date with the expansion does not
/// count as covering that date; it is deleted and recreated.
#[must_use]
pub fn diff(
    expanded_dates: &[NaiveDate],
    preserved: &[Event],
    regenerable: &[Event],
) -> SeriesDiff {
    let covered: HashSet<NaiveDate> = preserved.iter().map(|event| event.start_date).collect();
    SeriesDiff {
        dates_to_create: expanded_dates
            .iter()
            .copied()
            .filter(|date| !covered.contains(date))
            .collect(),
        ids_to_delete: regenerable.iter().map(|event| event.id).collect(),
    }
}
