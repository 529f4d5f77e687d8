use cadence_core::model::event::Event;

/// Existing children of a template, partitioned by whether they must
/// survive resynchronization.
#[derive(Debug, Default)]
pub struct ClassifiedOccurrences {
    /// Completed or individually overridden occurrences. Never deleted
    /// or regenerated, including their ticket templates.
    pub preserved: Vec<Event>,
    /// Everything else; replaced wholesale on every resync.
    pub regenerable: Vec<Event>,
}

/// Partitions the existing children of a template. Pure; issues no
/// persistence calls.
#[must_use]
pub fn classify(existing_children: Vec<Event>) -> ClassifiedOccurrences {
    let (preserved, regenerable): (Vec<Event>, Vec<Event>) = existing_children
        .into_iter()
        .partition(Event::is_preserved);
    ClassifiedOccurrences {
        preserved,
        regenerable,
    }
}
