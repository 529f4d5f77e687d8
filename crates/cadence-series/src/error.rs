use thiserror::Error;

use cadence_core::error::CoreError;
use cadence_store::error::StoreError;

/// Stage of the save workflow a persistence call belongs to. Reported
/// with persistence failures so callers know how far a partially
/// completed save got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveStep {
    ParentWrite,
    ParentTickets,
    OccurrenceDelete,
    OccurrenceCreate,
    TicketPropagation,
    TicketRefresh,
}

impl SaveStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParentWrite => "parent write",
            Self::ParentTickets => "parent ticket replace",
            Self::OccurrenceDelete => "occurrence delete",
            Self::OccurrenceCreate => "occurrence create",
            Self::TicketPropagation => "ticket propagation",
            Self::TicketRefresh => "ticket refresh",
        }
    }
}

impl std::fmt::Display for SaveStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronization engine errors
#[derive(Error, Debug)]
pub enum SeriesError {
    /// The submitted rule is malformed or unbounded. Raised before any
    /// persistence call is issued.
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Event not found: {0}")]
    NotFound(uuid::Uuid),

    /// A persistence call failed mid-workflow. Steps before `step`
    /// have completed; later steps were not attempted.
    #[error("Persistence failed during {step}: {source}")]
    Persistence { step: SaveStep, source: StoreError },

    #[error(transparent)]
    CoreError(#[from] CoreError),
}

impl SeriesError {
    /// Maps a store failure at `step`, folding missing-record errors
    /// into [`SeriesError::NotFound`].
    pub(crate) fn at_step(step: SaveStep) -> impl Fn(StoreError) -> Self {
        move |source| match source {
            StoreError::EventNotFound(id) => Self::NotFound(id),
            other => Self::Persistence { step, source: other },
        }
    }
}

pub type SeriesResult<T> = std::result::Result<T, SeriesError>;
