//! Recurring-event synchronization engine.
//!
//! Expands a structured recurrence rule into concrete calendar dates,
//! classifies and diffs the existing occurrences of a series, clones
//! ticket definitions onto newly generated occurrences, and
//! orchestrates the multi-step persistence workflow that keeps a
//! template and its occurrences consistent.

pub mod classify;
pub mod diff;
pub mod error;
pub mod expand;
pub mod synchronizer;
pub mod tickets;
