//! Recurrence expansion using the `rrule` crate.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use rrule::{RRule, Tz, Unvalidated};

use cadence_core::config::LimitsConfig;
use cadence_core::model::rule::{EndCondition, Frequency, RecurrenceRule};

use crate::error::{SeriesError, SeriesResult};

/// Default hard cap on the number of dates one rule may produce.
pub const DEFAULT_MAX_OCCURRENCES: u16 = 1000;

/// Options for recurrence expansion.
#[derive(Debug, Clone, Copy)]
pub struct ExpandOptions {
    /// Maximum number of dates to generate before the rule is
    /// considered unbounded.
    pub max_occurrences: u16,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl From<&LimitsConfig> for ExpandOptions {
    fn from(limits: &LimitsConfig) -> Self {
        Self {
            max_occurrences: limits.max_occurrences,
        }
    }
}

/// Maps a weekday index (0=Sunday through 6=Saturday) to the BYDAY
/// code the rule engine expects. Indices never leave this module in
/// any other form.
const fn byday_code(index: u8) -> Option<&'static str> {
    match index {
        0 => Some("SU"),
        1 => Some("MO"),
        2 => Some("TU"),
        3 => Some("WE"),
        4 => Some("TH"),
        5 => Some("FR"),
        6 => Some("SA"),
        _ => None,
    }
}

const fn freq_token(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "DAILY",
        Frequency::Weekly => "WEEKLY",
        Frequency::Monthly => "MONTHLY",
    }
}

fn rrule_text(rule: &RecurrenceRule) -> String {
    let mut parts = vec![
        format!("FREQ={}", freq_token(rule.frequency)),
        format!("INTERVAL={}", rule.interval),
    ];
    // Weekday filters are meaningful for weekly rules only.
    if rule.frequency == Frequency::Weekly
        && let Some(days) = &rule.days_of_week
    {
        let codes: Vec<&str> = days
            .iter()
            .copied()
            .collect::<BTreeSet<u8>>()
            .into_iter()
            .filter_map(byday_code)
            .collect();
        parts.push(format!("BYDAY={}", codes.join(",")));
    }
    match rule.end_condition {
        EndCondition::Count(count) => parts.push(format!("COUNT={count}")),
        // Inclusive end date: terminate at the end of that day.
        EndCondition::Date(until) => {
            parts.push(format!("UNTIL={}T235959Z", until.format("%Y%m%d")));
        }
    }
    parts.join(";")
}

/// ## Summary
/// Expands a recurrence rule into the ordered, deduplicated sequence
/// of calendar dates it implies, starting at `start_date`.
///
/// The start date itself is the first element whenever it matches the
/// rule; a weekly rule whose weekday set excludes the start date
/// begins on the first matching day after it.
///
/// ## Errors
/// Returns [`SeriesError::InvalidRule`] if the rule is structurally
/// invalid, its end date precedes `start_date`, or the expansion
/// exceeds the default occurrence cap.
pub fn expand(rule: &RecurrenceRule, start_date: NaiveDate) -> SeriesResult<Vec<NaiveDate>> {
    expand_with(rule, start_date, ExpandOptions::default())
}

/// ## Summary
/// Expands a recurrence rule with explicit [`ExpandOptions`].
///
/// ## Errors
/// Returns [`SeriesError::InvalidRule`] if the rule is structurally
/// invalid, its end date precedes `start_date`, or the expansion
/// exceeds `options.max_occurrences`.
pub fn expand_with(
    rule: &RecurrenceRule,
    start_date: NaiveDate,
    options: ExpandOptions,
) -> SeriesResult<Vec<NaiveDate>> {
    rule.validate()
        .map_err(|err| SeriesError::InvalidRule(err.to_string()))?;
    if let EndCondition::Date(until) = rule.end_condition
        && until < start_date
    {
        return Err(SeriesError::InvalidRule(format!(
            "end date {until} precedes start date {start_date}"
        )));
    }

    let source = rrule_text(rule);
    tracing::trace!(rrule = %source, %start_date, "Expanding recurrence rule");

    let unvalidated = source
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| SeriesError::InvalidRule(err.to_string()))?;
    let dt_start = start_date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .with_timezone(&Tz::UTC);
    let rrule_set = unvalidated
        .build(dt_start)
        .map_err(|err| SeriesError::InvalidRule(err.to_string()))?;

    let result = rrule_set.all(options.max_occurrences);
    if result.limited {
        return Err(SeriesError::InvalidRule(format!(
            "rule expands to more than {} occurrences",
            options.max_occurrences
        )));
    }

    let mut dates: Vec<NaiveDate> = result
        .dates
        .into_iter()
        .map(|occurrence| occurrence.date_naive())
        .collect();
    dates.dedup();
    Ok(dates)
}
