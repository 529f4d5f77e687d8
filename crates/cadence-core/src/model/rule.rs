use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Recurrence frequency, deliberately bounded to the vocabulary the
/// engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Termination of a recurrence rule: either an inclusive final date or
/// an exact number of occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum EndCondition {
    Date(NaiveDate),
    Count(u32),
}

/// Structured recurrence rule as submitted by callers.
///
/// `days_of_week` holds weekday indices 0=Sunday through 6=Saturday
/// and is meaningful only for weekly rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
    pub end_condition: EndCondition,
}

impl RecurrenceRule {
    /// ## Summary
    /// Checks the structural validity of the rule.
    ///
    /// ## Errors
    /// Returns a validation error if the interval or occurrence count
    /// is zero, a weekday index is out of range, or a weekly rule
    /// names no weekdays.
    pub fn validate(&self) -> CoreResult<()> {
        if self.interval == 0 {
            return Err(CoreError::ValidationError(
                "recurrence interval must be at least 1".to_string(),
            ));
        }
        if let EndCondition::Count(0) = self.end_condition {
            return Err(CoreError::ValidationError(
                "occurrence count must be at least 1".to_string(),
            ));
        }
        if let Some(days) = &self.days_of_week
            && let Some(day) = days.iter().find(|day| **day > 6)
        {
            return Err(CoreError::ValidationError(format!(
                "weekday index {day} is out of range 0-6"
            )));
        }
        if self.frequency == Frequency::Weekly
            && self.days_of_week.as_ref().is_none_or(|days| days.is_empty())
        {
            return Err(CoreError::ValidationError(
                "weekly rules must name at least one weekday".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekly_rule() -> RecurrenceRule {
        RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 1,
            days_of_week: Some(vec![1, 3]),
            end_condition: EndCondition::Count(5),
        }
    }

    #[test]
    fn wire_shape_round_trips() {
        let rule = weekly_rule();
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "frequency": "weekly",
                "interval": 1,
                "daysOfWeek": [1, 3],
                "endCondition": { "type": "count", "value": 5 }
            })
        );

        let parsed: RecurrenceRule = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn date_end_condition_uses_iso_dates() {
        let rule = RecurrenceRule {
            frequency: Frequency::Daily,
            interval: 2,
            days_of_week: None,
            end_condition: EndCondition::Date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
        };

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json.get("endCondition").unwrap(),
            &serde_json::json!({ "type": "date", "value": "2024-06-30" })
        );
    }

    #[test]
    fn weekly_rule_without_weekdays_is_invalid() {
        let mut rule = weekly_rule();
        rule.days_of_week = Some(Vec::new());
        assert!(rule.validate().is_err());

        rule.days_of_week = None;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn zero_interval_and_zero_count_are_invalid() {
        let mut rule = weekly_rule();
        rule.interval = 0;
        assert!(rule.validate().is_err());

        let mut rule = weekly_rule();
        rule.end_condition = EndCondition::Count(0);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn out_of_range_weekday_is_invalid() {
        let mut rule = weekly_rule();
        rule.days_of_week = Some(vec![1, 7]);
        assert!(rule.validate().is_err());
    }
}
