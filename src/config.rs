//! Scheduling configuration.
//!
//! [`SchedulingOptions`] is an immutable value: hosts start from
//! [`Default`] and apply a partial [`SchedulingOverrides`] via
//! [`SchedulingOptions::merged`], which validates the result.
//!
//! # Wire format
//! camelCase JSON with working hours as `"HH:MM"` strings:
//!
//! ```json
//! { "workingHours": { "start": "09:00", "end": "18:00" },
//!   "bufferBetweenTasks": 15, "maxTasksPerDay": 8, "allowWeekends": false }
//! ```

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Free slots shorter than this are discarded (minutes).
pub const MIN_SLOT_MINUTES: i64 = 30;

/// How far past `now` an overdue task may be searched for (days).
pub const OVERDUE_HORIZON_DAYS: i64 = 365;

/// Parses an `HH:MM` time of day.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ConfigError::InvalidTimeOfDay(raw.to_string()))
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

/// Daily window within which tasks may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Start of the working day (inclusive).
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End of the working day (exclusive).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl WorkingHours {
    /// Creates working hours from times of day.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parses working hours from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_time_of_day(start)?, parse_time_of_day(end)?))
    }

    /// Length of the working window in minutes (negative if inverted).
    pub fn window_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        }
    }
}

/// Scheduling options.
///
/// Defaults: 09:00–18:00, 15 minute buffer, 8 tasks per day, weekdays only.
///
/// `max_tasks_per_day` is carried for hosts but not enforced by placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingOptions {
    /// Daily placement window.
    pub working_hours: WorkingHours,
    /// Gap kept after every occupied interval (minutes).
    pub buffer_between_tasks: u32,
    /// Reserved; not enforced.
    pub max_tasks_per_day: u32,
    /// Whether Saturday and Sunday are working days.
    pub allow_weekends: bool,
}

impl Default for SchedulingOptions {
    fn default() -> Self {
        Self {
            working_hours: WorkingHours::default(),
            buffer_between_tasks: 15,
            max_tasks_per_day: 8,
            allow_weekends: false,
        }
    }
}

impl SchedulingOptions {
    /// Sets the working hours.
    pub fn with_working_hours(mut self, working_hours: WorkingHours) -> Self {
        self.working_hours = working_hours;
        self
    }

    /// Sets the inter-task buffer (minutes).
    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_between_tasks = minutes;
        self
    }

    /// Sets the reserved per-day task cap.
    pub fn with_max_tasks_per_day(mut self, max: u32) -> Self {
        self.max_tasks_per_day = max;
        self
    }

    /// Allows or disallows weekend placement.
    pub fn with_weekends(mut self, allow: bool) -> Self {
        self.allow_weekends = allow;
        self
    }

    /// Inter-task buffer as a duration.
    #[inline]
    pub fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_between_tasks))
    }

    /// Checks that the options describe a usable working day.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = &self.working_hours;
        if hours.start >= hours.end {
            return Err(ConfigError::EmptyWorkingWindow {
                start: hours.start.format("%H:%M").to_string(),
                end: hours.end.format("%H:%M").to_string(),
            });
        }
        if hours.window_minutes() < MIN_SLOT_MINUTES {
            return Err(ConfigError::WorkingWindowTooShort {
                minutes: hours.window_minutes(),
                minimum: MIN_SLOT_MINUTES,
            });
        }
        if self.max_tasks_per_day == 0 {
            return Err(ConfigError::ZeroTasksPerDay);
        }
        Ok(())
    }

    /// Applies `overrides` on top of `self` and validates the result.
    pub fn merged(&self, overrides: &SchedulingOverrides) -> Result<Self, ConfigError> {
        let merged = Self {
            working_hours: overrides.working_hours.unwrap_or(self.working_hours),
            buffer_between_tasks: overrides
                .buffer_between_tasks
                .unwrap_or(self.buffer_between_tasks),
            max_tasks_per_day: overrides.max_tasks_per_day.unwrap_or(self.max_tasks_per_day),
            allow_weekends: overrides.allow_weekends.unwrap_or(self.allow_weekends),
        };
        merged.validate()?;
        Ok(merged)
    }
}

/// Partial options; `None` keeps the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingOverrides {
    /// Replaces the daily placement window.
    pub working_hours: Option<WorkingHours>,
    /// Replaces the inter-task buffer (minutes).
    pub buffer_between_tasks: Option<u32>,
    /// Replaces the reserved per-day task cap.
    pub max_tasks_per_day: Option<u32>,
    /// Replaces the weekend flag.
    pub allow_weekends: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SchedulingOptions::default();
        assert_eq!(opts.working_hours.start.format("%H:%M").to_string(), "09:00");
        assert_eq!(opts.working_hours.end.format("%H:%M").to_string(), "18:00");
        assert_eq!(opts.buffer_between_tasks, 15);
        assert_eq!(opts.max_tasks_per_day, 8);
        assert!(!opts.allow_weekends);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_merge_overrides() {
        let overrides = SchedulingOverrides {
            buffer_between_tasks: Some(0),
            allow_weekends: Some(true),
            ..Default::default()
        };
        let merged = SchedulingOptions::default().merged(&overrides).unwrap();
        assert_eq!(merged.buffer_between_tasks, 0);
        assert!(merged.allow_weekends);
        // Untouched fields keep the base value
        assert_eq!(merged.max_tasks_per_day, 8);
        assert_eq!(merged.working_hours, WorkingHours::default());
    }

    #[test]
    fn test_merge_rejects_inverted_hours() {
        let overrides = SchedulingOverrides {
            working_hours: Some(WorkingHours::parse("18:00", "09:00").unwrap()),
            ..Default::default()
        };
        let err = SchedulingOptions::default().merged(&overrides).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyWorkingWindow { .. }));
    }

    #[test]
    fn test_short_window_rejected() {
        let opts = SchedulingOptions::default()
            .with_working_hours(WorkingHours::parse("09:00", "09:20").unwrap());
        assert!(matches!(
            opts.validate(),
            Err(ConfigError::WorkingWindowTooShort { minutes: 20, .. })
        ));
    }

    #[test]
    fn test_zero_tasks_per_day_rejected() {
        let opts = SchedulingOptions::default().with_max_tasks_per_day(0);
        assert_eq!(opts.validate(), Err(ConfigError::ZeroTasksPerDay));
    }

    #[test]
    fn test_parse_time_of_day() {
        assert!(parse_time_of_day("07:30").is_ok());
        assert!(parse_time_of_day(" 07:30 ").is_ok());
        assert_eq!(
            parse_time_of_day("7h30"),
            Err(ConfigError::InvalidTimeOfDay("7h30".into()))
        );
    }

    #[test]
    fn test_json_wire_format() {
        let json = r#"{"workingHours":{"start":"08:30","end":"17:00"},"bufferBetweenTasks":10}"#;
        let opts: SchedulingOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.working_hours, WorkingHours::parse("08:30", "17:00").unwrap());
        assert_eq!(opts.buffer_between_tasks, 10);
        // Missing fields fall back to defaults
        assert_eq!(opts.max_tasks_per_day, 8);

        let out = serde_json::to_value(&opts).unwrap();
        assert_eq!(out["workingHours"]["start"], "08:30");
        assert_eq!(out["allowWeekends"], false);
    }

    #[test]
    fn test_json_rejects_bad_time() {
        let json = r#"{"workingHours":{"start":"nine","end":"17:00"}}"#;
        assert!(serde_json::from_str::<SchedulingOptions>(json).is_err());
    }
}
