//! Schedule data models.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;

/// Preset send-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulePreset {
    /// Send after the given number of hours (1, 2, 4, 6 or 12).
    InHours(u8),
    /// Tomorrow at 9 AM.
    TomorrowAt9,
    /// Tomorrow at 2 PM.
    TomorrowAt14,
    /// The next Monday after today at 9 AM.
    NextMondayAt9,
}

impl SchedulePreset {
    /// Hour offsets offered as presets.
    pub const HOUR_OFFSETS: [u8; 5] = [1, 2, 4, 6, 12];

    /// Every preset, in menu order.
    pub const ALL: [Self; 8] = [
        Self::InHours(1),
        Self::InHours(2),
        Self::InHours(4),
        Self::InHours(6),
        Self::InHours(12),
        Self::TomorrowAt9,
        Self::TomorrowAt14,
        Self::NextMondayAt9,
    ];

    /// Creates an hour-offset preset, if `hours` is one of the offered offsets.
    #[must_use]
    pub fn in_hours(hours: u8) -> Option<Self> {
        Self::HOUR_OFFSETS
            .contains(&hours)
            .then_some(Self::InHours(hours))
    }

    /// Parse from a human label (`"in 2 hours"`, `"tomorrow at 9am"`) or a
    /// compact id (`"2h"`, `"tomorrow-9am"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the input names no known preset.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let unknown = || ValidationError::UnknownSchedulePreset(s.to_string());

        let preset = match normalized.as_str() {
            "tomorrow at 9am" | "tomorrow at 9 am" | "tomorrow-9am" => Some(Self::TomorrowAt9),
            "tomorrow at 2pm" | "tomorrow at 2 pm" | "tomorrow-2pm" => Some(Self::TomorrowAt14),
            "next monday at 9am" | "next monday at 9 am" | "next-monday-9am" => {
                Some(Self::NextMondayAt9)
            }
            other => Self::parse_hours(other),
        };
        preset.ok_or_else(unknown)
    }

    fn parse_hours(s: &str) -> Option<Self> {
        let hours = if let Some(compact) = s.strip_suffix('h') {
            compact
        } else {
            s.strip_prefix("in ")?
                .strip_suffix(" hours")
                .or_else(|| s.strip_prefix("in ")?.strip_suffix(" hour"))?
        };
        Self::in_hours(hours.trim().parse().ok()?)
    }

    /// Compact id.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::InHours(hours) => format!("{hours}h"),
            Self::TomorrowAt9 => "tomorrow-9am".to_string(),
            Self::TomorrowAt14 => "tomorrow-2pm".to_string(),
            Self::NextMondayAt9 => "next-monday-9am".to_string(),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::InHours(1) => "In 1 hour".to_string(),
            Self::InHours(hours) => format!("In {hours} hours"),
            Self::TomorrowAt9 => "Tomorrow at 9 AM".to_string(),
            Self::TomorrowAt14 => "Tomorrow at 2 PM".to_string(),
            Self::NextMondayAt9 => "Next Monday at 9 AM".to_string(),
        }
    }
}

impl fmt::Display for SchedulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// When an email should be sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScheduleSpec {
    /// Send now; no schedule.
    #[default]
    Immediate,
    /// A preset relative to the current time.
    Preset(SchedulePreset),
    /// Explicit wall-clock date and time.
    At {
        /// Calendar date.
        date: NaiveDate,
        /// Time of day.
        time: NaiveTime,
    },
    /// Input that named no known preset; resolves to no schedule.
    Unrecognized(String),
}

impl ScheduleSpec {
    /// Parse a symbolic spec. Never fails: unknown input is kept as
    /// [`ScheduleSpec::Unrecognized`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("immediate")
            || trimmed.eq_ignore_ascii_case("now")
        {
            return Self::Immediate;
        }
        SchedulePreset::parse(trimmed)
            .map_or_else(|_| Self::Unrecognized(trimmed.to_string()), Self::Preset)
    }

    /// Explicit date and time.
    #[must_use]
    pub const fn at(date: NaiveDate, time: NaiveTime) -> Self {
        Self::At { date, time }
    }

    /// Returns true if this spec resolves to a timestamp.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        matches!(self, Self::Preset(_) | Self::At { .. })
    }
}
