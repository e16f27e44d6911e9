//! Cross-table report filters.
//!
//! A report always runs over a date range. Entity filters (client, project,
//! ...) are optional and only reach the tables that declare support for
//! them in the catalog.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::ConfigError;

/// Entity filter value meaning "do not filter".
pub const ALL: &str = "all";

/// Date format accepted for `date_start` / `date_end`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters shared by every table in a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    /// Filter name -> value, e.g. `cliente_id -> 42`.
    #[serde(default)]
    pub entity_filters: BTreeMap<String, String>,
}

/// A validated, inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterSet {
    /// Filters covering `start..=end` (ISO `YYYY-MM-DD`).
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            date_start: Some(start.into()),
            date_end: Some(end.into()),
            entity_filters: BTreeMap::new(),
        }
    }

    pub fn with_entity(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_entity(name, value);
        self
    }

    /// Set an entity filter. Blank values and [`ALL`] clear it.
    pub fn set_entity(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if is_unset(&value) {
            self.entity_filters.remove(&name);
        } else {
            self.entity_filters.insert(name, value);
        }
    }

    /// Entity filters that actually restrict rows.
    pub fn active_entity_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entity_filters
            .iter()
            .filter(|(_, value)| !is_unset(value))
            .map(|(name, value)| (name.as_str(), value.trim()))
    }

    /// Both date bounds, when both are present and non-blank.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let start = non_blank(&self.date_start)?;
        let end = non_blank(&self.date_end)?;
        Some((start, end))
    }

    /// Both date bounds rewritten as zero-padded `YYYY-MM-DD`, so they order
    /// correctly against stored ISO dates. Bounds that do not parse are kept
    /// as given; [`FilterSet::validate`] rejects them before a run.
    pub fn normalized_date_range(&self) -> Option<(String, String)> {
        let (start, end) = self.date_range()?;
        Some((normalize_date(start), normalize_date(end)))
    }

    /// Check that the mandatory date range is present, parseable and ordered.
    pub fn validate(&self) -> Result<DateRange, ConfigError> {
        let start = non_blank(&self.date_start).ok_or(ConfigError::MissingDateStart)?;
        let end = non_blank(&self.date_end).ok_or(ConfigError::MissingDateEnd)?;

        let range = DateRange {
            start: parse_date(start)?,
            end: parse_date(end)?,
        };

        if range.end < range.start {
            return Err(ConfigError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(range)
    }

    /// Replace the date range with the one a preset resolves to.
    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        let range = preset.resolve(today);
        self.date_start = Some(range.start.format(DATE_FORMAT).to_string());
        self.date_end = Some(range.end.format(DATE_FORMAT).to_string());
    }
}

/// Quick date ranges offered next to the date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    ThisMonth,
    LastMonth,
    ThisYear,
    /// The 30 days ending today, inclusive.
    Last30Days,
}

impl DatePreset {
    /// Resolve the preset relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            DatePreset::Today => DateRange {
                start: today,
                end: today,
            },
            DatePreset::ThisMonth => month_of(today),
            DatePreset::LastMonth => {
                let first = first_of_month(today);
                month_of(first.pred_opt().unwrap_or(first))
            }
            DatePreset::ThisYear => DateRange {
                start: NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                end: NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
            },
            DatePreset::Last30Days => DateRange {
                start: today - Duration::days(29),
                end: today,
            },
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_of(date: NaiveDate) -> DateRange {
    let start = first_of_month(date);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    DateRange { start, end }
}

fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        value: value.to_string(),
    })
}

fn normalize_date(value: &str) -> String {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}
