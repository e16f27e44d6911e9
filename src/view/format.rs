//! Cell formatting by [`FormatterKind`].
//!
//! Missing and null cells render as the placeholder. Values that do not
//! fit their column's type are shown raw rather than rejected.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::column::{ColumnDescriptor, FormatterKind};
use crate::config::FormatSettings;
use crate::engine::DisplayRow;
use crate::storage::CellValue;

/// Formats cells with locale settings.
#[derive(Debug, Clone, Default)]
pub struct CellFormatter {
    settings: FormatSettings,
}

impl CellFormatter {
    pub fn new(settings: FormatSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    pub fn placeholder(&self) -> &str {
        &self.settings.placeholder
    }

    /// Format one cell of `column` in `row`.
    pub fn format_cell(&self, column: &ColumnDescriptor, row: &DisplayRow) -> String {
        self.format(column.formatter, row.get(&column.key))
    }

    /// Format a column total.
    pub fn format_total(&self, column: &ColumnDescriptor, total: f64) -> String {
        match column.formatter {
            FormatterKind::Currency => self.currency(total),
            _ => self.number(total),
        }
    }

    pub fn format(&self, kind: FormatterKind, value: Option<&CellValue>) -> String {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return self.settings.placeholder.clone();
        };

        match kind {
            FormatterKind::Currency => value
                .as_f64()
                .map(|n| self.currency(n))
                .unwrap_or_else(|| value.to_string()),
            FormatterKind::Number => value
                .as_f64()
                .map(|n| self.number(n))
                .unwrap_or_else(|| value.to_string()),
            FormatterKind::Date => self.date(value),
            FormatterKind::Boolean => self.boolean(value),
            FormatterKind::Text => value.to_string(),
        }
    }

    /// `R$ 1.234,56`; negatives as `-R$ 1.234,56`.
    pub fn currency(&self, value: f64) -> String {
        let body = self.grouped(value.abs(), self.settings.currency_decimals, false);
        format!(
            "{}{} {}",
            sign(value, &body),
            self.settings.currency_symbol,
            body
        )
    }

    /// Thousands-grouped with up to `number_max_decimals` fraction digits.
    pub fn number(&self, value: f64) -> String {
        let body = self.grouped(value.abs(), self.settings.number_max_decimals, true);
        format!("{}{}", sign(value, &body), body)
    }

    fn grouped(&self, value: f64, decimals: usize, trim_fraction: bool) -> String {
        let raw = format!("{:.prec$}", value, prec = decimals);
        let (integer, fraction) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
        let fraction = if trim_fraction {
            fraction.trim_end_matches('0')
        } else {
            fraction
        };

        let mut result = add_thousands_separator(integer, &self.settings.thousands_separator);
        if !fraction.is_empty() {
            result.push_str(&self.settings.decimal_separator);
            result.push_str(fraction);
        }
        result
    }

    fn date(&self, value: &CellValue) -> String {
        let CellValue::Text(text) = value else {
            return value.to_string();
        };

        let Some(date) = parse_date(text.trim()) else {
            return text.clone();
        };

        // An invalid format string makes chrono's Display fail; show ISO instead.
        let mut formatted = String::new();
        match write!(formatted, "{}", date.format(&self.settings.date_format)) {
            Ok(()) => formatted,
            Err(_) => date.to_string(),
        }
    }

    fn boolean(&self, value: &CellValue) -> String {
        let flag = match value {
            CellValue::Bool(b) => Some(*b),
            CellValue::Number(n) => Some(*n != 0.0),
            CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Some(true),
                "false" | "f" | "0" => Some(false),
                _ => None,
            },
            CellValue::Null => None,
        };

        match flag {
            Some(true) => self.settings.true_label.clone(),
            Some(false) => self.settings.false_label.clone(),
            None => value.to_string(),
        }
    }
}

fn sign(value: f64, body: &str) -> &'static str {
    let nonzero = body.chars().any(|c| c.is_ascii_digit() && c != '0');
    if value < 0.0 && nonzero {
        "-"
    } else {
        ""
    }
}

/// Add thousands separators to a string of ASCII digits.
fn add_thousands_separator(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3 * separator.len());

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(c);
    }

    result
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive timestamps.
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
