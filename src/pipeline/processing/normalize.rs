//! Per-field normalization of raw sheet cells.
//!
//! Every function here is total: malformed input is passed through or
//! defaulted, never rejected. The sheet is maintained by hand and the
//! dashboard would rather show odd text than drop a subscription.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_TEXT, SERIAL_MIN_DIGITS, SERIAL_PREFIX, TIMESTAMP_DISPLAY_FORMAT,
};
use crate::domain::Cell;

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit run pattern should be valid"));

/// Formats with an explicit offset that RFC 3339 parsing does not accept.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Offset-less ISO forms, read as wall-clock time in the display offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Convert any cell to trimmed text. Null and missing cells become "".
pub fn coerce_text(cell: Option<&Cell>) -> String {
    let text = match cell {
        None | Some(Cell::Null) => return String::new(),
        Some(Cell::String(s)) => return s.trim().to_string(),
        Some(Cell::Bool(b)) => b.to_string(),
        Some(Cell::Number(n)) => format_number(n),
        Some(Cell::Array(items)) => items
            .iter()
            .map(|item| coerce_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(obj @ Cell::Object(_)) => obj.to_string(),
    };
    text.trim().to_string()
}

/// Sheets hand back whole numbers as floats; render them without a trailing ".0".
fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Trimmed text, or `default` when nothing is left.
pub fn text_or_default(cell: Option<&Cell>, default: &str) -> String {
    let text = coerce_text(cell);
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

/// Canonical serial: the first digit run anywhere in the text, zero-padded
/// to three digits behind "SN-". "SN7", "7" and "Order-7" all become
/// "SN-007". Text without digits is kept as-is.
pub fn normalize_serial(raw: &str) -> String {
    let trimmed = raw.trim();
    match DIGIT_RUN.find(trimmed) {
        Some(digits) => format!(
            "{}{:0>width$}",
            SERIAL_PREFIX,
            digits.as_str(),
            width = SERIAL_MIN_DIGITS
        ),
        None => trimmed.to_string(),
    }
}

/// Renders ISO-looking timestamps as `YYYY-MM-DD HH:MM` in a fixed display offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormatter {
    offset: FixedOffset,
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimestampFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Offset in minutes east of UTC; out-of-range values fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .unwrap_or_else(Self::utc)
    }

    /// Only strings containing 'T' or 'Z' are treated as timestamps; anything
    /// else, or anything that fails to parse, comes back unchanged.
    pub fn format(&self, raw: &str) -> String {
        if !(raw.contains('T') || raw.contains('Z')) {
            return raw.to_string();
        }
        match self.parse(raw.trim()) {
            Some(dt) => dt.format(TIMESTAMP_DISPLAY_FORMAT).to_string(),
            None => raw.to_string(),
        }
    }

    fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        // `%z` does not accept a literal Z, and RFC 3339 requires seconds
        let zoned = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
            Some(base) => format!("{base}+00:00"),
            None => raw.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&zoned) {
            return Some(dt.with_timezone(&self.offset));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
                return Some(dt.with_timezone(&self.offset));
            }
        }
        NAIVE_FORMATS.iter().find_map(|fmt| {
            NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .and_then(|naive| self.offset.from_local_datetime(&naive).single())
        })
    }
}

/// Normalization settings, loaded from the `[normalize]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Substituted for empty descriptive fields such as company or price.
    pub default_text: String,
    /// Display offset for timestamps, minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            default_text: DEFAULT_TEXT.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

/// Bundles the per-field normalizers with their configuration.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    default_text: String,
    timestamps: TimestampFormatter,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::from_config(&NormalizeConfig::default())
    }
}

impl FieldNormalizer {
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self {
            default_text: config.default_text.clone(),
            timestamps: TimestampFormatter::from_offset_minutes(config.utc_offset_minutes),
        }
    }

    pub fn text(&self, cell: Option<&Cell>) -> String {
        coerce_text(cell)
    }

    pub fn text_or_default(&self, cell: Option<&Cell>) -> String {
        text_or_default(cell, &self.default_text)
    }

    pub fn text_or(&self, cell: Option<&Cell>, default: &str) -> String {
        text_or_default(cell, default)
    }

    pub fn serial(&self, cell: Option<&Cell>) -> String {
        normalize_serial(&coerce_text(cell))
    }

    pub fn timestamp(&self, cell: Option<&Cell>) -> String {
        self.timestamps.format(&coerce_text(cell))
    }
}
