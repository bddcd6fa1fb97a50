use std::fmt;

use crate::common::constants::{SECTION_MARKER, SERIAL_HEADER_LABEL};
use crate::domain::RawRow;
use crate::pipeline::processing::columns::{ColumnMap, RowView};
use crate::pipeline::processing::normalize::coerce_text;

/// Why a row was left out of the synchronized set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Absent row or fewer than two cells.
    TooShort,
    EmptySerial,
    /// Repeated header row ("Serial No").
    HeaderRow,
    /// Section marker such as "Create Subscription".
    SectionMarker,
    /// Neither company nor subscription name present.
    MissingNames,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooShort => "too_short",
            RejectReason::EmptySerial => "empty_serial",
            RejectReason::HeaderRow => "header_row",
            RejectReason::SectionMarker => "section_marker",
            RejectReason::MissingNames => "missing_names",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a row against the filter rules, reporting the first one it breaks.
pub fn classify_row(row: &RawRow, columns: &ColumnMap) -> Result<(), RejectReason> {
    if row.len() < 2 {
        return Err(RejectReason::TooShort);
    }

    let view = RowView::new(row, columns);
    let serial = coerce_text(view.get(|c| c.serial_number));
    if serial.is_empty() {
        return Err(RejectReason::EmptySerial);
    }

    let serial_lower = serial.to_lowercase();
    if serial_lower == SERIAL_HEADER_LABEL {
        return Err(RejectReason::HeaderRow);
    }
    if serial_lower.contains(SECTION_MARKER) {
        return Err(RejectReason::SectionMarker);
    }

    let company = coerce_text(view.get(|c| c.company_name));
    let subscription = coerce_text(view.get(|c| c.subscription_name));
    if company.is_empty() && subscription.is_empty() {
        return Err(RejectReason::MissingNames);
    }

    Ok(())
}

/// True when the row should become a subscription record.
pub fn is_usable_row(row: &RawRow, columns: &ColumnMap) -> bool {
    classify_row(row, columns).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(values: serde_json::Value) -> RawRow {
        RawRow::from_value(values)
    }

    #[test]
    fn test_accepts_regular_row() {
        let columns = ColumnMap::default();
        let r = row(json!(["", "SN7", "Acme", "J. Doe", "CloudSuite"]));
        assert!(is_usable_row(&r, &columns));
    }

    #[test]
    fn test_rejects_absent_and_short_rows() {
        let columns = ColumnMap::default();
        assert_eq!(classify_row(&row(json!(null)), &columns), Err(RejectReason::TooShort));
        assert_eq!(classify_row(&row(json!(["only"])), &columns), Err(RejectReason::TooShort));
    }

    #[test]
    fn test_rejects_blank_serial() {
        let columns = ColumnMap::default();
        let r = row(json!(["", "   ", "Acme", "", "CloudSuite"]));
        assert_eq!(classify_row(&r, &columns), Err(RejectReason::EmptySerial));
        let r = row(json!(["", null, "Acme"]));
        assert_eq!(classify_row(&r, &columns), Err(RejectReason::EmptySerial));
    }

    #[test]
    fn test_rejects_header_label_in_any_case() {
        let columns = ColumnMap::default();
        for label in ["Serial No", "SERIAL NO", " serial no "] {
            let r = row(json!(["Timestamp", label, "Company", "Name", "Subscription"]));
            assert_eq!(classify_row(&r, &columns), Err(RejectReason::HeaderRow));
        }
    }

    #[test]
    fn test_rejects_section_marker_substring() {
        let columns = ColumnMap::default();
        let r = row(json!(["", ">> Create Subscription <<", "Acme"]));
        assert_eq!(classify_row(&r, &columns), Err(RejectReason::SectionMarker));
    }

    #[test]
    fn test_rejects_when_both_names_missing() {
        let columns = ColumnMap::default();
        let r = row(json!(["", "SN-001", " ", "J. Doe", ""]));
        assert_eq!(classify_row(&r, &columns), Err(RejectReason::MissingNames));
        // Row too short to hold a subscription name still counts as missing
        let r = row(json!(["", "SN-001"]));
        assert_eq!(classify_row(&r, &columns), Err(RejectReason::MissingNames));
    }

    #[test]
    fn test_one_name_is_enough() {
        let columns = ColumnMap::default();
        assert!(is_usable_row(&row(json!(["", "1", "Acme", "", ""])), &columns));
        assert!(is_usable_row(&row(json!(["", "1", "", "", "CloudSuite"])), &columns));
    }
}
