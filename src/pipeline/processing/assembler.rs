use crate::common::constants::{DEFAULT_RENEWAL_COUNT, RECORD_ID_PREFIX};
use crate::domain::{RawRow, SubscriptionRecord};
use crate::pipeline::processing::columns::{ColumnMap, RowView};
use crate::pipeline::processing::normalize::FieldNormalizer;
use crate::pipeline::processing::status::{derive_status, WorkflowSignals};

/// Record identity: prefix, normalized serial and the row's position in the
/// batch. Duplicate serials still get distinct ids.
pub fn record_id(serial: &str, position: usize) -> String {
    format!("{}-{}-{}", RECORD_ID_PREFIX, serial, position)
}

/// Build one subscription record from a row that passed the filter.
pub fn assemble(
    row: &RawRow,
    position: usize,
    normalizer: &FieldNormalizer,
    columns: &ColumnMap,
) -> SubscriptionRecord {
    let view = RowView::new(row, columns);

    let serial_number = normalizer.serial(view.get(|c| c.serial_number));
    let planned1 = normalizer.text(view.get(|c| c.planned1));
    let actual1 = normalizer.text(view.get(|c| c.actual1));
    let planned2 = normalizer.text(view.get(|c| c.planned2));
    let actual2 = normalizer.text(view.get(|c| c.actual2));
    let approval_status = normalizer.text(view.get(|c| c.approval_status));
    let actual3 = normalizer.text(view.get(|c| c.actual3));

    let status = derive_status(&WorkflowSignals {
        payment_actual: &actual3,
        approval_status: &approval_status,
        stage_two_actual: &actual2,
    });

    SubscriptionRecord {
        id: record_id(&serial_number, position),
        requested_date: normalizer.timestamp(view.get(|c| c.requested_date)),
        company_name: normalizer.text_or_default(view.get(|c| c.company_name)),
        subscriber_name: normalizer.text_or_default(view.get(|c| c.subscriber_name)),
        subscription_name: normalizer.text_or_default(view.get(|c| c.subscription_name)),
        price: normalizer.text_or_default(view.get(|c| c.price)),
        frequency: normalizer.text_or_default(view.get(|c| c.frequency)),
        purpose: normalizer.text_or_default(view.get(|c| c.purpose)),
        status,
        start_date: normalizer.text(view.get(|c| c.start_date)),
        end_date: normalizer.text(view.get(|c| c.end_date)),
        payment_date: actual3.clone(),
        payment_method: String::new(),
        transaction_id: normalizer.text(view.get(|c| c.transaction_id)),
        payment_file: normalizer.text(view.get(|c| c.payment_file)),
        approval_date: String::new(),
        remarks: String::new(),
        actual2,
        actual3,
        renewal_status: normalizer.text(view.get(|c| c.renewal_status)),
        planned1,
        planned2,
        actual1,
        renewal_count: normalizer.text_or(view.get(|c| c.renewal_count), DEFAULT_RENEWAL_COUNT),
        serial_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubscriptionStatus;
    use serde_json::json;

    fn full_row() -> RawRow {
        RawRow::from_value(json!([
            "2024-03-05T10:15:00Z", // A requested
            "SN7",                  // B serial
            "Acme",                 // C company
            "J. Doe",               // D subscriber
            "CloudSuite",           // E subscription
            100,                    // F price
            "Monthly",              // G frequency
            "Tools",                // H purpose
            "2024-03-06",           // I planned1
            "2024-03-06",           // J actual1
            "",                     // K
            "Active",               // L renewal status
            2,                      // M renewal count
            "2024-03-07",           // N planned2
            "",                     // O actual2
            "",                     // P
            "",                     // Q approval status
            "",                     // R
            "42.50",                // S actual3
            "TXN-9",                // T transaction id
            "2024-04-01",           // U start
            "2025-04-01",           // V end
            "https://files/receipt" // W payment file
        ]))
    }

    #[test]
    fn test_assembles_all_fields() {
        let record = assemble(&full_row(), 3, &FieldNormalizer::default(), &ColumnMap::default());

        assert_eq!(record.id, "sub-SN-007-3");
        assert_eq!(record.serial_number, "SN-007");
        assert_eq!(record.requested_date, "2024-03-05 10:15");
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.price, "100");
        assert_eq!(record.status, SubscriptionStatus::Paid);
        assert_eq!(record.payment_date, "42.50");
        assert_eq!(record.actual3, "42.50");
        assert_eq!(record.transaction_id, "TXN-9");
        assert_eq!(record.payment_file, "https://files/receipt");
        assert_eq!(record.renewal_status, "Active");
        assert_eq!(record.renewal_count, "2");
        assert_eq!(record.planned1, "2024-03-06");
        assert_eq!(record.planned2, "2024-03-07");
    }

    #[test]
    fn test_unsourced_fields_are_always_empty() {
        let record = assemble(&full_row(), 0, &FieldNormalizer::default(), &ColumnMap::default());
        assert_eq!(record.payment_method, "");
        assert_eq!(record.approval_date, "");
        assert_eq!(record.remarks, "");
    }

    #[test]
    fn test_short_row_gets_defaults() {
        let row = RawRow::from_value(json!(["March 5", "12", "", "", "CloudSuite"]));
        let record = assemble(&row, 0, &FieldNormalizer::default(), &ColumnMap::default());

        assert_eq!(record.serial_number, "SN-012");
        assert_eq!(record.requested_date, "March 5");
        assert_eq!(record.company_name, "N/A");
        assert_eq!(record.subscriber_name, "N/A");
        assert_eq!(record.purpose, "N/A");
        assert_eq!(record.start_date, "");
        assert_eq!(record.renewal_count, "0");
        assert_eq!(record.status, SubscriptionStatus::Pending);
    }

    #[test]
    fn test_record_id_includes_position() {
        assert_eq!(record_id("SN-001", 0), "sub-SN-001-0");
        assert_ne!(record_id("SN-001", 0), record_id("SN-001", 1));
    }
}
