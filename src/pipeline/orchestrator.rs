use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{RawRow, SubscriptionRecord, SubscriptionStatus};
use crate::observability::metrics;
use crate::pipeline::processing::assembler::assemble;
use crate::pipeline::processing::columns::ColumnMap;
use crate::pipeline::processing::normalize::FieldNormalizer;
use crate::pipeline::processing::row_filter::classify_row;

/// Turns a batch of header-stripped sheet rows into subscription records.
///
/// Holds only configuration; every call to [`SyncPipeline::synchronize`] is
/// an independent pass over the rows it is given.
#[derive(Debug, Clone, Default)]
pub struct SyncPipeline {
    columns: ColumnMap,
    normalizer: FieldNormalizer,
}

impl SyncPipeline {
    pub fn new(columns: ColumnMap, normalizer: FieldNormalizer) -> Self {
        Self {
            columns,
            normalizer,
        }
    }

    /// Filter, normalize and assemble each row in input order. Rejected rows
    /// are dropped; this never fails.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn synchronize(&self, rows: &[RawRow]) -> Vec<SubscriptionRecord> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0usize;

        for (position, row) in rows.iter().enumerate() {
            if let Err(reason) = classify_row(row, &self.columns) {
                debug!(position, %reason, "Skipping row");
                metrics::pipeline::row_rejected(reason);
                rejected += 1;
                continue;
            }

            let record = assemble(row, position, &self.normalizer, &self.columns);
            metrics::pipeline::row_accepted(record.status);
            records.push(record);
        }

        info!(
            accepted = records.len(),
            rejected, "Synchronized subscription rows"
        );
        metrics::pipeline::run_completed();
        records
    }
}

/// Run one pass with the default column layout and normalization settings.
pub fn synchronize(rows: &[RawRow]) -> Vec<SubscriptionRecord> {
    SyncPipeline::default().synchronize(rows)
}

/// Per-status record counts, as shown on the dashboard summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub paid: usize,
}

impl StatusTally {
    pub fn from_records(records: &[SubscriptionRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record.status);
        }
        tally
    }

    pub fn add(&mut self, status: SubscriptionStatus) {
        self.total += 1;
        match status {
            SubscriptionStatus::Pending => self.pending += 1,
            SubscriptionStatus::Approved => self.approved += 1,
            SubscriptionStatus::Rejected => self.rejected += 1,
            SubscriptionStatus::Paid => self.paid += 1,
        }
    }

    pub fn count(&self, status: SubscriptionStatus) -> usize {
        match status {
            SubscriptionStatus::Pending => self.pending,
            SubscriptionStatus::Approved => self.approved,
            SubscriptionStatus::Rejected => self.rejected,
            SubscriptionStatus::Paid => self.paid,
        }
    }

    /// Counts keyed by status name, in a stable order.
    pub fn by_name(&self) -> BTreeMap<&'static str, usize> {
        SubscriptionStatus::ALL
            .iter()
            .map(|status| (status.as_str(), self.count(*status)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: serde_json::Value) -> Vec<RawRow> {
        values
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(RawRow::from_value)
            .collect()
    }

    #[test]
    fn test_drops_rejected_rows_and_keeps_order() {
        let input = rows(json!([
            ["", "Serial No", "Company", "Subscriber", "Subscription"],
            ["", "3", "Acme", "", "Suite"],
            null,
            ["", "1", "Beta", "", "Docs"],
            ["", "Create Subscription", "", "", ""],
            ["", "2", "", "", ""],
            ["", "SN-3", "Gamma", "", "Mail"]
        ]));

        let records = synchronize(&input);
        let serials: Vec<&str> = records.iter().map(|r| r.serial_number.as_str()).collect();
        assert_eq!(serials, vec!["SN-003", "SN-001", "SN-003"]);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["sub-SN-003-1", "sub-SN-001-3", "sub-SN-003-6"]);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(synchronize(&[]).is_empty());
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let input = rows(json!([
            ["2024-03-05T10:15:00Z", "7", "Acme", "J. Doe", "Suite", 100],
            ["", "8", "Beta", "", "Docs"]
        ]));
        assert_eq!(synchronize(&input), synchronize(&input));
    }

    #[test]
    fn test_custom_columns_are_honoured() {
        let columns = ColumnMap {
            serial_number: 0,
            company_name: 1,
            subscription_name: 2,
            ..ColumnMap::default()
        };
        let pipeline = SyncPipeline::new(columns, FieldNormalizer::default());
        let records = pipeline.synchronize(&rows(json!([["9", "Acme", "Suite"]])));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].serial_number, "SN-009");
        assert_eq!(records[0].subscription_name, "Suite");
    }

    #[test]
    fn test_status_tally() {
        let input = rows(json!([
            ["", "1", "A", "", "S"],
            ["", "2", "B", "", "S", "", "", "", "", "", "", "", "", "", "", "", "Approved"],
            ["", "3", "C", "", "S", "", "", "", "", "", "", "", "", "", "", "", "", "", "10"]
        ]));
        let tally = StatusTally::from_records(&synchronize(&input));
        assert_eq!(tally.total, 3);
        assert_eq!(tally.pending, 1);
        assert_eq!(tally.approved, 1);
        assert_eq!(tally.paid, 1);
        assert_eq!(tally.by_name().get("Rejected"), Some(&0));
    }
}
