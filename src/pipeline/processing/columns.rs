use serde::{Deserialize, Serialize};

use crate::domain::{Cell, RawRow};

/// Maps each named field to its column index in the upstream sheet.
///
/// This is the only place that knows the positional layout; the row filter
/// and record assembler read cells through it. Defaults match the master
/// subscription sheet (column A = 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub requested_date: usize,
    pub serial_number: usize,
    pub company_name: usize,
    pub subscriber_name: usize,
    pub subscription_name: usize,
    pub price: usize,
    pub frequency: usize,
    pub purpose: usize,
    pub planned1: usize,
    pub actual1: usize,
    pub renewal_status: usize,
    pub renewal_count: usize,
    pub planned2: usize,
    pub actual2: usize,
    pub approval_status: usize,
    /// Payment actual; doubles as the payment date.
    pub actual3: usize,
    pub transaction_id: usize,
    pub start_date: usize,
    pub end_date: usize,
    pub payment_file: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            requested_date: 0, // A
            serial_number: 1, // B
            company_name: 2, // C
            subscriber_name: 3, // D
            subscription_name: 4, // E
            price: 5, // F
            frequency: 6, // G
            purpose: 7, // H
            planned1: 8, // I
            actual1: 9, // J
            renewal_status: 11, // L
            renewal_count: 12, // M
            planned2: 13, // N
            actual2: 14, // O
            approval_status: 16, // Q
            actual3: 18, // S
            transaction_id: 19, // T
            start_date: 20, // U
            end_date: 21, // V
            payment_file: 22, // W
        }
    }
}

/// Named view over one raw row.
pub struct RowView<'a> {
    row: &'a RawRow,
    columns: &'a ColumnMap,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a RawRow, columns: &'a ColumnMap) -> Self {
        Self { row, columns }
    }

    /// Cell for the column selected by `pick`, or `None` past the row's end.
    pub fn get(&self, pick: impl Fn(&ColumnMap) -> usize) -> Option<&'a Cell> {
        self.row.cell(pick(self.columns))
    }
}
