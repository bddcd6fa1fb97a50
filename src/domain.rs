use serde::{Deserialize, Serialize};
use std::fmt;

/// A single untyped spreadsheet cell as delivered by the sheet backend.
pub type Cell = serde_json::Value;

/// One positional row from the upstream sheet. The column index is the schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Build a row from an arbitrary upstream entry. Anything that is not an
    /// array is treated as an absent row and yields no cells.
    pub fn from_value(value: Cell) -> Self {
        match value {
            Cell::Array(cells) => Self { cells },
            _ => Self::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `index`, or `None` when the row is shorter than that.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

impl From<Vec<Cell>> for RawRow {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

/// Workflow state derived from the approval/payment columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 4] = [
        SubscriptionStatus::Pending,
        SubscriptionStatus::Approved,
        SubscriptionStatus::Rejected,
        SubscriptionStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "Pending",
            SubscriptionStatus::Approved => "Approved",
            SubscriptionStatus::Rejected => "Rejected",
            SubscriptionStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subscription as consumed by the dashboard. Every field is always present;
/// an empty string means "not yet available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: String,
    pub serial_number: String,
    pub requested_date: String,
    pub company_name: String,
    pub subscriber_name: String,
    pub subscription_name: String,
    pub price: String,
    pub frequency: String,
    pub purpose: String,
    pub status: SubscriptionStatus,
    pub start_date: String,
    pub end_date: String,
    pub payment_date: String,
    /// Not stored in the master sheet.
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_file: String,
    /// The approval sheet is not fetched.
    pub approval_date: String,
    pub remarks: String,

    // Raw workflow trace, carried through verbatim
    pub actual2: String,
    pub actual3: String,
    pub renewal_status: String,
    pub planned1: String,
    pub planned2: String,
    pub actual1: String,
    pub renewal_count: String,
}
