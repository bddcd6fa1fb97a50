//! Metrics for the subscription sync.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder, in which case these counters
//! show up under the names below.

use std::fmt;

/// All metric names used in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Fetch metrics
    FetchSuccess,
    FetchError,
    FetchRowsReceived,

    // Pipeline metrics
    PipelineRowsAccepted,
    PipelineRowsRejected,
    PipelineRecordsByStatus,
    PipelineRunsCompleted,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::FetchSuccess => "subscription_sync_fetch_success_total",
            MetricName::FetchError => "subscription_sync_fetch_error_total",
            MetricName::FetchRowsReceived => "subscription_sync_fetch_rows_received_total",
            MetricName::PipelineRowsAccepted => "subscription_sync_rows_accepted_total",
            MetricName::PipelineRowsRejected => "subscription_sync_rows_rejected_total",
            MetricName::PipelineRecordsByStatus => "subscription_sync_records_by_status_total",
            MetricName::PipelineRunsCompleted => "subscription_sync_runs_completed_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            FetchSuccess,
            FetchError,
            FetchRowsReceived,
            PipelineRowsAccepted,
            PipelineRowsRejected,
            PipelineRecordsByStatus,
            PipelineRunsCompleted,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Fetch
// ============================================================================

pub mod fetch {
    use super::MetricName;

    pub fn success(rows: usize) {
        ::metrics::counter!(MetricName::FetchSuccess.as_str()).increment(1);
        ::metrics::counter!(MetricName::FetchRowsReceived.as_str()).increment(rows as u64);
    }

    pub fn error() {
        ::metrics::counter!(MetricName::FetchError.as_str()).increment(1);
    }
}

// ============================================================================
// Pipeline
// ============================================================================

pub mod pipeline {
    use super::MetricName;
    use crate::domain::SubscriptionStatus;
    use crate::pipeline::processing::row_filter::RejectReason;

    pub fn row_accepted(status: SubscriptionStatus) {
        ::metrics::counter!(MetricName::PipelineRowsAccepted.as_str()).increment(1);
        ::metrics::counter!(
            MetricName::PipelineRecordsByStatus.as_str(),
            "status" => status.as_str()
        )
        .increment(1);
    }

    pub fn row_rejected(reason: RejectReason) {
        ::metrics::counter!(
            MetricName::PipelineRowsRejected.as_str(),
            "reason" => reason.as_str()
        )
        .increment(1);
    }

    pub fn run_completed() {
        ::metrics::counter!(MetricName::PipelineRunsCompleted.as_str()).increment(1);
    }
}
