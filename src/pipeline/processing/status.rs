use crate::common::constants::{APPROVAL_APPROVED, APPROVAL_REJECTED};
use crate::domain::SubscriptionStatus;

/// The workflow columns that drive status, already coerced to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowSignals<'a> {
    /// Payment actual (column S).
    pub payment_actual: &'a str,
    /// Approval status text (column Q).
    pub approval_status: &'a str,
    /// Stage-two actual (column O).
    pub stage_two_actual: &'a str,
}

/// Derive a single status from the workflow signals. First match wins:
/// payment, explicit approval, explicit rejection, stage-two completion,
/// then pending.
pub fn derive_status(signals: &WorkflowSignals<'_>) -> SubscriptionStatus {
    let approval = signals.approval_status.trim();

    if !signals.payment_actual.trim().is_empty() {
        SubscriptionStatus::Paid
    } else if approval.eq_ignore_ascii_case(APPROVAL_APPROVED) {
        SubscriptionStatus::Approved
    } else if approval.eq_ignore_ascii_case(APPROVAL_REJECTED) {
        SubscriptionStatus::Rejected
    } else if !signals.stage_two_actual.trim().is_empty() {
        // Reaching stage two without approval text still counts as approval
        SubscriptionStatus::Approved
    } else {
        SubscriptionStatus::Pending
    }
}
