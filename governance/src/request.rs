//! Withdrawal requests and their derived lifecycle state.

use coffer_types::{Address, RequestId, Timestamp, VoteSide};
use serde::{Deserialize, Serialize};

/// Where a request is in its lifecycle.
///
/// Derived from `(now, deadline, resolved)`, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Accepting votes (`now < deadline`).
    Open,
    /// Deadline reached, waiting for someone to resolve it.
    Expired,
    /// Terminal: executed or closed without execution.
    Resolved,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Expired => "expired",
            Self::Resolved => "resolved",
        }
    }
}

/// A pending or settled proposal to disburse funds from the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: RequestId,
    /// The owner at creation time; receives the funds if approved.
    pub requester: Address,
    pub amount: u128,
    pub description: String,
    pub created_at: Timestamp,
    pub deadline: Timestamp,
    /// Sum of shares locked on the yes side.
    pub yes_weight: u128,
    /// Sum of shares locked on the no side.
    pub no_weight: u128,
    pub resolved: bool,
    /// Whether resolution actually moved funds out of the pool.
    pub executed: bool,
}

impl WithdrawalRequest {
    pub fn status(&self, now: Timestamp) -> RequestStatus {
        if self.resolved {
            RequestStatus::Resolved
        } else if self.deadline.has_passed(now) {
            RequestStatus::Expired
        } else {
            RequestStatus::Open
        }
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        self.status(now) == RequestStatus::Open
    }

    pub fn weight(&self, side: VoteSide) -> u128 {
        match side {
            VoteSide::Yes => self.yes_weight,
            VoteSide::No => self.no_weight,
        }
    }

    /// Total weight cast on both sides.
    pub fn participation(&self) -> Option<u128> {
        self.yes_weight.checked_add(self.no_weight)
    }

    pub(crate) fn weight_mut(&mut self, side: VoteSide) -> &mut u128 {
        match side {
            VoteSide::Yes => &mut self.yes_weight,
            VoteSide::No => &mut self.no_weight,
        }
    }
}
