//! Escrow-backed, token-weighted voting.
//!
//! Casting a vote moves the voted shares from the voter into the treasury's
//! escrow account and adds them to the request's tally. Because escrowed
//! shares are no longer in the voter's balance, the voter's *unlocked*
//! balance is simply their current ledger balance: locked shares can neither
//! be voted twice nor transferred away.
//!
//! Escrowed shares are not returned automatically when a request resolves.
//! Each voter pulls their own shares back with [`VotingEngine::reclaim`].

use std::collections::BTreeMap;

use crate::error::GovernanceError;
use crate::store::RequestStore;
use coffer_shares::ShareLedger;
use coffer_types::{Address, RequestId, Timestamp, VoteSide};
use serde::{Deserialize, Serialize};

/// Shares one voter has locked on one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub yes: u128,
    pub no: u128,
    /// Set once the locked shares have been returned to the voter.
    pub reclaimed: bool,
}

impl VoteRecord {
    /// Total shares locked by this record, regardless of side.
    pub fn locked(&self) -> u128 {
        self.yes.saturating_add(self.no)
    }

    /// Shares still sitting in escrow for this record.
    pub fn outstanding(&self) -> u128 {
        if self.reclaimed {
            0
        } else {
            self.locked()
        }
    }

    fn side_mut(&mut self, side: VoteSide) -> &mut u128 {
        match side {
            VoteSide::Yes => &mut self.yes,
            VoteSide::No => &mut self.no,
        }
    }
}

/// Per-(request, voter) ledger of locked voting power.
///
/// Invariant: `total_locked == Σ outstanding()` over all records, and equals
/// the escrow account's share balance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingEngine {
    records: BTreeMap<(RequestId, Address), VoteRecord>,
    total_locked: u128,
}

impl VotingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `amount` of `voter`'s shares on `side` of request `id`.
    ///
    /// Repeated calls add to the voter's existing record and to the running
    /// tally; they never replace an earlier vote.
    #[allow(clippy::too_many_arguments)]
    pub fn vote(
        &mut self,
        ledger: &mut ShareLedger,
        requests: &mut RequestStore,
        voter: &Address,
        id: RequestId,
        amount: u128,
        side: VoteSide,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let request = requests.get(id)?;
        if !request.is_open(now) {
            return Err(GovernanceError::VotingClosed(id));
        }

        let available = ledger.balance_of(voter);
        if available == 0 {
            return Err(GovernanceError::NoAvailableTokens);
        }
        if amount > available {
            return Err(GovernanceError::InsufficientTokens {
                requested: amount,
                available,
            });
        }
        if amount == 0 {
            return Err(GovernanceError::InvalidAmount);
        }

        // Compute every new value before touching state.
        let tally = request
            .weight(side)
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        let mut record = self.record(id, voter).cloned().unwrap_or_default();
        let side_locked = record
            .side_mut(side)
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        let total_locked = self
            .total_locked
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;

        ledger.lock(voter, amount)?;

        *record.side_mut(side) = side_locked;
        self.records.insert((id, voter.clone()), record);
        self.total_locked = total_locked;
        *requests.get_mut(id)?.weight_mut(side) = tally;

        tracing::debug!(id = %id, voter = %voter, amount, side = %side, tally, "vote locked");
        Ok(())
    }

    /// Return `voter`'s escrowed shares for a resolved request.
    ///
    /// Returns the amount released.
    pub fn reclaim(
        &mut self,
        ledger: &mut ShareLedger,
        requests: &RequestStore,
        voter: &Address,
        id: RequestId,
    ) -> Result<u128, GovernanceError> {
        if !requests.get(id)?.resolved {
            return Err(GovernanceError::NotResolved(id));
        }
        let outstanding = self
            .record(id, voter)
            .map(VoteRecord::outstanding)
            .unwrap_or(0);
        if outstanding == 0 {
            return Err(GovernanceError::NothingToReclaim(id));
        }
        let total_locked = self
            .total_locked
            .checked_sub(outstanding)
            .ok_or(GovernanceError::Overflow)?;

        ledger.release(voter, outstanding)?;

        if let Some(record) = self.records.get_mut(&(id, voter.clone())) {
            record.reclaimed = true;
        }
        self.total_locked = total_locked;

        tracing::debug!(id = %id, voter = %voter, amount = outstanding, "escrow reclaimed");
        Ok(outstanding)
    }

    pub fn record(&self, id: RequestId, voter: &Address) -> Option<&VoteRecord> {
        self.records.get(&(id, voter.clone()))
    }

    /// Shares `voter` currently has in escrow for request `id`.
    pub fn locked(&self, id: RequestId, voter: &Address) -> u128 {
        self.record(id, voter)
            .map(VoteRecord::outstanding)
            .unwrap_or(0)
    }

    /// Shares `voter` has in escrow across all requests.
    pub fn locked_by(&self, voter: &Address) -> u128 {
        self.records
            .iter()
            .filter(|((_, v), _)| v == voter)
            .map(|(_, r)| r.outstanding())
            .fold(0u128, u128::saturating_add)
    }

    pub fn total_locked(&self) -> u128 {
        self.total_locked
    }

    /// Yes and no weight cast on request `id`, summed over its records.
    pub fn tally(&self, id: RequestId) -> Option<(u128, u128)> {
        self.records_for(id)
            .try_fold((0u128, 0u128), |(yes, no), (_, r)| {
                Some((yes.checked_add(r.yes)?, no.checked_add(r.no)?))
            })
    }

    /// Whether the records agree with `requests`: every record belongs to a
    /// known request, each request's weights equal its records' sums, and
    /// `total_locked` equals the unreclaimed amounts.
    pub fn matches_tallies(&self, requests: &RequestStore) -> bool {
        if self.records.keys().any(|(id, _)| requests.get(*id).is_err()) {
            return false;
        }
        let outstanding = self
            .records
            .values()
            .try_fold(0u128, |acc, r| acc.checked_add(r.outstanding()));
        outstanding == Some(self.total_locked)
            && requests
                .iter()
                .all(|r| self.tally(r.id) == Some((r.yes_weight, r.no_weight)))
    }

    /// All records for one request, in voter order.
    pub fn records_for(&self, id: RequestId) -> impl Iterator<Item = (&Address, &VoteRecord)> {
        self.records
            .iter()
            .filter(move |((rid, _), _)| *rid == id)
            .map(|((_, voter), record)| (voter, record))
    }
}
