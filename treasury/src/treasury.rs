//! The treasury facade: the only way in or out of the pool.

use std::path::Path;

use coffer_governance::{
    ExecutionGate, Outcome, RequestStatus, RequestStore, VoteRecord, VotingEngine,
    WithdrawalRequest,
};
use coffer_shares::{ShareError, ShareLedger};
use coffer_types::{Address, GovernanceParams, RequestId, Timestamp, TokenMetadata, VoteSide};
use serde::{Deserialize, Serialize};

use crate::config::TreasuryConfig;
use crate::error::TreasuryError;
use crate::event::{EventBus, EventLog, TreasuryEvent};

/// A deployed treasury: pool, share ledger, requests, votes and event log.
///
/// Invariants, checked by [`Treasury::is_consistent`]:
/// - `total_supply == total_deposited` (shares are never burned)
/// - `pool_balance == total_deposited - total_disbursed`
/// - escrowed shares `==` shares locked in outstanding vote records
/// - every request's tally `==` the vote records cast on it
#[derive(Debug, Serialize, Deserialize)]
pub struct Treasury {
    pool_balance: u128,
    total_deposited: u128,
    total_disbursed: u128,
    ledger: ShareLedger,
    requests: RequestStore,
    voting: VotingEngine,
    events: EventLog,
    #[serde(skip)]
    bus: EventBus,
}

impl Treasury {
    /// Deploy a new, empty treasury.
    ///
    /// `address` is the treasury's own account in the share ledger; it holds
    /// the shares escrowed by voters and cannot be the owner.
    pub fn deploy(
        owner: Address,
        address: Address,
        metadata: TokenMetadata,
        params: GovernanceParams,
    ) -> Result<Self, TreasuryError> {
        if !params.is_valid() {
            return Err(TreasuryError::Config(format!(
                "quorum_bps {} exceeds 10000",
                params.quorum_bps
            )));
        }
        if owner == address {
            return Err(TreasuryError::Config(
                "owner cannot be the treasury's own address".to_string(),
            ));
        }
        tracing::info!(
            owner = %owner,
            address = %address,
            name = %metadata.name,
            symbol = %metadata.symbol,
            "treasury deployed"
        );
        Ok(Self {
            pool_balance: 0,
            total_deposited: 0,
            total_disbursed: 0,
            ledger: ShareLedger::new(metadata, address),
            requests: RequestStore::new(owner, params),
            voting: VotingEngine::new(),
            events: EventLog::new(),
            bus: EventBus::new(),
        })
    }

    /// Deploy using a configuration; the config must name an owner.
    pub fn from_config(config: &TreasuryConfig) -> Result<Self, TreasuryError> {
        config.validate()?;
        let owner = config
            .owner
            .clone()
            .ok_or_else(|| TreasuryError::Config("owner is required to deploy".to_string()))?;
        Self::deploy(
            owner,
            config.treasury_address.clone(),
            config.metadata(),
            config.governance_params(),
        )
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Payable deposit: grow the pool by `value` and mint `value` shares to `caller`.
    ///
    /// Returns the caller's new share balance.
    pub fn store_funds(&mut self, caller: &Address, value: u128) -> Result<u128, TreasuryError> {
        let pool = self
            .pool_balance
            .checked_add(value)
            .ok_or(TreasuryError::PoolOverflow)?;
        let deposited = self
            .total_deposited
            .checked_add(value)
            .ok_or(TreasuryError::PoolOverflow)?;
        if *caller == *self.ledger.escrow_address() {
            return Err(ShareError::EscrowAccount(caller.clone()).into());
        }
        self.ledger
            .mint(caller, value)
            .inspect_err(|e| tracing::debug!(caller = %caller, value, error = %e, "deposit rejected"))?;
        self.pool_balance = pool;
        self.total_deposited = deposited;

        let balance = self.ledger.balance_of(caller);
        tracing::info!(caller = %caller, value, pool, "funds stored");
        self.commit(vec![
            TreasuryEvent::Deposit {
                from: caller.clone(),
                amount: value,
            },
            TreasuryEvent::Transfer {
                from: None,
                to: caller.clone(),
                amount: value,
            },
        ]);
        Ok(balance)
    }

    /// Owner-only: propose disbursing `amount` from the pool, open for `duration_secs`.
    pub fn initiate_withdrawal(
        &mut self,
        caller: &Address,
        amount: u128,
        description: &str,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<RequestId, TreasuryError> {
        let id = self
            .requests
            .initiate_withdrawal(caller, amount, description, duration_secs, self.pool_balance, now)
            .inspect_err(|e| tracing::debug!(caller = %caller, amount, error = %e, "withdrawal request rejected"))?;

        tracing::info!(id = %id, amount, duration_secs, description, "withdrawal requested");
        self.commit(vec![TreasuryEvent::NewRequest { id, amount }]);
        Ok(id)
    }

    /// Lock `amount` of the caller's shares on `side` of request `id`.
    pub fn vote(
        &mut self,
        caller: &Address,
        id: RequestId,
        amount: u128,
        side: VoteSide,
        now: Timestamp,
    ) -> Result<(), TreasuryError> {
        self.voting
            .vote(&mut self.ledger, &mut self.requests, caller, id, amount, side, now)
            .inspect_err(|e| tracing::debug!(id = %id, voter = %caller, amount, error = %e, "vote rejected"))?;

        tracing::info!(id = %id, voter = %caller, amount, side = %side, "vote cast");
        let escrow = self.ledger.escrow_address().clone();
        self.commit(vec![
            TreasuryEvent::Transfer {
                from: Some(caller.clone()),
                to: escrow,
                amount,
            },
            TreasuryEvent::NewVote {
                id,
                voter: caller.clone(),
                amount,
            },
        ]);
        Ok(())
    }

    /// Settle request `id` once its deadline has passed.
    ///
    /// Any caller may trigger resolution. An approved request pays its amount
    /// out of the pool to the requester; locked shares stay in escrow until
    /// each voter calls [`Treasury::reclaim`].
    pub fn resolve(&mut self, caller: &Address, id: RequestId, now: Timestamp) -> Result<Outcome, TreasuryError> {
        let disbursed = self.total_disbursed;
        let gate = ExecutionGate::new(self.requests.params().quorum_bps);
        let outcome = gate
            .resolve(
                &mut self.requests,
                id,
                now,
                self.ledger.total_supply(),
                self.pool_balance,
            )
            .inspect_err(|e| tracing::debug!(id = %id, caller = %caller, error = %e, "resolution rejected"))?;

        // The gate only approves a payout the pool covers.
        self.pool_balance -= outcome.payout;
        self.total_disbursed = disbursed.saturating_add(outcome.payout);

        tracing::info!(
            id = %id,
            caller = %caller,
            approved = outcome.approved,
            payout = outcome.payout,
            recipient = %outcome.requester,
            "request resolved"
        );
        self.commit(vec![TreasuryEvent::RequestResolved {
            id,
            approved: outcome.approved,
            recipient: outcome.requester.clone(),
            payout: outcome.payout,
        }]);
        Ok(outcome)
    }

    /// Return the caller's escrowed shares for a resolved request.
    pub fn reclaim(&mut self, caller: &Address, id: RequestId) -> Result<u128, TreasuryError> {
        let amount = self
            .voting
            .reclaim(&mut self.ledger, &self.requests, caller, id)
            .inspect_err(|e| tracing::debug!(id = %id, voter = %caller, error = %e, "reclaim rejected"))?;

        tracing::info!(id = %id, voter = %caller, amount, "shares reclaimed");
        let escrow = self.ledger.escrow_address().clone();
        self.commit(vec![
            TreasuryEvent::Transfer {
                from: Some(escrow),
                to: caller.clone(),
                amount,
            },
            TreasuryEvent::SharesReclaimed {
                id,
                voter: caller.clone(),
                amount,
            },
        ]);
        Ok(amount)
    }

    /// Move unlocked shares from the caller to `to`.
    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), TreasuryError> {
        self.ledger
            .transfer(caller, to, amount)
            .inspect_err(|e| tracing::debug!(from = %caller, to = %to, amount, error = %e, "transfer rejected"))?;

        tracing::info!(from = %caller, to = %to, amount, "shares transferred");
        self.commit(vec![TreasuryEvent::Transfer {
            from: Some(caller.clone()),
            to: to.clone(),
            amount,
        }]);
        Ok(())
    }

    /// Allow `spender` to move up to `amount` of the caller's shares.
    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u128) -> Result<(), TreasuryError> {
        self.ledger.approve(caller, spender, amount)?;

        tracing::info!(owner = %caller, spender = %spender, amount, "allowance set");
        self.commit(vec![TreasuryEvent::Approval {
            owner: caller.clone(),
            spender: spender.clone(),
            amount,
        }]);
        Ok(())
    }

    /// Move `amount` of `from`'s shares to `to` on the caller's allowance.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TreasuryError> {
        self.ledger
            .transfer_from(caller, from, to, amount)
            .inspect_err(|e| tracing::debug!(spender = %caller, from = %from, to = %to, amount, error = %e, "transfer_from rejected"))?;

        tracing::info!(spender = %caller, from = %from, to = %to, amount, "shares transferred on allowance");
        self.commit(vec![TreasuryEvent::Transfer {
            from: Some(from.clone()),
            to: to.clone(),
            amount,
        }]);
        Ok(())
    }

    /// Register a listener for events committed from now on.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TreasuryEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    fn commit(&mut self, events: Vec<TreasuryEvent>) {
        for event in &events {
            self.bus.emit(event);
        }
        self.events.append(events);
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.ledger.allowance(owner, spender)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn pool_balance(&self) -> u128 {
        self.pool_balance
    }

    pub fn total_disbursed(&self) -> u128 {
        self.total_disbursed
    }

    pub fn owner(&self) -> &Address {
        self.requests.owner()
    }

    /// The treasury's own account (escrow for voting shares).
    pub fn address(&self) -> &Address {
        self.ledger.escrow_address()
    }

    pub fn metadata(&self) -> &TokenMetadata {
        self.ledger.metadata()
    }

    pub fn params(&self) -> &GovernanceParams {
        self.requests.params()
    }

    /// Request `id`, or `NotFound`.
    pub fn request(&self, id: RequestId) -> Result<&WithdrawalRequest, TreasuryError> {
        Ok(self.requests.get(id)?)
    }

    pub fn requests(&self) -> impl Iterator<Item = &WithdrawalRequest> {
        self.requests.iter()
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn request_status(&self, id: RequestId, now: Timestamp) -> Result<RequestStatus, TreasuryError> {
        Ok(self.requests.status(id, now)?)
    }

    pub fn vote_record(&self, id: RequestId, voter: &Address) -> Option<&VoteRecord> {
        self.voting.record(id, voter)
    }

    /// Voters and their records on request `id`.
    pub fn votes_on(&self, id: RequestId) -> impl Iterator<Item = (&Address, &VoteRecord)> {
        self.voting.records_for(id)
    }

    /// Shares `voter` has locked in escrow across all requests.
    pub fn locked_by(&self, voter: &Address) -> u128 {
        self.voting.locked_by(voter)
    }

    /// Holders with a non-zero share balance, escrow included.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.ledger.holders()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Check every accounting invariant.
    pub fn is_consistent(&self) -> bool {
        let sum = self
            .ledger
            .holders()
            .try_fold(0u128, |acc, (_, bal)| acc.checked_add(bal));
        sum == Some(self.ledger.total_supply())
            && self.ledger.total_supply() == self.total_deposited
            && self.total_deposited.checked_sub(self.total_disbursed) == Some(self.pool_balance)
            && self.ledger.escrowed() == self.voting.total_locked()
            && self.voting.matches_tallies(&self.requests)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Serialize the full treasury state. Listeners are not persisted.
    pub fn save_state(&self) -> Result<Vec<u8>, TreasuryError> {
        bincode::serialize(self).map_err(|e| TreasuryError::Snapshot(e.to_string()))
    }

    /// Restore a treasury from [`Treasury::save_state`] bytes.
    pub fn load_state(data: &[u8]) -> Result<Self, TreasuryError> {
        let treasury: Self =
            bincode::deserialize(data).map_err(|e| TreasuryError::Snapshot(e.to_string()))?;
        if !treasury.is_consistent() {
            return Err(TreasuryError::Snapshot(
                "snapshot violates accounting invariants".to_string(),
            ));
        }
        Ok(treasury)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), TreasuryError> {
        let path = path.as_ref();
        let bytes = self.save_state()?;
        std::fs::write(path, bytes)
            .map_err(|e| TreasuryError::Snapshot(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, TreasuryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| TreasuryError::Snapshot(format!("{}: {e}", path.display())))?;
        Self::load_state(&bytes)
    }
}
