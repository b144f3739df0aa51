//! Core share ledger.

use std::collections::BTreeMap;

use crate::error::ShareError;
use coffer_types::{Address, TokenMetadata};
use serde::{Deserialize, Serialize};

/// Fungible balance accounting for treasury shares.
///
/// Invariant: `Σ balances == total_supply`. Zero balances are not stored, so
/// [`ShareLedger::holders`] only yields accounts that actually hold shares.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareLedger {
    metadata: TokenMetadata,
    /// The treasury's own account; escrowed voting shares live here.
    escrow: Address,
    balances: BTreeMap<Address, u128>,
    /// (owner, spender) → remaining allowance.
    allowances: BTreeMap<(Address, Address), u128>,
    total_supply: u128,
}

impl ShareLedger {
    pub fn new(metadata: TokenMetadata, escrow: Address) -> Self {
        Self {
            metadata,
            escrow,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            total_supply: 0,
        }
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn escrow_address(&self) -> &Address {
        &self.escrow
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `account`. Unknown accounts hold zero.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Shares currently held in escrow on behalf of voters.
    pub fn escrowed(&self) -> u128 {
        self.balance_of(&self.escrow)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// All accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.balances.iter().map(|(addr, bal)| (addr, *bal))
    }

    /// Mint new shares. Only the deposit path calls this.
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<(), ShareError> {
        if amount == 0 {
            return Err(ShareError::ZeroAmount);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ShareError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(ShareError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(to.clone(), balance);
        tracing::trace!(to = %to, amount, supply, "shares minted");
        Ok(())
    }

    /// Move shares between two user accounts.
    ///
    /// The escrow account can be neither sender nor recipient: escrowed
    /// shares only move through [`ShareLedger::lock`] and [`ShareLedger::release`].
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), ShareError> {
        self.reject_escrow(from)?;
        self.reject_escrow(to)?;
        self.move_shares(from, to, amount)
    }

    /// Set `spender`'s allowance over `owner`'s shares, replacing any previous value.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<(), ShareError> {
        self.reject_escrow(owner)?;
        let key = (owner.clone(), spender.clone());
        if amount == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, amount);
        }
        Ok(())
    }

    /// Move `amount` of `from`'s shares to `to`, spending `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ShareError> {
        self.reject_escrow(from)?;
        self.reject_escrow(to)?;
        let available = self.allowance(from, spender);
        if available < amount {
            return Err(ShareError::InsufficientAllowance {
                needed: amount,
                available,
            });
        }
        self.move_shares(from, to, amount)?;
        let remaining = available - amount;
        self.approve(from, spender, remaining)
    }

    /// Escrow `amount` of `voter`'s shares in the treasury's own account.
    pub fn lock(&mut self, voter: &Address, amount: u128) -> Result<(), ShareError> {
        self.reject_escrow(voter)?;
        let escrow = self.escrow.clone();
        self.move_shares(voter, &escrow, amount)
    }

    /// Return `amount` escrowed shares to `voter`.
    pub fn release(&mut self, voter: &Address, amount: u128) -> Result<(), ShareError> {
        self.reject_escrow(voter)?;
        let escrow = self.escrow.clone();
        self.move_shares(&escrow, voter, amount)
    }

    fn reject_escrow(&self, account: &Address) -> Result<(), ShareError> {
        if *account == self.escrow {
            return Err(ShareError::EscrowAccount(account.clone()));
        }
        Ok(())
    }

    /// Checked balance movement. Both sides are computed before either is written.
    fn move_shares(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), ShareError> {
        let available = self.balance_of(from);
        let from_after = available
            .checked_sub(amount)
            .ok_or(ShareError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        if from == to || amount == 0 {
            return Ok(());
        }
        let to_after = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(ShareError::Overflow)?;
        self.set_balance(from, from_after);
        self.set_balance(to, to_after);
        Ok(())
    }

    fn set_balance(&mut self, account: &Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(account.clone(), balance);
        }
    }
}
