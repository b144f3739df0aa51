//! Share-ledger errors.

use coffer_types::Address;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, available {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("arithmetic overflow in share accounting")]
    Overflow,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("escrow account {0} cannot be used in user transfers")]
    EscrowAccount(Address),
}
