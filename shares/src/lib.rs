//! Shares: the fungible claim on the treasury pool.
//!
//! Shares are minted 1:1 against deposited currency and never burned. The same
//! balances double as voting power: a vote moves shares into the treasury's own
//! escrow account, which users cannot transfer into or out of directly.
//!
//! This crate handles:
//! - Balance accounting and total supply
//! - Plain transfers and ERC-20 style allowances
//! - Escrow movements used by the voting engine

pub mod error;
pub mod ledger;

pub use error::ShareError;
pub use ledger::ShareLedger;
