//! The Coffer treasury, a pooled fund governed by its share holders.
//!
//! Deposits mint shares 1:1. Only the owner may propose a withdrawal; share
//! holders lock shares to vote on it; once the vote window closes anyone may
//! resolve it and an approved withdrawal is paid out of the pool.
//!
//! [`Treasury`] is the single entry point. Every mutating method runs to
//! completion or fails with no effect, and every committed mutation appends
//! its events to the treasury's ordered [`EventLog`].

pub mod config;
pub mod error;
pub mod event;
pub mod treasury;

pub use config::TreasuryConfig;
pub use error::TreasuryError;
pub use event::{EventBus, EventLog, TreasuryEvent};
pub use treasury::Treasury;

pub use coffer_governance::{
    GovernanceError, Outcome, RequestStatus, VoteRecord, WithdrawalRequest,
};
pub use coffer_types::{Address, GovernanceParams, RequestId, Timestamp, TokenMetadata, VoteSide};
