//! Token-weighted governance over treasury withdrawals.
//!
//! Lifecycle of a withdrawal request: Open → Expired → Resolved.
//! Only the owner may open a request. While it is open, share holders lock
//! shares into escrow to vote yes or no. Once the deadline passes anyone may
//! resolve it; an approved request releases the funds to the requester.
//!
//! Key principle: one share = one unit of voting weight, and a share can back
//! at most one vote at a time because voting moves it into escrow.

pub mod error;
pub mod gate;
pub mod request;
pub mod store;
pub mod voting;

pub use error::GovernanceError;
pub use gate::{ExecutionGate, Outcome};
pub use request::{RequestStatus, WithdrawalRequest};
pub use store::RequestStore;
pub use voting::{VoteRecord, VotingEngine};
