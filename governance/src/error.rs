use coffer_shares::ShareError;
use coffer_types::{Address, RequestId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("caller {0} is not the treasury owner")]
    Unauthorized(Address),

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("duration {duration}s must be greater than {min}s")]
    InvalidDuration { duration: u64, min: u64 },

    #[error("not enough funds in pool: requested {requested}, available {available}")]
    InsufficientPoolFunds { requested: u128, available: u128 },

    #[error("insufficient tokens: requested {requested}, unlocked {available}")]
    InsufficientTokens { requested: u128, available: u128 },

    #[error("no available tokens to vote with")]
    NoAvailableTokens,

    #[error("request {0} not found")]
    NotFound(RequestId),

    #[error("request {0} has ended")]
    VotingClosed(RequestId),

    #[error("request {id} is still open until {deadline}")]
    VotingStillOpen { id: RequestId, deadline: Timestamp },

    #[error("request {0} has already been resolved")]
    AlreadyResolved(RequestId),

    #[error("request {0} has not been resolved yet")]
    NotResolved(RequestId),

    #[error("nothing to reclaim on request {0}")]
    NothingToReclaim(RequestId),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error(transparent)]
    Shares(#[from] ShareError),
}
