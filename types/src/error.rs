//! Errors raised while parsing primitive types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid vote side {0}: expected 0 (no) or 1 (yes)")]
    InvalidVoteSide(u8),

    #[error("invalid vote side {0:?}: expected \"yes\" or \"no\"")]
    UnknownVoteSide(String),
}
