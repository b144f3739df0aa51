use coffer_governance::GovernanceError;
use coffer_shares::ShareError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreasuryError {
    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Shares(#[from] ShareError),

    #[error("pool balance overflow")]
    PoolOverflow,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl TreasuryError {
    /// The governance rejection behind this error, if any.
    pub fn governance(&self) -> Option<&GovernanceError> {
        match self {
            Self::Governance(e) => Some(e),
            _ => None,
        }
    }
}
