//! Deploy-time parameters.
//!
//! These are fixed when a treasury is created. There is deliberately no
//! operation that changes them afterwards.

use serde::{Deserialize, Serialize};

/// Minimum vote window: a request's duration must be strictly greater than this.
pub const MIN_VOTE_DURATION_SECS: u64 = 120;

/// Denominator for basis-point thresholds (10_000 = 100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Governance thresholds fixed at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Requests must run for strictly longer than this many seconds.
    pub min_duration_secs: u64,

    /// Minimum participation (yes + no weight) over total share supply, in
    /// basis points. `0` disables the quorum check and leaves only the
    /// simple `yes > no` majority.
    pub quorum_bps: u32,
}

impl GovernanceParams {
    /// Whether `quorum_bps` is a meaningful threshold.
    pub fn is_valid(&self) -> bool {
        self.quorum_bps <= BPS_DENOMINATOR
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_duration_secs: MIN_VOTE_DURATION_SECS,
            quorum_bps: 0,
        }
    }
}

/// Descriptive metadata of the share token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: 18,
        }
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new("My Treasury", "MT")
    }
}
