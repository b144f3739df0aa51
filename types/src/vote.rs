//! The binary side of a token-weighted vote.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Which side a voter's locked shares count towards.
///
/// The wire encoding is `No = 0`, `Yes = 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteSide {
    No = 0,
    Yes = 1,
}

impl VoteSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
        }
    }
}

impl TryFrom<u8> for VoteSide {
    type Error = TypesError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::No),
            1 => Ok(Self::Yes),
            other => Err(TypesError::InvalidVoteSide(other)),
        }
    }
}

impl From<VoteSide> for u8 {
    fn from(side: VoteSide) -> Self {
        side as u8
    }
}

impl FromStr for VoteSide {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" | "1" => Ok(Self::Yes),
            "no" | "0" => Ok(Self::No),
            _ => Err(TypesError::UnknownVoteSide(s.to_string())),
        }
    }
}

impl fmt::Display for VoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_encoding() {
        assert_eq!(VoteSide::try_from(0), Ok(VoteSide::No));
        assert_eq!(VoteSide::try_from(1), Ok(VoteSide::Yes));
        assert_eq!(VoteSide::try_from(2), Err(TypesError::InvalidVoteSide(2)));
        assert_eq!(u8::from(VoteSide::Yes), 1);
    }

    #[test]
    fn parses_names_and_digits() {
        assert_eq!("YES".parse::<VoteSide>(), Ok(VoteSide::Yes));
        assert_eq!("0".parse::<VoteSide>(), Ok(VoteSide::No));
        assert!("maybe".parse::<VoteSide>().is_err());
    }
}
