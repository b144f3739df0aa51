//! Fundamental types for the Coffer treasury.
//!
//! This crate defines the primitives shared across every other crate in the workspace:
//! account addresses, timestamps, request ids, vote sides and deploy-time parameters.

pub mod address;
pub mod error;
pub mod params;
pub mod request;
pub mod time;
pub mod vote;

pub use address::Address;
pub use error::TypesError;
pub use params::{GovernanceParams, TokenMetadata};
pub use request::RequestId;
pub use time::Timestamp;
pub use vote::VoteSide;
