//! Settles a request once its vote window has elapsed.

use crate::error::GovernanceError;
use crate::store::RequestStore;
use coffer_types::params::BPS_DENOMINATOR;
use coffer_types::{Address, RequestId, Timestamp};
use serde::{Deserialize, Serialize};

/// Result of resolving a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: RequestId,
    pub approved: bool,
    /// Funds to release to `requester`; zero when rejected.
    pub payout: u128,
    pub requester: Address,
    pub yes_weight: u128,
    pub no_weight: u128,
}

/// Applies the approval rule: `yes > no` among cast weight, plus an optional
/// participation quorum over total share supply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionGate {
    quorum_bps: u32,
}

impl ExecutionGate {
    pub fn new(quorum_bps: u32) -> Self {
        Self {
            quorum_bps: quorum_bps.min(BPS_DENOMINATOR),
        }
    }

    pub fn quorum_bps(&self) -> u32 {
        self.quorum_bps
    }

    /// Resolve request `id`.
    ///
    /// `pool_balance` must cover the amount of an approved request; otherwise
    /// the call fails and the request stays unresolved so it can be retried
    /// after more deposits arrive. The caller is responsible for debiting the
    /// pool by `Outcome::payout`.
    pub fn resolve(
        &self,
        requests: &mut RequestStore,
        id: RequestId,
        now: Timestamp,
        total_supply: u128,
        pool_balance: u128,
    ) -> Result<Outcome, GovernanceError> {
        let request = requests.get(id)?;
        if request.resolved {
            return Err(GovernanceError::AlreadyResolved(id));
        }
        if !request.deadline.has_passed(now) {
            return Err(GovernanceError::VotingStillOpen {
                id,
                deadline: request.deadline,
            });
        }

        let participation = request.participation().ok_or(GovernanceError::Overflow)?;
        let approved = request.yes_weight > request.no_weight
            && meets_quorum(participation, total_supply, self.quorum_bps);
        let payout = if approved { request.amount } else { 0 };
        if payout > pool_balance {
            return Err(GovernanceError::InsufficientPoolFunds {
                requested: payout,
                available: pool_balance,
            });
        }

        let outcome = Outcome {
            id,
            approved,
            payout,
            requester: request.requester.clone(),
            yes_weight: request.yes_weight,
            no_weight: request.no_weight,
        };

        let request = requests.get_mut(id)?;
        request.resolved = true;
        request.executed = approved;

        tracing::debug!(
            id = %id,
            approved,
            yes = outcome.yes_weight,
            no = outcome.no_weight,
            "request resolved"
        );
        Ok(outcome)
    }
}

/// `participation / supply >= quorum_bps / 10_000`, without overflowing.
fn meets_quorum(participation: u128, supply: u128, quorum_bps: u32) -> bool {
    if quorum_bps == 0 {
        return true;
    }
    if supply == 0 {
        return false;
    }
    let bps = u128::from(quorum_bps);
    let denom = u128::from(BPS_DENOMINATOR);
    // ceil(supply * bps / denom), split so neither product can overflow.
    let whole = (supply / denom) * bps;
    let rest = ((supply % denom) * bps).div_ceil(denom);
    participation >= whole + rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_types::{GovernanceParams, VoteSide};

    fn owner() -> Address {
        Address::new("0xowner")
    }

    fn store_with(yes: u128, no: u128) -> (RequestStore, RequestId) {
        let mut store = RequestStore::new(owner(), GovernanceParams::default());
        let id = store
            .initiate_withdrawal(&owner(), 20_000, "For investing", 300, 30_000, Timestamp::EPOCH)
            .unwrap();
        let req = store.get_mut(id).unwrap();
        *req.weight_mut(VoteSide::Yes) = yes;
        *req.weight_mut(VoteSide::No) = no;
        (store, id)
    }

    #[test]
    fn majority_yes_is_approved() {
        let (mut store, id) = store_with(23_000, 5_000);
        let outcome = ExecutionGate::default()
            .resolve(&mut store, id, Timestamp::new(300), 30_000, 30_000)
            .unwrap();
        assert!(outcome.approved);
        assert_eq!(outcome.payout, 20_000);
        assert_eq!(outcome.requester, owner());

        let req = store.get(id).unwrap();
        assert!(req.resolved);
        assert!(req.executed);
    }

    #[test]
    fn tie_is_rejected() {
        let (mut store, id) = store_with(5_000, 5_000);
        let outcome = ExecutionGate::default()
            .resolve(&mut store, id, Timestamp::new(301), 30_000, 30_000)
            .unwrap();
        assert!(!outcome.approved);
        assert_eq!(outcome.payout, 0);
        assert!(store.get(id).unwrap().resolved);
        assert!(!store.get(id).unwrap().executed);
    }

    #[test]
    fn no_votes_is_rejected() {
        let (mut store, id) = store_with(0, 0);
        let outcome = ExecutionGate::default()
            .resolve(&mut store, id, Timestamp::new(301), 30_000, 30_000)
            .unwrap();
        assert!(!outcome.approved);
    }

    #[test]
    fn cannot_resolve_before_deadline() {
        let (mut store, id) = store_with(1, 0);
        let err = ExecutionGate::default()
            .resolve(&mut store, id, Timestamp::new(299), 30_000, 30_000)
            .unwrap_err();
        assert_eq!(
            err,
            GovernanceError::VotingStillOpen {
                id,
                deadline: Timestamp::new(300)
            }
        );
        assert!(!store.get(id).unwrap().resolved);
    }

    #[test]
    fn second_resolve_fails() {
        let (mut store, id) = store_with(1, 0);
        let gate = ExecutionGate::default();
        gate.resolve(&mut store, id, Timestamp::new(400), 30_000, 30_000)
            .unwrap();
        assert_eq!(
            gate.resolve(&mut store, id, Timestamp::new(401), 30_000, 30_000),
            Err(GovernanceError::AlreadyResolved(id))
        );
    }

    #[test]
    fn approved_request_needs_pool_cover() {
        let (mut store, id) = store_with(10, 0);
        let err = ExecutionGate::default()
            .resolve(&mut store, id, Timestamp::new(400), 30_000, 19_999)
            .unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InsufficientPoolFunds {
                requested: 20_000,
                available: 19_999
            }
        );
        assert!(!store.get(id).unwrap().resolved);
    }

    #[test]
    fn rejected_request_ignores_pool() {
        let (mut store, id) = store_with(0, 10);
        let outcome = ExecutionGate::default()
            .resolve(&mut store, id, Timestamp::new(400), 30_000, 0)
            .unwrap();
        assert!(!outcome.approved);
    }

    #[test]
    fn quorum_over_supply() {
        // 20% quorum of 30_000 supply = 6_000 participation.
        let gate = ExecutionGate::new(2_000);

        let (mut store, id) = store_with(5_999, 0);
        assert!(!gate
            .resolve(&mut store, id, Timestamp::new(400), 30_000, 30_000)
            .unwrap()
            .approved);

        let (mut store, id) = store_with(5_000, 1_000);
        assert!(gate
            .resolve(&mut store, id, Timestamp::new(400), 30_000, 30_000)
            .unwrap()
            .approved);
    }

    #[test]
    fn quorum_math_rounds_up_and_never_overflows() {
        assert!(meets_quorum(0, 0, 0));
        assert!(!meets_quorum(0, 0, 1));
        assert!(!meets_quorum(1, 3, 5_000)); // need 1.5 → 2
        assert!(meets_quorum(2, 3, 5_000));
        assert!(meets_quorum(u128::MAX, u128::MAX, 10_000));
        assert!(!meets_quorum(u128::MAX / 2, u128::MAX, 10_000));
    }
}
