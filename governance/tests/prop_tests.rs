use proptest::prelude::*;

use coffer_governance::{ExecutionGate, RequestStore, VotingEngine};
use coffer_shares::ShareLedger;
use coffer_types::{Address, GovernanceParams, RequestId, Timestamp, TokenMetadata, VoteSide};

fn owner() -> Address {
    Address::new("0xowner")
}

fn voter(i: usize) -> Address {
    Address::new(format!("0xvoter{i}"))
}

#[derive(Clone, Debug)]
enum Op {
    Vote { who: usize, request: u64, amount: u128, yes: bool },
    Reclaim { who: usize, request: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..4, 0u64..3, 0u128..6_000, any::<bool>())
            .prop_map(|(who, request, amount, yes)| Op::Vote { who, request, amount, yes }),
        1 => (0usize..4, 0u64..3).prop_map(|(who, request)| Op::Reclaim { who, request }),
    ]
}

proptest! {
    /// Each request's weights equal the shares its voters locked, whether or
    /// not they were reclaimed since, and escrow tracks what is still locked.
    #[test]
    fn tallies_and_escrow_follow_records(
        ops in prop::collection::vec(op(), 1..64),
        resolve_after in 0usize..64,
    ) {
        let mut ledger = ShareLedger::new(TokenMetadata::default(), Address::new("0xtreasury"));
        for i in 0..4 {
            ledger.mint(&voter(i), 10_000).unwrap();
        }
        let mut requests = RequestStore::new(owner(), GovernanceParams::default());
        for _ in 0..3 {
            requests
                .initiate_withdrawal(&owner(), 1_000, "prop", 300, 40_000, Timestamp::EPOCH)
                .unwrap();
        }
        let mut voting = VotingEngine::new();
        let mut now = Timestamp::new(1);

        for (step, op) in ops.into_iter().enumerate() {
            if step == resolve_after {
                // Close voting and settle every request so reclaims can succeed.
                now = Timestamp::new(300);
                let gate = ExecutionGate::default();
                for raw in 0..3 {
                    gate.resolve(&mut requests, RequestId::new(raw), now, ledger.total_supply(), u128::MAX)
                        .unwrap();
                }
            }
            match op {
                Op::Vote { who, request, amount, yes } => {
                    let side = if yes { VoteSide::Yes } else { VoteSide::No };
                    let _ = voting.vote(&mut ledger, &mut requests, &voter(who), RequestId::new(request), amount, side, now);
                }
                Op::Reclaim { who, request } => {
                    let _ = voting.reclaim(&mut ledger, &requests, &voter(who), RequestId::new(request));
                }
            }

            prop_assert!(voting.matches_tallies(&requests));
            prop_assert_eq!(ledger.escrowed(), voting.total_locked());
            for request in requests.iter() {
                let cast: u128 = voting.records_for(request.id).map(|(_, r)| r.locked()).sum();
                prop_assert_eq!(request.participation(), Some(cast));
            }
            let held: u128 = (0..4).map(|i| ledger.balance_of(&voter(i)) + voting.locked_by(&voter(i))).sum();
            prop_assert_eq!(held, 40_000);
        }
    }
}
