use proptest::prelude::*;

use coffer_shares::ShareLedger;
use coffer_types::{Address, TokenMetadata};

fn account(i: usize) -> Address {
    Address::new(format!("0xacct{i}"))
}

#[derive(Clone, Debug)]
enum Op {
    Mint { to: usize, amount: u128 },
    Transfer { from: usize, to: usize, amount: u128 },
    Lock { voter: usize, amount: u128 },
    Release { voter: usize, amount: u128 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 1u128..1_000_000).prop_map(|(to, amount)| Op::Mint { to, amount }),
        (0usize..4, 0usize..4, 0u128..1_000_000)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (0usize..4, 0u128..1_000_000).prop_map(|(voter, amount)| Op::Lock { voter, amount }),
        (0usize..4, 0u128..1_000_000).prop_map(|(voter, amount)| Op::Release { voter, amount }),
    ]
}

proptest! {
    /// Σ balances == total supply after any sequence of ledger operations,
    /// including ones that fail.
    #[test]
    fn supply_is_conserved(ops in prop::collection::vec(op(), 1..64)) {
        let mut ledger = ShareLedger::new(TokenMetadata::default(), Address::new("0xtreasury"));
        let mut minted = 0u128;
        for op in ops {
            match op {
                Op::Mint { to, amount } => {
                    if ledger.mint(&account(to), amount).is_ok() {
                        minted += amount;
                    }
                }
                Op::Transfer { from, to, amount } => {
                    let _ = ledger.transfer(&account(from), &account(to), amount);
                }
                Op::Lock { voter, amount } => {
                    let _ = ledger.lock(&account(voter), amount);
                }
                Op::Release { voter, amount } => {
                    let _ = ledger.release(&account(voter), amount);
                }
            }
            let sum: u128 = ledger.holders().map(|(_, bal)| bal).sum();
            prop_assert_eq!(sum, ledger.total_supply());
            prop_assert_eq!(ledger.total_supply(), minted);
        }
    }

    /// A failed transfer leaves both balances untouched.
    #[test]
    fn failed_transfer_has_no_effect(balance in 0u128..1_000, extra in 1u128..1_000) {
        let mut ledger = ShareLedger::new(TokenMetadata::default(), Address::new("0xtreasury"));
        if balance > 0 {
            ledger.mint(&account(0), balance).unwrap();
        }
        prop_assert!(ledger.transfer(&account(0), &account(1), balance + extra).is_err());
        prop_assert_eq!(ledger.balance_of(&account(0)), balance);
        prop_assert_eq!(ledger.balance_of(&account(1)), 0);
    }
}
