use proptest::prelude::*;

use coffer_types::{Address, RequestId, Timestamp, VoteSide};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// A deadline built from `start + duration` is reached exactly at that second.
    #[test]
    fn deadline_reached_exactly(start in 0u64..1_000_000, duration in 121u64..1_000_000) {
        let deadline = Timestamp::new(start).checked_add_secs(duration).unwrap();
        prop_assert!(!deadline.has_passed(Timestamp::new(start + duration - 1)));
        prop_assert!(deadline.has_passed(Timestamp::new(start + duration)));
    }

    /// Request ids are strictly increasing.
    #[test]
    fn request_id_next_is_greater(raw in 0u64..u64::MAX) {
        let id = RequestId::new(raw);
        prop_assert!(id.next().unwrap() > id);
    }

    /// Any address without whitespace parses back to itself.
    #[test]
    fn address_parse_identity(raw in "[0-9a-zA-Z_]{1,42}") {
        let addr = Address::parse(&raw).unwrap();
        prop_assert_eq!(addr.as_str(), raw.as_str());
    }

    /// Only 0 and 1 decode as vote sides.
    #[test]
    fn vote_side_decoding(raw in 0u8..=u8::MAX) {
        prop_assert_eq!(VoteSide::try_from(raw).is_ok(), raw <= 1);
    }
}

#[test]
fn timestamp_bincode_roundtrip() {
    let ts = Timestamp::new(1_700_000_000);
    let encoded = bincode::serialize(&ts).unwrap();
    let decoded: Timestamp = bincode::deserialize(&encoded).unwrap();
    assert_eq!(decoded, ts);
}
