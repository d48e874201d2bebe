//! Property-based tests for encode/decode round trips.

use std::collections::BTreeMap;

use binaryex::Value;
use proptest::prelude::*;

#[derive(Value, Debug, Default, Clone, PartialEq)]
pub struct Record {
    pub flag: bool,
    pub small: i8,
    pub wide: i64,
    pub count: u64,
    pub ratio: f64,
    pub name: String,
    pub tags: Vec<String>,
    pub scores: BTreeMap<u16, i32>,
    pub fixed: [u8; 4],
    pub note: Option<String>,
    pub children: Vec<Record>,
    hidden: u32,
}

/// Strategy for generating arbitrary `Record` instances.
fn arb_record() -> impl Strategy<Value = Record> {
    let leaf = (
        any::<bool>(),
        any::<i8>(),
        any::<i64>(),
        any::<u64>(),
        // Filter out NaN since NaN != NaN
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()),
        ".*",
        prop::collection::vec(".{0,8}", 0..6),
        prop::collection::btree_map(any::<u16>(), any::<i32>(), 0..6),
        any::<[u8; 4]>(),
        // Absent pointers decode as present zero values, so only generate
        // present ones.
        ".{0,8}".prop_map(Some),
    )
        .prop_map(|(flag, small, wide, count, ratio, name, tags, scores, fixed, note)| Record {
            flag,
            small,
            wide,
            count,
            ratio,
            name,
            tags,
            scores,
            fixed,
            note,
            children: Vec::new(),
            hidden: 0,
        });

    leaf.prop_recursive(
        3, // depth
        16, // size
        3,  // items per collection
        |inner| {
            (inner.clone(), prop::collection::vec(inner, 0..3)).prop_map(|(mut parent, children)| {
                parent.children = children;
                parent
            })
        },
    )
}

proptest! {
    #[test]
    fn signed_integers_round_trip(n in any::<i64>()) {
        let bytes = binaryex::to_vec(&n).unwrap();
        prop_assert!(bytes.len() <= binaryex::MAX_VARINT_LEN64);
        prop_assert_eq!(binaryex::from_slice::<i64>(&bytes).unwrap(), n);
    }

    #[test]
    fn unsigned_integers_round_trip(n in any::<u64>()) {
        let bytes = binaryex::to_vec(&n).unwrap();
        prop_assert!(bytes.len() <= binaryex::MAX_VARINT_LEN64);
        prop_assert_eq!(binaryex::from_slice::<u64>(&bytes).unwrap(), n);
    }

    #[test]
    fn narrow_integers_share_wide_encoding(n in any::<i16>()) {
        prop_assert_eq!(
            binaryex::to_vec(&n).unwrap(),
            binaryex::to_vec(&i64::from(n)).unwrap()
        );
    }

    #[test]
    fn text_round_trips(s in ".*") {
        let bytes = binaryex::to_vec(&s).unwrap();
        prop_assert_eq!(binaryex::from_slice::<String>(&bytes).unwrap(), s);
    }

    #[test]
    fn records_round_trip(record in arb_record()) {
        let bytes = binaryex::to_vec(&record).unwrap();
        let back: Record = binaryex::from_slice(&bytes).unwrap();
        prop_assert_eq!(back, record);
    }

    #[test]
    fn re_encoding_is_idempotent(record in arb_record()) {
        let bytes = binaryex::to_vec(&record).unwrap();
        let back: Record = binaryex::from_slice(&bytes).unwrap();
        prop_assert_eq!(binaryex::to_vec(&back).unwrap(), bytes);
    }

    #[test]
    fn lying_counts_fail_without_allocating(count in (1u64 << 32)..(i64::MAX as u64), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut bytes = binaryex::to_vec(&count).unwrap();
        bytes.extend_from_slice(&tail);
        prop_assert!(binaryex::from_slice::<Vec<u64>>(&bytes).is_err());
        prop_assert!(binaryex::from_slice::<Vec<Record>>(&bytes).is_err());
    }

    #[test]
    fn arbitrary_bytes_never_panic_with_defaults(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut record = Record::default();
        let _ = binaryex::read(&bytes[..], &mut record);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let limited = binaryex::DecoderOptions::new().max_length(1024);
        let mut record = Record::default();
        let _ = binaryex::read_with_options(&bytes[..], &mut record, limited);
    }
}
