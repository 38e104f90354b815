// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Property-based tests for valkey-cmds.
//!
//! Uses proptest to generate random inputs and verify invariants.

use proptest::prelude::*;

use valkey_cmds::Builder;
use valkey_cmds::slots::{SlotRange, SlotState, SlotTable, TOTAL_SLOTS, hash};

/// Strategy for generating valid slots.
fn any_slot() -> impl Strategy<Value = u16> {
    0..TOTAL_SLOTS
}

/// Strategy for hashtag interiors: non-empty and without a closing brace.
fn hashtag() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:._-]{1,12}"
}

/// Strategy for key prefixes without a non-empty or unmatched brace pair.
///
/// Plain text is interleaved with empty `{}` pairs, which never select a
/// hashtag on their own.
fn prefix() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof!["[a-zA-Z0-9:._-]{0,4}", Just("{}".to_string())],
        0..5,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn slot_in_range_and_deterministic(key in any::<Vec<u8>>()) {
        let slot = hash::key_slot(&key);
        prop_assert!(slot < TOTAL_SLOTS);
        prop_assert_eq!(slot, hash::key_slot(&key));
    }

    #[test]
    fn hashtag_colocates(tag in hashtag(), pre in prefix(), suffix in ".{0,12}") {
        let key = format!("{}{{{}}}{}", pre, tag, suffix);
        prop_assert_eq!(hash::slot(&key), hash::slot(&tag));
    }

    #[test]
    fn fold_is_order_independent(slots in prop::collection::vec(any_slot(), 0..20)) {
        let forward: SlotState = slots.iter().copied().collect();
        let backward: SlotState = slots.iter().rev().copied().collect();
        let mut sorted = slots.clone();
        sorted.sort_unstable();
        let ordered: SlotState = sorted.into_iter().collect();
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward, ordered);
    }

    #[test]
    fn conflict_is_absorbing(
        a in any_slot(),
        b in any_slot(),
        rest in prop::collection::vec(any_slot(), 0..20),
    ) {
        prop_assume!(a != b);
        let mut state = SlotState::Unset.observe(a).observe(b);
        prop_assert_eq!(state, SlotState::Conflict);
        for slot in rest {
            state = state.observe(slot);
            prop_assert_eq!(state, SlotState::Conflict);
        }
    }

    #[test]
    fn repeated_slot_stays_single(slot in any_slot(), n in 1usize..20) {
        let state: SlotState = std::iter::repeat_n(slot, n).collect();
        prop_assert_eq!(state, SlotState::Single(slot));
    }

    #[test]
    fn merge_matches_sequential_fold(
        left in prop::collection::vec(any_slot(), 0..10),
        right in prop::collection::vec(any_slot(), 0..10),
    ) {
        let merged = left.iter().copied().collect::<SlotState>()
            .merge(right.iter().copied().collect());
        let sequential: SlotState = left.iter().chain(right.iter()).copied().collect();
        prop_assert_eq!(merged, sequential);
    }

    #[test]
    fn builder_tracks_hashtag_slot(
        tag in hashtag(),
        suffixes in prop::collection::vec("[a-z0-9]{0,6}", 1..8),
    ) {
        let keys: Vec<String> = suffixes.iter().map(|s| format!("{{{}}}{}", tag, s)).collect();
        let (first, rest) = keys.split_first().unwrap();
        let cmd = Builder::cluster().del().key(first).keys(rest).build();
        prop_assert_eq!(cmd.slot_state(), SlotState::Single(hash::slot(&tag)));
        prop_assert_eq!(&cmd.commands()[1..], keys.as_slice());
    }

    #[test]
    fn even_table_owns_every_slot(nodes in 1u16..=64, slot in any_slot()) {
        let table = SlotTable::even(nodes);
        let owner = table.owner(slot).unwrap();
        prop_assert!(owner < usize::from(nodes));
    }

    #[test]
    fn slot_range_parse_display(a in any_slot(), b in any_slot()) {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let range = SlotRange::new(start, end).unwrap();
        let parsed: SlotRange = range.to_string().parse().unwrap();
        prop_assert_eq!(parsed, range);
    }
}
