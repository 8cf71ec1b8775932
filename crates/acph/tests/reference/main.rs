//! Scenario tests over realistic key sets: every input key must round-trip
//! to its payload, unrelated keys must miss, duplicates must be rejected,
//! and the accounting must stay sane.

use acph::{
    Report,
    Tree,
};

mod strings;

const NEVER_KEYS: &[&str] = &[
    "NeverAValidValueInTheseTests",
    "AnotherNeverAValidValueInTheseTests",
    "YetAnotherNeverNotValid",
];

/// Builds a tree mapping each key to its input index and checks the full
/// round trip: every key resolves to its payload, the [`NEVER_KEYS`] miss,
/// and the report is internally consistent. Returns the report so callers
/// can assert scenario-specific bounds.
#[track_caller]
fn assert_round_trip<K: AsRef<[u8]>>(keys: &[K]) -> Report {
    let tree = Tree::from_entries(
        keys.iter()
            .enumerate()
            .map(|(payload, key)| (key, payload as i64)),
    )
    .expect("scenario keys are distinct");
    assert_eq!(keys.len(), tree.len());

    for (payload, key) in keys.iter().enumerate() {
        assert_eq!(
            Some(&(payload as i64)),
            tree.get(key),
            "key {} must resolve to its payload",
            String::from_utf8_lossy(key.as_ref()),
        );
    }
    for never in NEVER_KEYS {
        assert!(
            tree.get(never).is_none(),
            "`{never}` was never inserted and must miss",
        );
    }

    let report = tree.report();
    assert!(report.slot_efficiency() <= 100);
    assert!(report.empty_slots() <= report.slots());
    if !keys.is_empty() {
        assert!(report.max_depth() >= 1);
        assert!(report.occupied_slots() >= keys.len());
    }
    report
}
