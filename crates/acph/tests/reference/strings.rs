use acph::Tree;
use hex_literal::hex;
use rand::{
    rngs::StdRng,
    Rng as _,
    SeedableRng as _,
};

use super::assert_round_trip;

#[test]
fn six_names_round_trip() {
    assert_round_trip(&[
        "Mr Smith",
        "Mr Jones",
        "Ms Leonard",
        "Ms James",
        "Mrs Peabody",
        "Mr Smile",
    ]);
}

#[test]
fn a_single_key_round_trips() {
    assert_round_trip(&["A"]);
    assert_round_trip(&["AB"]);
}

#[test]
fn a_single_empty_key_round_trips() {
    assert_round_trip(&[""]);
}

#[test]
fn an_empty_key_among_names_round_trips() {
    assert_round_trip(&[
        "Mr Smith",
        "Mr Jones",
        "",
        "Ms James",
        "Mrs Peabody",
        "Mr Smile",
    ]);
}

#[test]
fn prefix_chains_are_not_confused() {
    let keys = ["AB", "ABC", "ABCD", "ABCDE", "ABCDEF"];
    assert_round_trip(&keys);

    let tree =
        Tree::from_entries(keys.iter().enumerate().map(|(payload, key)| (key, payload))).unwrap();
    // Neither a proper prefix nor an extension of a stored key may hit.
    assert!(tree.get("A").is_none());
    assert!(tree.get("ABCDEFG").is_none());
}

#[test]
fn an_exact_duplicate_pair_is_rejected() {
    let err = Tree::from_entries([("AB", 0), ("AB", 1)]).unwrap_err();
    assert_eq!(b"AB", err.key());
}

#[test]
fn a_duplicate_among_distinct_keys_is_rejected() {
    let keys = ["AB", "ABC", "AB", "ABCD", "ABCDE"];
    let result = Tree::from_entries(keys.iter().enumerate().map(|(payload, key)| (key, payload)));
    assert!(result.is_err());
}

#[test]
fn raw_binary_keys_round_trip() {
    let keys: Vec<Vec<u8>> = vec![
        hex!("00").to_vec(),
        hex!("10").to_vec(),
        hex!("2021").to_vec(),
        hex!("3031").to_vec(),
        hex!("40414243").to_vec(),
        hex!("5051525354555657").to_vec(),
        hex!("606162636465666768696a6b6c6d6e6f").to_vec(),
    ];
    assert_round_trip(&keys);
}

#[test]
fn the_empty_key_and_a_zero_byte_key_cannot_coexist() {
    // Both project 0 in every column, so they cannot be separated.
    let result = Tree::from_entries([(&b""[..], 0), (&hex!("00")[..], 1)]);
    assert!(result.is_err());
}

#[test]
fn a_thousand_keys_with_a_common_prefix_round_trip() {
    let keys: Vec<String> = (0..1000).map(|i| format!("PrefixString{i}")).collect();
    assert_round_trip(&keys);
}

#[test]
fn a_thousand_random_keys_resolve_shallowly() {
    let mut rng = StdRng::seed_from_u64(0);
    let keys: Vec<String> = (0..1000)
        .map(|i| {
            let length = rng.gen_range(1..=90);
            let letters: String = (0..length)
                .map(|_| char::from(b'a' + rng.gen_range(0..26)))
                .collect();
            // The appended index keeps the corpus collision-free.
            format!("{letters}-{i}")
        })
        .collect();

    let report = assert_round_trip(&keys);
    // Not a hard guarantee, but a regression signal: this corpus has
    // historically separated within a handful of levels.
    assert!(
        report.max_depth() <= 10,
        "lookup depth regressed: {report}",
    );
}
