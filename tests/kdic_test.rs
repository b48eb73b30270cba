//! Compiled dictionary format: header layout, hashing, probing, loading.

use std::collections::BTreeMap;

use khmer_segmenter::{kdic, Dictionary, Error, KhmerSegmenter};

fn sample_dict() -> Dictionary {
    let words = ["ក", "កង", "កម្លាំង", "សន្តិសុខ", "ខ្ញុំ", "ទៅ"];
    let freqs: BTreeMap<String, u64> =
        words.iter().map(|w| (w.to_string(), 1000)).collect();
    Dictionary::build(words.iter().map(|w| w.to_string()), &freqs)
}

#[test]
fn test_djb2_reference_values() {
    assert_eq!(kdic::djb2(b""), 5381);
    assert_eq!(kdic::djb2(b"a"), 5381u32.wrapping_mul(33) + u32::from(b'a'));
}

#[test]
fn test_header_layout() {
    let dict = sample_dict();
    let bytes = kdic::encode(&dict);

    assert_eq!(&bytes[0..4], b"KDIC");
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 1);

    let num_entries = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
    assert_eq!(num_entries as usize, dict.len());

    let table_size = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
    assert!(table_size.is_power_of_two());
    // Load factor stays at or below 0.70.
    assert!(f64::from(num_entries) <= f64::from(table_size) * 0.70);

    let reserved = u32::from_le_bytes(bytes[28..32].try_into().unwrap());
    assert_eq!(reserved, 0);
}

#[test]
fn test_encode_is_deterministic() {
    let a = kdic::encode(&sample_dict());
    let b = kdic::encode(&sample_dict());
    assert_eq!(a, b);
}

#[test]
fn test_decode_restores_the_dictionary() {
    let original = sample_dict();
    let restored = kdic::decode(&kdic::encode(&original)).unwrap();

    assert_eq!(restored.len(), original.len());
    assert_eq!(restored.max_word_len(), original.max_word_len());
    assert_eq!(restored.default_cost(), original.default_cost());
    assert_eq!(restored.unknown_cost(), original.unknown_cost());

    for (word, cost) in original.entries() {
        assert!(restored.contains(word), "missing {word:?}");
        assert_eq!(restored.cost(word), cost);
    }

    // Variants were baked in at build time and survive the round trip.
    let variant = "សន្តិសុខ".replace("\u{17D2}\u{178F}", "\u{17D2}\u{178A}");
    assert!(restored.contains(&variant));
}

#[test]
fn test_restored_dictionary_segments_identically() {
    let original = sample_dict();
    let restored = kdic::decode(&kdic::encode(&original)).unwrap();

    let a = KhmerSegmenter::new(original);
    let b = KhmerSegmenter::new(restored);

    let input = "កងកម្លាំងសន្តិសុខ ខ្ញុំទៅ 123";
    assert_eq!(a.segment(input).unwrap(), b.segment(input).unwrap());
}

#[test]
fn test_bad_magic_is_rejected() {
    let mut bytes = kdic::encode(&sample_dict());
    bytes[0] = b'X';
    assert!(matches!(
        kdic::decode(&bytes),
        Err(Error::InvalidKdic(_))
    ));
}

#[test]
fn test_unsupported_version_is_rejected() {
    let mut bytes = kdic::encode(&sample_dict());
    bytes[4] = 9;
    assert!(matches!(
        kdic::decode(&bytes),
        Err(Error::InvalidKdic(_))
    ));
}

#[test]
fn test_truncated_input_is_rejected() {
    let bytes = kdic::encode(&sample_dict());
    assert!(kdic::decode(&bytes[..16]).is_err());
    assert!(kdic::decode(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn test_empty_dictionary_round_trips() {
    let dict = Dictionary::build(Vec::<String>::new(), &BTreeMap::new());
    let restored = kdic::decode(&kdic::encode(&dict)).unwrap();
    assert!(restored.is_empty());
}
