//! Normalizer behavior: composite merges, cluster reordering, zero-width
//! stripping, idempotence.

use khmer_segmenter::normalize::normalize;

#[test]
fn test_composite_e_i_merges_to_oe() {
    // Ka + E + I -> Ka + OE
    let input = "ក\u{17C1}\u{17B8}";
    assert_eq!(normalize(input), "ក\u{17BE}");
}

#[test]
fn test_composite_e_aa_merges_to_au() {
    let input = "ក\u{17C1}\u{17B6}";
    assert_eq!(normalize(input), "ក\u{17C4}");
}

#[test]
fn test_ro_subscript_sorts_after_other_subscript() {
    // Ka + Coeng Ro + Coeng Ta reorders to Ka + Coeng Ta + Coeng Ro.
    let input = "ក\u{17D2}\u{179A}\u{17D2}\u{178F}";
    assert_eq!(normalize(input), "ក\u{17D2}\u{178F}\u{17D2}\u{179A}");
}

#[test]
fn test_vowel_sorts_after_subscript() {
    // Ka + AA + Coeng Ta reorders to Ka + Coeng Ta + AA.
    let input = "ក\u{17B6}\u{17D2}\u{178F}";
    assert_eq!(normalize(input), "ក\u{17D2}\u{178F}\u{17B6}");
}

#[test]
fn test_sign_sorts_after_vowel() {
    // Ka + Nikahit + AA reorders to Ka + AA + Nikahit.
    let input = "ក\u{17C6}\u{17B6}";
    assert_eq!(normalize(input), "ក\u{17B6}\u{17C6}");
}

#[test]
fn test_already_canonical_cluster_is_untouched() {
    let input = "កម្លាំង";
    assert_eq!(normalize(input), input);
}

#[test]
fn test_zero_width_characters_are_stripped() {
    let input = "ក\u{200B}ខ\u{200C}គ\u{200D}";
    assert_eq!(normalize(input), "កខគ");
}

#[test]
fn test_isolated_vowel_passes_through() {
    assert_eq!(normalize("\u{17B6}ក"), "\u{17B6}ក");
}

#[test]
fn test_trailing_coeng_is_kept() {
    assert_eq!(normalize("ក\u{17D2}"), "ក\u{17D2}");
}

#[test]
fn test_coeng_before_independent_vowel_is_not_absorbed() {
    // Ka + AA + Coeng + QI + Nikahit partitions as three clusters, none
    // of which reorders; the Coeng must not pull the independent vowel in
    // as a subscript and drag AA behind it.
    let input = "ក\u{17B6}\u{17D2}\u{17A5}\u{17C6}";
    assert_eq!(normalize(input), input);
}

#[test]
fn test_non_khmer_text_is_untouched() {
    assert_eq!(normalize("hello, 123"), "hello, 123");
}

#[test]
fn test_empty_input() {
    assert_eq!(normalize(""), "");
}

#[test]
fn test_reorder_exposed_composite_still_merges() {
    // Ka + E + Coeng Ta + I: reordering moves the subscript before the
    // vowels, making E and I adjacent; they must still merge to OE.
    let input = "ក\u{17C1}\u{17D2}\u{178F}\u{17B8}";
    assert_eq!(normalize(input), "ក\u{17D2}\u{178F}\u{17BE}");
}

#[test]
fn test_normalize_is_idempotent() {
    let inputs = [
        "កងកម្លាំងរក្សាសន្តិសុខ",
        "ក\u{17C1}\u{17B8}ង",
        "ក\u{17D2}\u{179A}\u{17D2}\u{178F}",
        "ក\u{17B6}\u{17D2}\u{178F}",
        "ក\u{17C1}\u{17D2}\u{178F}\u{17B8}",
        "\u{17D2}\u{17B6}\u{17D2}",
        "ក\u{17B6}\u{17D2}\u{17A5}\u{17C6}",
        "ក\u{200B}ខ",
        "mixed ក\u{17C6}\u{17B6} text",
    ];
    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "input: {input:?}");
    }
}

#[test]
fn test_output_never_longer_than_input() {
    let inputs = ["ក\u{17C1}\u{17B8}", "ក\u{200B}ខ", "កម្លាំង", "abc"];
    for input in inputs {
        assert!(normalize(input).chars().count() <= input.chars().count());
    }
}
