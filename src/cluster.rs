//! Span measurers over code-point slices: orthographic clusters, number
//! runs and acronym chains. These run O(n) times per line, so everything
//! here is branch work on char ranges, no allocation.

use crate::constants::*;

/// Length in code points of the Khmer orthographic cluster starting at
/// `start`. A cluster is a base consonant or independent vowel followed by
/// subscript units (COENG + consonant), dependent vowels and signs. Any
/// other starting code point measures as 1, including a stray COENG. A
/// trailing COENG with no consonant after it is not absorbed.
pub fn cluster_len(cps: &[char], start: usize) -> usize {
    if start >= cps.len() {
        return 0;
    }

    let first = cps[start];
    if !(is_consonant(first) || is_independent_vowel(first)) {
        return 1;
    }

    let mut i = start + 1;
    while i < cps.len() {
        let c = cps[i];

        if is_coeng(c) {
            if i + 1 < cps.len() && is_consonant(cps[i + 1]) {
                i += 2;
                continue;
            }
            break;
        }

        if is_dependent_vowel(c) || is_sign(c) {
            i += 1;
            continue;
        }

        break;
    }

    i - start
}

/// Length in code points of the number run starting at `start`, or 0 when
/// `cps[start]` is not a digit. `,`, `.` and a single space are absorbed
/// only when a digit follows immediately, so "1 000 000" and "1,234.56"
/// are single runs while "50." stops before the dot.
pub fn number_len(cps: &[char], start: usize) -> usize {
    if start >= cps.len() || !is_digit(cps[start]) {
        return 0;
    }

    let mut last_valid = 1;
    let mut i = start + 1;
    while i < cps.len() {
        let c = cps[i];

        if is_digit(c) {
            last_valid = i - start + 1;
            i += 1;
            continue;
        }

        if matches!(c, ',' | '.' | ' ') && i + 1 < cps.len() && is_digit(cps[i + 1]) {
            last_valid = i - start + 2;
            i += 2;
            continue;
        }
        break;
    }

    last_valid
}

/// True when `cps[start]` opens a `(cluster + '.')` pair: the position must
/// hold a base consonant or independent vowel, ruling out ".." or ". ".
pub fn is_acronym_start(cps: &[char], start: usize) -> bool {
    if start + 1 >= cps.len() {
        return false;
    }
    let c = cps[start];
    if !(is_consonant(c) || is_independent_vowel(c)) {
        return false;
    }

    let len = cluster_len(cps, start);
    len > 0 && start + len < cps.len() && cps[start + len] == '.'
}

/// Length in code points of the acronym chain `(cluster + '.')+` starting
/// at `start`. Each link must open with a base consonant or independent
/// vowel for the chain to continue.
pub fn acronym_len(cps: &[char], start: usize) -> usize {
    let mut i = start;

    while i < cps.len() {
        let c = cps[i];
        if !(is_consonant(c) || is_independent_vowel(c)) {
            break;
        }

        let len = cluster_len(cps, i);
        if len == 0 {
            break;
        }
        let dot = i + len;
        if dot < cps.len() && cps[dot] == '.' {
            i = dot + 1;
        } else {
            break;
        }
    }

    i - start
}

/// True when `cps[start]` is a currency symbol with a digit directly after
/// it, so "$50" groups as one token instead of separator + number.
pub fn is_currency_start(cps: &[char], start: usize) -> bool {
    start + 1 < cps.len() && is_currency_symbol(cps[start]) && is_digit(cps[start + 1])
}
