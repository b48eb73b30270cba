use std::path::Path;

use crate::cluster::{acronym_len, cluster_len, is_acronym_start, is_currency_start, number_len};
use crate::constants::*;
use crate::dictionary::Dictionary;
use crate::normalize::normalize;
use crate::rules::{collapse_unknowns, RuleEngine};
use crate::{Error, Result};

const NUMBER_COST: f32 = 1.0;
const SEPARATOR_COST: f32 = 0.1;
// Extra charge on top of unknown_cost for a single code point that cannot
// stand alone, and for the repair edge that consumes an otherwise
// unreachable position.
const INVALID_SINGLE_PENALTY: f32 = 10.0;
const REPAIR_PENALTY: f32 = 50.0;

pub struct KhmerSegmenter {
    dictionary: Dictionary,
    rules: RuleEngine,
}

impl KhmerSegmenter {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_rules(dictionary, RuleEngine::default())
    }

    pub fn with_rules(dictionary: Dictionary, rules: RuleEngine) -> Self {
        KhmerSegmenter { dictionary, rules }
    }

    /// Build from a word list and frequency table on disk, with the
    /// built-in rule table.
    pub fn from_paths(dict_path: &Path, freq_path: &Path) -> Result<Self> {
        Ok(Self::new(Dictionary::load(dict_path, freq_path)?))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Segment one line. The input is normalized first; the returned
    /// tokens concatenate back to exactly that normalized form.
    pub fn segment(&self, text: &str) -> Result<Vec<String>> {
        let text = normalize(text);
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let cps: Vec<char> = text.chars().collect();
        let raw = self.viterbi(&cps)?;
        let merged = self.rules.apply(raw, &self.dictionary);
        Ok(collapse_unknowns(merged, &self.dictionary))
    }

    fn viterbi(&self, cps: &[char]) -> Result<Vec<String>> {
        let n = cps.len();

        // dp[i] holds the cheapest (cost, back pointer) reaching offset i.
        let mut dp: Vec<(f32, isize)> = vec![(f32::INFINITY, -1); n + 1];
        dp[0] = (0.0, -1);

        for i in 0..n {
            let (here, _) = dp[i];
            if here.is_infinite() {
                continue;
            }
            let c = cps[i];

            // Repair gate: a COENG dangling behind us obligated an
            // attachment that never happened, or a dependent vowel has
            // nothing to attach to. Consume one code point at a punitive
            // cost and relax nothing else from this position.
            if (i > 0 && is_coeng(cps[i - 1])) || is_dependent_vowel(c) {
                let cost = here + self.dictionary.unknown_cost() + REPAIR_PENALTY;
                relax(&mut dp, i, i + 1, cost);
                continue;
            }

            // Number grouping, with a leading currency symbol pulled into
            // the same token. Checked before separators so "$50.00" is not
            // split at the '$'.
            if is_digit(c) {
                let len = number_len(cps, i);
                relax(&mut dp, i, i + len, here + NUMBER_COST);
            } else if is_currency_start(cps, i) {
                let len = 1 + number_len(cps, i + 1);
                relax(&mut dp, i, i + len, here + NUMBER_COST);
            } else if is_separator(c) {
                relax(&mut dp, i, i + 1, here + SEPARATOR_COST);
            }

            // Acronym chain (cluster + '.')+, priced to beat unknown runs
            // but never a common word plus punctuation.
            if is_acronym_start(cps, i) {
                let len = acronym_len(cps, i);
                relax(&mut dp, i, i + len, here + self.dictionary.default_cost());
            }

            // Dictionary words: one incremental trie walk per start
            // position, bounded by the longest stored word.
            let end_limit = (i + self.dictionary.max_word_len()).min(n);
            let mut node = self.dictionary.trie();
            for j in i..end_limit {
                match node.child(cps[j]) {
                    Some(next) => {
                        node = next;
                        if let Some(cost) = next.word_cost() {
                            relax(&mut dp, i, j + 1, here + cost);
                        }
                    }
                    None => break,
                }
            }

            // Unknown fallback: one whole cluster for Khmer input, one
            // code point for anything else.
            let len = if is_khmer_char(c) { cluster_len(cps, i) } else { 1 };
            let mut cost = self.dictionary.unknown_cost();
            if len == 1 && !is_valid_single_word(c) {
                cost += INVALID_SINGLE_PENALTY;
            }
            relax(&mut dp, i, i + len, here + cost);
        }

        let mut segments: Vec<String> = Vec::new();
        let mut curr = n;
        while curr > 0 {
            let (_, prev) = dp[curr];
            if prev < 0 {
                let index = dp
                    .iter()
                    .rposition(|&(cost, _)| cost.is_finite())
                    .unwrap_or(0);
                let snippet: String = cps[index..(index + 20).min(n)].iter().collect();
                return Err(Error::Unreachable {
                    index,
                    total: n,
                    snippet,
                });
            }
            let prev = prev as usize;
            segments.push(cps[prev..curr].iter().collect());
            curr = prev;
        }
        segments.reverse();
        Ok(segments)
    }
}

// Strictly-smaller comparison: equal cost keeps the earlier back pointer.
fn relax(dp: &mut [(f32, isize)], from: usize, to: usize, cost: f32) {
    if to < dp.len() && cost < dp[to].0 {
        dp[to] = (cost, from as isize);
    }
}
