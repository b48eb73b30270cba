use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fxhash::FxHashMap;

use crate::constants::{is_digit, is_separator, is_valid_single_word, COENG, DA, RO, TA};
use crate::{Error, Result};

// Counts below this floor are clamped up before the -log10 transform, so
// rare and unseen dictionary words cost the same.
const MIN_FREQ_FLOOR: f32 = 5.0;
const UNKNOWN_COST_OFFSET: f32 = 5.0;

// Fallback costs used when no frequency table is available at all.
const FALLBACK_DEFAULT_COST: f32 = 10.0;
const FALLBACK_UNKNOWN_COST: f32 = 20.0;

#[derive(Default, Debug)]
pub struct TrieNode {
    children: FxHashMap<char, Box<TrieNode>>,
    word_cost: Option<f32>,
}

impl TrieNode {
    #[inline]
    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c).map(|b| b.as_ref())
    }

    /// Cost of the word ending at this node, if one does.
    #[inline]
    pub fn word_cost(&self) -> Option<f32> {
        self.word_cost
    }

    fn child_mut(&mut self, c: char) -> &mut TrieNode {
        self.children.entry(c).or_default()
    }
}

/// The word list and cost model, built once and immutable afterwards.
/// Every stored word carries its resolved cost (explicit frequency cost,
/// or the default for in-dictionary words without one); lookups that miss
/// entirely fall back to `unknown_cost`.
#[derive(Debug)]
pub struct Dictionary {
    words: FxHashMap<String, f32>,
    trie: TrieNode,
    max_word_len: usize, // in code points; bounds the DP inner loop
    default_cost: f32,
    unknown_cost: f32,
}

impl Dictionary {
    /// Load from a plain-text word list (one word per line) and a JSON
    /// frequency table. A missing dictionary fails construction; a missing
    /// frequency file only costs us the corpus-derived weights.
    pub fn load(dict_path: &Path, freq_path: &Path) -> Result<Self> {
        if !dict_path.exists() {
            return Err(Error::MissingDictionary(dict_path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(dict_path)?);
        let mut raw_words = Vec::new();
        for line in reader.lines() {
            let word = line?.trim().to_string();
            if !word.is_empty() {
                raw_words.push(word);
            }
        }

        let freqs = load_frequencies(freq_path)?;
        Ok(Self::build(raw_words, &freqs))
    }

    /// Build from in-memory sources. Variant generation, word filtering
    /// and cost derivation all happen here.
    pub fn build(words: impl IntoIterator<Item = String>, freqs: &BTreeMap<String, u64>) -> Self {
        let mut set: HashSet<String> = HashSet::new();
        for word in words {
            let mut chars = word.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                // Single code points must be valid standalone words.
                if !is_valid_single_word(c) {
                    continue;
                }
            }
            for v in generate_variants(&word) {
                set.insert(v);
            }
            set.insert(word);
        }

        apply_filters(&mut set);

        let (costs, default_cost, unknown_cost) = compute_costs(freqs);

        let mut map = FxHashMap::default();
        map.reserve(set.len());
        let mut trie = TrieNode::default();
        let mut max_word_len = 0;

        for word in set {
            let cost = costs.get(&word).copied().unwrap_or(default_cost);
            max_word_len = max_word_len.max(word.chars().count());

            let mut node = &mut trie;
            for c in word.chars() {
                node = node.child_mut(c);
            }
            node.word_cost = Some(cost);

            map.insert(word, cost);
        }

        Dictionary {
            words: map,
            trie,
            max_word_len,
            default_cost,
            unknown_cost,
        }
    }

    /// Reassemble from precompiled entries (KDIC). Filters and variants
    /// were already applied when the file was written.
    pub(crate) fn from_precompiled(
        entries: Vec<(String, f32)>,
        default_cost: f32,
        unknown_cost: f32,
        max_word_len: usize,
    ) -> Self {
        let mut map = FxHashMap::default();
        map.reserve(entries.len());
        let mut trie = TrieNode::default();

        for (word, cost) in entries {
            let mut node = &mut trie;
            for c in word.chars() {
                node = node.child_mut(c);
            }
            node.word_cost = Some(cost);
            map.insert(word, cost);
        }

        Dictionary {
            words: map,
            trie,
            max_word_len,
            default_cost,
            unknown_cost,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Cost of segmenting `word` as one token: its table entry if stored,
    /// `unknown_cost` otherwise.
    pub fn cost(&self, word: &str) -> f32 {
        self.words.get(word).copied().unwrap_or(self.unknown_cost)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    pub fn default_cost(&self) -> f32 {
        self.default_cost
    }

    pub fn unknown_cost(&self) -> f32 {
        self.unknown_cost
    }

    pub fn trie(&self) -> &TrieNode {
        &self.trie
    }

    /// All stored words with their resolved costs, in map order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f32)> {
        self.words.iter().map(|(w, &c)| (w.as_str(), c))
    }

    /// A length-1 segment that is not a valid standalone base character,
    /// not a digit, not a separator and not in the dictionary.
    pub fn is_invalid_single(&self, seg: &str) -> bool {
        let mut chars = seg.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        !(is_valid_single_word(c) || is_digit(c) || is_separator(c) || self.contains(seg))
    }
}

fn load_frequencies(path: &Path) -> Result<BTreeMap<String, u64>> {
    if !path.exists() {
        println!(
            "Frequency file not found at {}. Using default costs.",
            path.display()
        );
        return Ok(BTreeMap::new());
    }
    let data = serde_json::from_reader(File::open(path)?)?;
    Ok(data)
}

/// Drop entries the segmenter must never match whole: words carrying the
/// repetition mark, words opening with a COENG, and "ឬ" compounds whose
/// remaining parts are themselves words (those must split at the "or").
fn apply_filters(words: &mut HashSet<String>) {
    let mut remove: Vec<String> = Vec::new();

    for word in words.iter() {
        if word.contains('ឬ') && word.chars().count() > 1 {
            if let Some(suffix) = word.strip_prefix('ឬ') {
                if words.contains(suffix) {
                    remove.push(word.clone());
                }
            } else if let Some(prefix) = word.strip_suffix('ឬ') {
                if words.contains(prefix) {
                    remove.push(word.clone());
                }
            } else if word.split('ឬ').all(|p| p.is_empty() || words.contains(p)) {
                remove.push(word.clone());
            }
        }

        if word.contains('ៗ') {
            remove.push(word.clone());
        }
        if word.starts_with(COENG) {
            remove.push(word.clone());
        }
    }

    for w in remove {
        words.remove(&w);
    }
}

/// Laplace-floored cost table. Effective counts are clamped to the floor,
/// the total is summed over primary entries only, and generated variants
/// inherit their primary's effective count unless they carry their own.
fn compute_costs(freqs: &BTreeMap<String, u64>) -> (FxHashMap<String, f32>, f32, f32) {
    let mut costs = FxHashMap::default();
    if freqs.is_empty() {
        return (costs, FALLBACK_DEFAULT_COST, FALLBACK_UNKNOWN_COST);
    }

    let mut effective: BTreeMap<&str, f32> = BTreeMap::new();
    let mut variant_effective: BTreeMap<String, f32> = BTreeMap::new();
    let mut total = 0.0f32;

    for (word, &count) in freqs {
        let eff = (count as f32).max(MIN_FREQ_FLOOR);
        effective.insert(word.as_str(), eff);
        total += eff;

        for v in generate_variants(word) {
            variant_effective.entry(v).or_insert(eff);
        }
    }

    let default_cost = -(MIN_FREQ_FLOOR / total).log10();
    let unknown_cost = default_cost + UNKNOWN_COST_OFFSET;

    for (&word, &eff) in &effective {
        costs.insert(word.to_string(), -(eff / total).log10());
    }
    for (word, eff) in variant_effective {
        if !costs.contains_key(&word) {
            costs.insert(word, -(eff / total).log10());
        }
    }

    (costs, default_cost, unknown_cost)
}

/// Spelling variants scored identically to their primary:
/// 1. every Coeng Ta replaced by Coeng Da (and vice versa), one step;
/// 2. Coeng Ro swapped with an adjacent non-Ro subscript, either order.
pub(crate) fn generate_variants(word: &str) -> HashSet<String> {
    let mut variants = HashSet::new();

    let coeng_ta: String = [COENG, TA].iter().collect();
    let coeng_da: String = [COENG, DA].iter().collect();

    if word.contains(&coeng_ta) {
        variants.insert(word.replace(&coeng_ta, &coeng_da));
    }
    if word.contains(&coeng_da) {
        variants.insert(word.replace(&coeng_da, &coeng_ta));
    }

    // Ro-order swaps apply to the original and to its Ta/Da forms.
    let mut base_set: Vec<String> = variants.iter().cloned().collect();
    base_set.push(word.to_string());

    for w in base_set {
        let chars: Vec<char> = w.chars().collect();
        if chars.len() < 4 {
            continue;
        }
        if let Some(swapped) = swap_subscript_pair(&chars, true) {
            variants.insert(swapped);
        }
        if let Some(swapped) = swap_subscript_pair(&chars, false) {
            variants.insert(swapped);
        }
    }

    variants.remove(word);
    variants
}

/// Swap adjacent subscript units `[COENG a][COENG b]` wherever exactly one
/// of the two is Ro. `ro_first` selects which side the Ro starts on.
/// Non-overlapping, left to right. Returns None when nothing matched.
fn swap_subscript_pair(chars: &[char], ro_first: bool) -> Option<String> {
    let mut out = chars.to_vec();
    let mut modified = false;

    let mut i = 0;
    while i + 3 < out.len() {
        let pattern = out[i] == COENG
            && out[i + 2] == COENG
            && if ro_first {
                out[i + 1] == RO && out[i + 3] != RO
            } else {
                out[i + 1] != RO && out[i + 3] == RO
            };

        if pattern {
            out.swap(i + 1, i + 3);
            modified = true;
            i += 4;
        } else {
            i += 1;
        }
    }

    modified.then(|| out.into_iter().collect())
}
