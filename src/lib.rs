//! Least-cost word segmentation for Khmer text.
//!
//! A [`KhmerSegmenter`] holds an immutable dictionary, cost model and rule
//! table; [`KhmerSegmenter::segment`] normalizes a line, runs a Viterbi
//! pass over its code points, then cleans the raw tokens up with the rule
//! engine and the unknown collapser. One instance can serve any number of
//! threads concurrently.

pub mod cluster;
pub mod constants;
pub mod dictionary;
pub mod kdic;
pub mod normalize;
pub mod rules;
pub mod segmenter;

pub use dictionary::Dictionary;
pub use rules::RuleEngine;
pub use segmenter::KhmerSegmenter;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dictionary not found at {0}")]
    MissingDictionary(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed JSON source: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid KDIC data: {0}")]
    InvalidKdic(String),

    // The repair edge makes every position reachable; hitting this means
    // the DP itself is broken.
    #[error("segmentation stuck at code point {index} of {total}, next: {snippet:?}")]
    Unreachable {
        index: usize,
        total: usize,
        snippet: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
