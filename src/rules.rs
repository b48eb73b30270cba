//! Declarative post-processing of raw segment lists. Rules live in an
//! external JSON table, are sorted once by descending priority at load
//! time, and rewrite the segmentation in place through cascading merges.
//! A rule whose pattern fails to compile is reported and skipped; the
//! rest of the table still loads.

use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::constants::{is_digit, is_separator, is_valid_single_word};
use crate::dictionary::Dictionary;
use crate::Result;

/// Rule table compiled into the binary; callers may override it with
/// [`RuleEngine::from_path`].
pub const DEFAULT_RULES: &str = include_str!("../data/rules.json");

#[derive(Deserialize)]
struct RuleSpec {
    #[serde(default)]
    priority: i64,
    trigger: TriggerSpec,
    #[serde(default)]
    checks: Vec<CheckSpec>,
    action: Action,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TriggerSpec {
    ExactMatch { value: String },
    Regex { value: String },
    ComplexityCheck { value: String },
}

#[derive(Deserialize, Clone)]
struct CheckSpec {
    target: Target,
    #[serde(default)]
    exists: bool,
    #[serde(default)]
    check: Option<CheckKind>,
    #[serde(default)]
    value: Option<bool>,
}

#[derive(Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
enum Target {
    Prev,
    Next,
    Current,
    Context,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum CheckKind {
    IsSeparator,
    IsIsolated,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum Action {
    MergeNext,
    MergePrev,
    Keep,
}

enum Trigger {
    Exact(String),
    Pattern(Regex),
    InvalidSingle,
}

impl Trigger {
    fn matches(&self, seg: &str, dict: &Dictionary) -> bool {
        match self {
            Trigger::Exact(v) => seg == v,
            Trigger::Pattern(re) => re.is_match(seg),
            Trigger::InvalidSingle => dict.is_invalid_single(seg),
        }
    }
}

struct Rule {
    priority: i64,
    trigger: Trigger,
    checks: Vec<CheckSpec>,
    action: Action,
}

pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Parse and compile a JSON rule table. Individual malformed rules are
    /// warned about and dropped; a table that is not valid JSON is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)?;
        let mut rules = Vec::with_capacity(specs.len());

        for (idx, spec) in specs.into_iter().enumerate() {
            match compile(spec) {
                Ok(rule) => rules.push(rule),
                Err(reason) => eprintln!("Skipping rule #{idx}: {reason}"),
            }
        }

        rules.sort_by_key(|r| Reverse(r.priority));
        Ok(RuleEngine { rules })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the table over a segment list. `merge_next` leaves the index in
    /// place so the merged token is reprocessed; `merge_prev` steps back
    /// one; `keep` pins the token and advances. Every merge shrinks the
    /// list and everything else advances, so this terminates.
    pub fn apply(&self, mut segments: Vec<String>, dict: &Dictionary) -> Vec<String> {
        let mut i = 0;
        while i < segments.len() {
            let mut fired = false;

            for rule in &self.rules {
                if !rule.trigger.matches(&segments[i], dict) {
                    continue;
                }
                if !checks_pass(&rule.checks, &segments, i) {
                    continue;
                }

                match rule.action {
                    Action::MergeNext => {
                        if i + 1 < segments.len() {
                            let next = segments.remove(i + 1);
                            segments[i].push_str(&next);
                            fired = true;
                            break;
                        }
                    }
                    Action::MergePrev => {
                        if i > 0 {
                            let curr = segments.remove(i);
                            segments[i - 1].push_str(&curr);
                            i -= 1;
                            fired = true;
                            break;
                        }
                    }
                    Action::Keep => {
                        i += 1;
                        fired = true;
                        break;
                    }
                }
            }

            if !fired {
                i += 1;
            }
        }
        segments
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::from_json(DEFAULT_RULES).expect("built-in rule table must parse")
    }
}

fn compile(spec: RuleSpec) -> std::result::Result<Rule, String> {
    let trigger = match spec.trigger {
        TriggerSpec::ExactMatch { value } => Trigger::Exact(value),
        TriggerSpec::Regex { value } => Trigger::Pattern(
            Regex::new(&value).map_err(|e| format!("bad pattern {value:?}: {e}"))?,
        ),
        TriggerSpec::ComplexityCheck { value } => match value.as_str() {
            "is_invalid_single" => Trigger::InvalidSingle,
            other => return Err(format!("unknown complexity check {other:?}")),
        },
    };

    Ok(Rule {
        priority: spec.priority,
        trigger,
        checks: spec.checks,
        action: spec.action,
    })
}

fn checks_pass(checks: &[CheckSpec], segments: &[String], i: usize) -> bool {
    for check in checks {
        let target: Option<&str> = match check.target {
            Target::Prev => (i > 0).then(|| segments[i - 1].as_str()),
            Target::Next => segments.get(i + 1).map(|s| s.as_str()),
            Target::Current | Target::Context => Some(segments[i].as_str()),
        };

        let Some(target) = target else {
            // An absent neighbour fails the check when it is required to
            // exist or when a value check needs it.
            if check.exists || check.check.is_some() {
                return false;
            }
            continue;
        };

        if let Some(kind) = check.check {
            let expected = check.value.unwrap_or(true);
            let actual = match kind {
                CheckKind::IsSeparator => seg_is_separator(target),
                CheckKind::IsIsolated => {
                    let prev_sep = i == 0 || seg_is_separator(&segments[i - 1]);
                    let next_sep =
                        i + 1 >= segments.len() || seg_is_separator(&segments[i + 1]);
                    prev_sep && next_sep
                }
            };
            if actual != expected {
                return false;
            }
        }
    }
    true
}

/// A segment counts as a separator only when it is a single separator
/// code point.
fn seg_is_separator(seg: &str) -> bool {
    let mut chars = seg.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_separator(c))
}

/// Final pass: run the rule-engine output left to right, pooling
/// consecutive unknown tokens and flushing the pool as one token whenever
/// a known token (or the end of the line) is reached.
pub fn collapse_unknowns(segments: Vec<String>, dict: &Dictionary) -> Vec<String> {
    let mut out = Vec::with_capacity(segments.len());
    let mut buffer: Vec<String> = Vec::new();

    for seg in segments {
        if is_known(&seg, dict) {
            if !buffer.is_empty() {
                out.push(buffer.concat());
                buffer.clear();
            }
            out.push(seg);
        } else {
            buffer.push(seg);
        }
    }

    if !buffer.is_empty() {
        out.push(buffer.concat());
    }
    out
}

fn is_known(seg: &str, dict: &Dictionary) -> bool {
    let mut chars = seg.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    let single = chars.next().is_none();

    if is_digit(first) {
        return true;
    }
    if dict.contains(seg) {
        return true;
    }
    if single && (is_valid_single_word(first) || is_separator(first)) {
        return true;
    }
    // Acronyms and other dotted tokens produced upstream stay intact.
    !single && seg.contains('.')
}
