//! Line normalization applied before segmentation: merge split composite
//! vowels, reorder modifiers inside each orthographic cluster into
//! canonical order, and strip zero-width characters. The output never has
//! more code points than the input, and normalizing twice is a no-op.

use crate::constants::*;

const COMPOSITE_E_I: &str = "\u{17C1}\u{17B8}";
const COMPOSITE_OE: &str = "\u{17BE}";
const COMPOSITE_E_AA: &str = "\u{17C1}\u{17B6}";
const COMPOSITE_AU: &str = "\u{17C4}";

/// One element of a cluster: either a lone code point or a COENG-led
/// subscript unit that moves as a pair.
#[derive(Clone, Copy)]
enum Part {
    Ch(char),
    Sub(char),
}

impl Part {
    fn render_into(self, out: &mut String) {
        match self {
            Part::Ch(c) => out.push(c),
            Part::Sub(c) => {
                out.push(COENG);
                out.push(c);
            }
        }
    }

    // Modifier ordering inside a cluster: subscripts first with Ro last
    // among them, then dependent vowels, then signs.
    fn sort_key(self) -> u8 {
        match self {
            Part::Sub(c) if c == RO => 4,
            Part::Sub(_) => 2,
            Part::Ch(c) if is_dependent_vowel(c) => 6,
            Part::Ch(c) if is_sign(c) => 8,
            Part::Ch(_) => 10,
        }
    }
}

/// Normalize a line of Khmer text. Composite-vowel merge, cluster
/// reorder, zero-width removal, in that order.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Textual pre-merge so split vowels form single units before clusters
    // are measured.
    let text = text
        .replace(COMPOSITE_E_I, COMPOSITE_OE)
        .replace(COMPOSITE_E_AA, COMPOSITE_AU);

    let cps: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut cluster: Vec<Part> = Vec::new();

    let mut i = 0;
    while i < cps.len() {
        let c = cps[i];

        if is_consonant(c) || is_independent_vowel(c) {
            // A base opens a new cluster and flushes the previous one.
            flush_cluster(&mut out, &mut cluster);
            cluster.push(Part::Ch(c));
            i += 1;
        } else if is_coeng(c) {
            // Same boundaries cluster_len draws: a subscript unit forms
            // only inside an open cluster and only over a base consonant.
            if !cluster.is_empty() && i + 1 < cps.len() && is_consonant(cps[i + 1]) {
                cluster.push(Part::Sub(cps[i + 1]));
                i += 2;
            } else {
                // Stray or trailing COENG is its own unit, never a
                // modifier of the cluster before it.
                flush_cluster(&mut out, &mut cluster);
                out.push(c);
                i += 1;
            }
        } else if is_dependent_vowel(c) || is_sign(c) {
            if cluster.is_empty() {
                // No base to attach to; emit verbatim.
                out.push(c);
            } else {
                cluster.push(Part::Ch(c));
            }
            i += 1;
        } else {
            flush_cluster(&mut out, &mut cluster);
            out.push(c);
            i += 1;
        }
    }
    flush_cluster(&mut out, &mut cluster);

    out.retain(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}'));
    out
}

fn flush_cluster(out: &mut String, cluster: &mut Vec<Part>) {
    let Some((&head, modifiers)) = cluster.split_first() else {
        return;
    };

    let mut rendered = String::new();
    head.render_into(&mut rendered);

    let mut mods: Vec<Part> = modifiers.to_vec();
    mods.sort_by_key(|p| p.sort_key());
    for p in mods {
        p.render_into(&mut rendered);
    }

    // Reordering can pull a subscript out from between two vowels, leaving
    // a split composite adjacent again; merge it so a second normalize
    // pass is a fixed point.
    if rendered.contains('\u{17C1}') {
        rendered = rendered
            .replace(COMPOSITE_E_I, COMPOSITE_OE)
            .replace(COMPOSITE_E_AA, COMPOSITE_AU);
    }

    out.push_str(&rendered);
    cluster.clear();
}
