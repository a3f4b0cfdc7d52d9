//! One generation of parallel rewriting
//!
//! Rules run in order over the same generation. Each rule scans the output of
//! the rule before it, but spans that were already rewritten during this
//! generation are masked: no rule sees them again until the next step. The
//! working string is kept as a list of spans, either untouched ranges of the
//! source or replacement text, so nothing is spliced in place.

use std::ops::Range;

use super::attribute::{apply_arithmetic, matches_conditional};
use super::brackets::extract_brackets;
use super::rule::Rule;

/// A piece of the generation being built
#[derive(Debug, Clone, PartialEq)]
enum Span {
    /// Not yet rewritten, still visible to later rules
    Source(Range<usize>),
    /// Produced this generation, masked from further matching
    Rewritten(String),
}

/// Apply every rule once to `current` and return the next generation
///
/// Whitespace is stripped from the result.
pub fn step(current: &str, rules: &[Rule]) -> String {
    let mut spans = vec![Span::Source(0..current.len())];

    for rule in rules {
        if rule.predecessor().is_empty() {
            continue;
        }
        spans = apply_rule(current, spans, rule);
    }

    let mut next = String::with_capacity(current.len());
    for span in &spans {
        let text = match span {
            Span::Source(range) => &current[range.clone()],
            Span::Rewritten(text) => text.as_str(),
        };
        next.extend(text.chars().filter(|c| !c.is_whitespace()));
    }
    next
}

/// Run one rule over every unmasked span
fn apply_rule(source: &str, spans: Vec<Span>, rule: &Rule) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::Source(range) => rewrite_range(source, range, rule, &mut out),
            rewritten => out.push(rewritten),
        }
    }
    out
}

/// Scan one source range left to right, replacing accepted matches
fn rewrite_range(source: &str, range: Range<usize>, rule: &Rule, out: &mut Vec<Span>) {
    let text = &source[range.clone()];
    let predecessor = rule.predecessor();

    // `cursor` only moves forward; `copied` is where the next untouched span starts
    let mut cursor = 0;
    let mut copied = 0;

    while cursor < text.len() {
        let start = match text[cursor..].find(predecessor) {
            Some(offset) => cursor + offset,
            None => break,
        };

        let matched = match_at(text, start, rule);
        if let Some(replacement) = matched.replacement {
            if copied < start {
                out.push(Span::Source(range.start + copied..range.start + start));
            }
            out.push(Span::Rewritten(replacement));
            copied = start + matched.len;
        }
        cursor = start + matched.len;
    }

    if copied < text.len() {
        out.push(Span::Source(range.start + copied..range.end));
    }
}

struct Match {
    /// Bytes consumed from the scanned text, attribute token included
    len: usize,
    /// `None` when the match was rejected
    replacement: Option<String>,
}

/// Decide what to do with a predecessor found at `start`
fn match_at(text: &str, start: usize, rule: &Rule) -> Match {
    let predecessor_end = start + rule.predecessor().len();

    if !text[predecessor_end..].starts_with('(') {
        return Match {
            len: rule.predecessor().len(),
            replacement: Some(rule.successor().to_string()),
        };
    }

    let close = match text[predecessor_end..].find(')') {
        Some(offset) => predecessor_end + offset,
        None => {
            return Match {
                len: rule.predecessor().len(),
                replacement: None,
            }
        }
    };

    let token = &text[start..=close];
    let attribute = extract_brackets(token).contents;
    let len = token.len();

    if !matches_conditional(&attribute, rule.conditional()) {
        return Match {
            len,
            replacement: None,
        };
    }

    let replacement = if rule.attribute_arithmetic().is_empty() {
        rule.successor().to_string()
    } else {
        format!("{}({})", rule.successor(), apply_arithmetic(&attribute, rule))
    };

    Match {
        len,
        replacement: Some(replacement),
    }
}
