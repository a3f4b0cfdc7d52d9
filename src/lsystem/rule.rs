//! Rewrite rules and their line-oriented text form
//!
//! Rule text is one rule per line: `predecessor => successor`. Either side may
//! carry a bracketed suffix, a conditional on the predecessor and attribute
//! arithmetic on the successor:
//!
//! ```text
//! F => F[+F]F[-F]F
//! F(i>0) => F(i+0.1)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::attribute::{Arithmetic, Conditional};
use super::brackets::extract_brackets;
use crate::error::RuleError;

/// Separator between predecessor and successor in rule text
pub const ARROW: &str = "=>";

/// A compiled rewrite rule
///
/// The bracket text of both sides is kept raw and only interpreted when a
/// match is found. Both sides are also kept as written, so formatting a rule
/// gives back the exact text it was built from. Rules are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rule {
    written_predecessor: String,
    written_successor: String,
    predecessor: String,
    conditional: String,
    successor: String,
    attribute_arithmetic: String,
}

impl Rule {
    /// Build a rule from raw predecessor and successor text, brackets included
    pub fn new(predecessor: &str, successor: &str) -> Self {
        let written_predecessor = predecessor.to_string();
        let written_successor = successor.to_string();
        let predecessor = extract_brackets(predecessor);
        let successor = extract_brackets(successor);

        Self {
            written_predecessor,
            written_successor,
            predecessor: predecessor.stripped,
            conditional: predecessor.contents,
            successor: successor.stripped,
            attribute_arithmetic: successor.contents,
        }
    }

    pub fn predecessor(&self) -> &str {
        &self.predecessor
    }

    pub fn conditional(&self) -> &str {
        &self.conditional
    }

    pub fn successor(&self) -> &str {
        &self.successor
    }

    pub fn attribute_arithmetic(&self) -> &str {
        &self.attribute_arithmetic
    }

    /// Parse a single `predecessor => successor` line
    ///
    /// `line` is the 1-based line number reported in errors.
    pub fn parse_line(text: &str, line: usize) -> Result<Self, RuleError> {
        let (predecessor, successor) = text
            .split_once(ARROW)
            .ok_or(RuleError::MissingArrow { line })?;

        let rule = Rule::new(predecessor.trim(), successor.trim());
        rule.validate(line)?;
        Ok(rule)
    }

    /// Check that the rule can ever fire and that its bracket text is understood
    pub fn validate(&self, line: usize) -> Result<(), RuleError> {
        if self.predecessor.is_empty() {
            return Err(RuleError::EmptyPredecessor { line });
        }

        if !self.conditional.is_empty() && Conditional::parse(&self.conditional).is_none() {
            return Err(RuleError::InvalidConditional {
                line,
                text: self.conditional.clone(),
            });
        }

        if !self.attribute_arithmetic.is_empty()
            && Arithmetic::parse(&self.attribute_arithmetic).is_none()
        {
            return Err(RuleError::InvalidArithmetic {
                line,
                text: self.attribute_arithmetic.clone(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.written_predecessor, ARROW, self.written_successor
        )
    }
}

impl TryFrom<String> for Rule {
    type Error = RuleError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Rule::parse_line(&text, 1)
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

/// Parse rule text, one rule per non-blank line
///
/// Stops at the first bad line.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, RuleError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| Rule::parse_line(line, i + 1))
        .collect()
}

/// Render rules back to text, one per line
pub fn format_rules(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(Rule::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
