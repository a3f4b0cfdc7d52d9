//! Single-parameter attributes, rule conditionals and attribute arithmetic
//!
//! A symbol carries at most one attribute, written `F(name=value)`. A rule can
//! guard on it with `name>threshold` or `name=threshold` and can rewrite it
//! with `name=value` (assign) or `name+value` (increment). Anything that does
//! not parse degrades to "no effect" instead of failing.

use std::fmt;

use super::rule::Rule;

/// A parsed `name=value` attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: f64,
}

impl Attribute {
    pub fn parse(text: &str) -> Option<Self> {
        let (name, value) = split_operands(text, '=')?;
        Some(Self {
            name: name.to_string(),
            value: parse_number(value)?,
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0 prints as 0
        let value = if self.value == 0.0 { 0.0 } else { self.value };
        write!(f, "{}={}", self.name, value)
    }
}

/// Comparison operators a conditional can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Equal,
}

/// A rule guard such as `i>0` or `i=0.1`
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub name: String,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl Conditional {
    /// `>` is tried before `=`
    pub fn parse(text: &str) -> Option<Self> {
        let (comparison, (name, threshold)) = match split_operands(text, '>') {
            Some(operands) => (Comparison::Greater, operands),
            None => (Comparison::Equal, split_operands(text, '=')?),
        };

        Some(Self {
            name: name.to_string(),
            comparison,
            threshold: parse_number(threshold)?,
        })
    }

    pub fn accepts(&self, attribute: &Attribute) -> bool {
        if attribute.name != self.name {
            return false;
        }

        match self.comparison {
            Comparison::Greater => attribute.value > self.threshold,
            // Exact float equality: `i=0.3` never matches a value built as 0.1 + 0.2
            Comparison::Equal => attribute.value == self.threshold,
        }
    }
}

/// Operators attribute arithmetic can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Assign,
    Increment,
}

/// An attribute update such as `i=0.2` or `i+0.1`
#[derive(Debug, Clone, PartialEq)]
pub struct Arithmetic {
    pub name: String,
    pub op: ArithmeticOp,
    pub operand: f64,
}

impl Arithmetic {
    /// `=` is tried before `+`
    pub fn parse(text: &str) -> Option<Self> {
        let (op, (name, operand)) = match split_operands(text, '=') {
            Some(operands) => (ArithmeticOp::Assign, operands),
            None => (ArithmeticOp::Increment, split_operands(text, '+')?),
        };

        Some(Self {
            name: name.to_string(),
            op,
            operand: parse_number(operand)?,
        })
    }

    pub fn apply(&self, current: f64) -> f64 {
        match self.op {
            ArithmeticOp::Assign => self.operand,
            ArithmeticOp::Increment => current + self.operand,
        }
    }
}

/// Whether a rule guarded by `conditional` may fire on a symbol carrying `attribute`
///
/// An empty conditional always matches. Malformed text on either side never does.
pub fn matches_conditional(attribute: &str, conditional: &str) -> bool {
    if conditional.is_empty() {
        return true;
    }

    match (Attribute::parse(attribute), Conditional::parse(conditional)) {
        (Some(attribute), Some(conditional)) => conditional.accepts(&attribute),
        _ => false,
    }
}

/// The `name=value` text to attach to the successor of `rule`
///
/// The name comes from the rule's arithmetic, not from the incoming attribute.
/// When either side does not parse the attribute passes through untouched.
pub fn apply_arithmetic(attribute: &str, rule: &Rule) -> String {
    let arithmetic = rule.attribute_arithmetic();
    if arithmetic.is_empty() {
        return attribute.to_string();
    }

    let (arithmetic, current) = match (Arithmetic::parse(arithmetic), Attribute::parse(attribute)) {
        (Some(arithmetic), Some(current)) => (arithmetic, current),
        _ => return attribute.to_string(),
    };

    Attribute {
        value: arithmetic.apply(current.value),
        name: arithmetic.name,
    }
    .to_string()
}

/// First two pieces of `text` split on `op`, trimmed
///
/// Pieces past the second are ignored, so `a=1=2` reads as `a` and `1`.
fn split_operands(text: &str, op: char) -> Option<(&str, &str)> {
    let mut parts = text.split(op);
    let lhs = parts.next()?;
    let rhs = parts.next()?;
    Some((lhs.trim(), rhs.trim()))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conditional_always_matches() {
        assert!(matches_conditional("", ""));
        assert!(matches_conditional("garbage", ""));
    }

    #[test]
    fn test_greater_conditional() {
        assert!(matches_conditional("i=0.1", "i>0"));
        assert!(!matches_conditional("i=0", "i>0"));
        assert!(!matches_conditional("i=-1", "i > 0"));
    }

    #[test]
    fn test_equal_conditional() {
        assert!(matches_conditional("i=0.1", "i=0.1"));
        assert!(!matches_conditional("i=0.2", "i=0.1"));
        // Exact comparison, no epsilon
        let sum = format!("i={}", 0.1 + 0.2);
        assert!(!matches_conditional(&sum, "i=0.3"));
    }

    #[test]
    fn test_conditional_name_mismatch() {
        assert!(!matches_conditional("j=5", "i>0"));
    }

    #[test]
    fn test_conditional_malformed() {
        assert!(!matches_conditional("i", "i>0"));
        assert!(!matches_conditional("i=abc", "i>0"));
        assert!(!matches_conditional("i=1", "i<0"));
        assert!(!matches_conditional("i=1", "i>zero"));
    }

    #[test]
    fn test_parse_conditional_operator_order() {
        let c = Conditional::parse("i>0").unwrap();
        assert_eq!(c.comparison, Comparison::Greater);
        assert_eq!(c.name, "i");

        let c = Conditional::parse("i=2").unwrap();
        assert_eq!(c.comparison, Comparison::Equal);
        assert_eq!(c.threshold, 2.0);
    }

    #[test]
    fn test_parse_arithmetic() {
        let a = Arithmetic::parse("i+0.1").unwrap();
        assert_eq!(a.op, ArithmeticOp::Increment);
        assert_eq!(a.operand, 0.1);

        let a = Arithmetic::parse("i=3").unwrap();
        assert_eq!(a.op, ArithmeticOp::Assign);
        assert_eq!(a.apply(100.0), 3.0);

        assert!(Arithmetic::parse("i*2").is_none());
        assert!(Arithmetic::parse("i+x").is_none());
    }

    #[test]
    fn test_apply_assign() {
        let rule = Rule::new("F(i=0.1)", "F(i=0.2)");
        assert_eq!(apply_arithmetic("i=0.1", &rule), "i=0.2");
    }

    #[test]
    fn test_apply_increment() {
        let rule = Rule::new("F(i>0)", "F(i+0.1)");
        assert_eq!(apply_arithmetic("i=0.1", &rule), "i=0.2");

        let rule = Rule::new("A", "A(t+1)");
        assert_eq!(apply_arithmetic("t=1", &rule), "t=2");
    }

    #[test]
    fn test_apply_uses_rule_name() {
        let rule = Rule::new("F", "F(k=7)");
        assert_eq!(apply_arithmetic("i=1", &rule), "k=7");
    }

    #[test]
    fn test_negative_zero_prints_as_zero() {
        let rule = Rule::new("F", "F(i+1)");
        assert_eq!(apply_arithmetic("i=-1", &rule), "i=0");

        let rule = Rule::new("F", "F(i=-0)");
        assert_eq!(apply_arithmetic("i=5", &rule), "i=0");
    }

    #[test]
    fn test_apply_passthrough() {
        let rule = Rule::new("F", "G");
        assert_eq!(apply_arithmetic("i=1", &rule), "i=1");

        let rule = Rule::new("F", "F(i*2)");
        assert_eq!(apply_arithmetic("i=1", &rule), "i=1");

        let rule = Rule::new("F", "F(i+1)");
        assert_eq!(apply_arithmetic("broken", &rule), "broken");
    }
}
