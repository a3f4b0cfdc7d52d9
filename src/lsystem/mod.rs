//! Parametric L-system rewriting
//!
//! - brackets: `X(expr)` splitting and whitespace helpers
//! - attribute: conditionals and attribute arithmetic
//! - rule: compiled rules and rule text
//! - engine: one generation step
//! - system: generation history and reconciliation

pub mod attribute;
pub mod brackets;
pub mod engine;
pub mod rule;
pub mod system;

pub use attribute::{apply_arithmetic, matches_conditional};
pub use brackets::{extract_brackets, pad, spaces, Brackets};
pub use engine::step;
pub use rule::{format_rules, parse_rules, Rule};
pub use system::{LSystem, LSystemState, Reconciliation};
