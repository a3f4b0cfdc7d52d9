//! Error types for the boundary around the rewriting engine
//!
//! The engine itself never fails. These errors come from validating user
//! input before it reaches the engine.

use thiserror::Error;

/// A problem with one line of rule text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("line {line}: expected 'predecessor => successor'")]
    MissingArrow { line: usize },

    #[error("line {line}: empty predecessor")]
    EmptyPredecessor { line: usize },

    #[error("line {line}: unsupported conditional '({text})', expected name>value or name=value")]
    InvalidConditional { line: usize, text: String },

    #[error("line {line}: unsupported attribute arithmetic '({text})', expected name=value or name+value")]
    InvalidArithmetic { line: usize, text: String },
}

impl RuleError {
    /// 1-based line the error was found on
    pub fn line(&self) -> usize {
        match self {
            RuleError::MissingArrow { line }
            | RuleError::EmptyPredecessor { line }
            | RuleError::InvalidConditional { line, .. }
            | RuleError::InvalidArithmetic { line, .. } => *line,
        }
    }
}

/// Rejected edits when applying a draft configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("step count {requested} is out of range (max {max})")]
    StepCountOutOfRange { requested: usize, max: usize },

    #[error("angle must be a finite number, got {0}")]
    InvalidAngle(f64),

    #[error("invalid rules: {0}")]
    Rules(#[from] RuleError),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
