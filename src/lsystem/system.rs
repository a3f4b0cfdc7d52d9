//! L-system state and incremental reconciliation
//!
//! An [`LSystem`] owns every generation computed so far. When a new
//! configuration arrives, only a change of step count is handled
//! incrementally; any change to the axiom, rules or angle rebuilds the history
//! from the axiom.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine;
use super::rule::Rule;

pub const DEFAULT_AXIOM: &str = "F";
pub const DEFAULT_PREDECESSOR: &str = "F";
pub const DEFAULT_SUCCESSOR: &str = "F[+F]F[-F]F[/F]F[*F]";
pub const DEFAULT_ANGLE: f64 = 15.0;
pub const DEFAULT_STEP_COUNT: usize = 3;

/// A complete configuration: what the user edits and applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LSystemState {
    pub axiom: String,
    pub rules: Vec<Rule>,
    /// Turn angle in degrees
    pub angle: f64,
    pub step_count: usize,
}

impl Default for LSystemState {
    fn default() -> Self {
        Self {
            axiom: DEFAULT_AXIOM.to_string(),
            rules: vec![Rule::new(DEFAULT_PREDECESSOR, DEFAULT_SUCCESSOR)],
            angle: DEFAULT_ANGLE,
            step_count: DEFAULT_STEP_COUNT,
        }
    }
}

/// What [`LSystem::set_state`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    Extended { from: usize, to: usize },
    Truncated { from: usize, to: usize },
    Rebuilt { step_count: usize },
}

/// An L-system with its full generation history
///
/// `results()[0]` is always the axiom and `results()[i]` the string after
/// `i` rewrite steps.
#[derive(Debug, Clone)]
pub struct LSystem {
    axiom: String,
    rules: Vec<Rule>,
    angle: f64,
    results: Vec<String>,
}

impl LSystem {
    /// A system at generation 0
    pub fn new(axiom: &str, rules: Vec<Rule>, angle: f64) -> Self {
        Self {
            axiom: axiom.to_string(),
            rules,
            angle,
            results: vec![axiom.to_string()],
        }
    }

    pub fn from_state(state: LSystemState) -> Self {
        let mut system = Self::new(&state.axiom, state.rules, state.angle);
        for _ in 0..state.step_count {
            system.advance();
        }
        system
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// The latest generation
    pub fn result(&self) -> &str {
        self.results.last().map(String::as_str).unwrap_or(&self.axiom)
    }

    pub fn step_count(&self) -> usize {
        self.results.len().saturating_sub(1)
    }

    pub fn generation(&self, index: usize) -> Option<&str> {
        self.results.get(index).map(String::as_str)
    }

    /// Snapshot of the current configuration
    pub fn state(&self) -> LSystemState {
        LSystemState {
            axiom: self.axiom.clone(),
            rules: self.rules.clone(),
            angle: self.angle,
            step_count: self.step_count(),
        }
    }

    /// Compute one more generation from the latest one
    pub fn advance(&mut self) {
        let next = engine::step(self.result(), &self.rules);
        self.results.push(next);
    }

    /// Bring the system in line with `state`
    ///
    /// Axiom, rules and angle are always taken from `state`. History is reused
    /// when none of them changed.
    pub fn set_state(&mut self, state: LSystemState) -> Reconciliation {
        let LSystemState {
            axiom,
            rules,
            angle,
            step_count,
        } = state;

        let recompute = self.angle != angle || self.axiom != axiom || self.rules != rules;
        self.angle = angle;
        self.axiom = axiom;
        self.rules = rules;

        let current = self.step_count();
        let outcome = if recompute {
            self.results.clear();
            self.results.push(self.axiom.clone());
            for _ in 0..step_count {
                self.advance();
            }
            Reconciliation::Rebuilt { step_count }
        } else if step_count > current {
            for _ in current..step_count {
                self.advance();
            }
            Reconciliation::Extended {
                from: current,
                to: step_count,
            }
        } else if step_count < current {
            self.results.truncate(step_count + 1);
            Reconciliation::Truncated {
                from: current,
                to: step_count,
            }
        } else {
            Reconciliation::Unchanged
        };

        debug!(
            ?outcome,
            result_len = self.result().len(),
            "L-system reconciled"
        );
        outcome
    }
}

impl Default for LSystem {
    fn default() -> Self {
        Self::from_state(LSystemState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(axiom: &str, rules: &[(&str, &str)], angle: f64, step_count: usize) -> LSystemState {
        LSystemState {
            axiom: axiom.to_string(),
            rules: rules.iter().map(|(p, s)| Rule::new(p, s)).collect(),
            angle,
            step_count,
        }
    }

    fn assert_consistent(system: &LSystem, step_count: usize) {
        assert_eq!(system.results().len(), step_count + 1);
        assert_eq!(system.results()[0], system.axiom());
        assert_eq!(system.step_count(), step_count);
    }

    #[test]
    fn test_default_system() {
        let system = LSystem::default();
        assert_eq!(system.axiom(), "F");
        assert_eq!(system.rules().len(), 1);
        assert_eq!(system.angle(), 15.0);
        assert_consistent(&system, 3);
        assert_eq!(system.generation(1), Some("F[+F]F[-F]F[/F]F[*F]"));
    }

    #[test]
    fn test_new_is_generation_zero() {
        let system = LSystem::new("ab", vec![], 30.0);
        assert_consistent(&system, 0);
        assert_eq!(system.result(), "ab");
    }

    #[test]
    fn test_advance_pushes_generation() {
        let mut system = LSystem::new("Y", vec![Rule::new("Y", "XYX")], 0.0);
        system.advance();
        system.advance();
        assert_eq!(system.results(), ["Y", "XYX", "XXYXX"]);
    }

    #[test]
    fn test_shrink_truncates_history() {
        let mut system = LSystem::from_state(state("Y", &[("Y", "XYX")], 20.0, 5));
        let before = system.results().to_vec();

        let outcome = system.set_state(state("Y", &[("Y", "XYX")], 20.0, 2));
        assert_eq!(outcome, Reconciliation::Truncated { from: 5, to: 2 });
        assert_consistent(&system, 2);
        assert_eq!(system.results(), &before[..3]);
        assert_eq!(system.result(), "XXYXX");
    }

    #[test]
    fn test_grow_extends_history() {
        let mut system = LSystem::from_state(state("B", &[("A", "AB"), ("B", "A")], 20.0, 2));
        let outcome = system.set_state(state("B", &[("A", "AB"), ("B", "A")], 20.0, 5));

        assert_eq!(outcome, Reconciliation::Extended { from: 2, to: 5 });
        assert_consistent(&system, 5);
        assert_eq!(system.result(), "ABAABABA");
    }

    #[test]
    fn test_same_state_is_unchanged() {
        let mut system = LSystem::default();
        let outcome = system.set_state(system.state());
        assert_eq!(outcome, Reconciliation::Unchanged);
        assert_consistent(&system, 3);
    }

    #[test]
    fn test_axiom_change_rebuilds() {
        let mut system = LSystem::from_state(state("a", &[("a", "aB")], 0.0, 3));
        let outcome = system.set_state(state("aa", &[("a", "aB")], 0.0, 1));

        assert_eq!(outcome, Reconciliation::Rebuilt { step_count: 1 });
        assert_consistent(&system, 1);
        assert_eq!(system.results(), ["aa", "aBaB"]);
    }

    #[test]
    fn test_rule_change_rebuilds() {
        let mut system = LSystem::from_state(state("a", &[("a", "aB")], 0.0, 2));
        let outcome = system.set_state(state("a", &[("a", "aC")], 0.0, 2));

        assert_eq!(outcome, Reconciliation::Rebuilt { step_count: 2 });
        assert_eq!(system.results(), ["a", "aC", "aCC"]);
    }

    #[test]
    fn test_rule_count_change_rebuilds() {
        let mut system = LSystem::from_state(state("a", &[("a", "aB")], 0.0, 1));
        let outcome = system.set_state(state("a", &[("a", "aB"), ("B", "C")], 0.0, 1));

        assert_eq!(outcome, Reconciliation::Rebuilt { step_count: 1 });
        assert_eq!(system.rules().len(), 2);
    }

    #[test]
    fn test_angle_change_rebuilds() {
        let mut system = LSystem::default();
        let mut next = system.state();
        next.angle = 25.0;

        let outcome = system.set_state(next);
        assert_eq!(outcome, Reconciliation::Rebuilt { step_count: 3 });
        assert_eq!(system.angle(), 25.0);
        assert_consistent(&system, 3);
    }

    #[test]
    fn test_rebuild_to_zero_steps() {
        let mut system = LSystem::default();
        system.set_state(state("X", &[("X", "F")], 15.0, 0));
        assert_consistent(&system, 0);
        assert_eq!(system.result(), "X");
    }

    #[test]
    fn test_state_serializes_rules_as_text() {
        let saved = state("F", &[("F(i>0)", "F(i+1)")], 22.5, 4);
        let yaml = serde_yaml::to_string(&saved).unwrap();
        assert!(yaml.contains("F(i>0) => F(i+1)"));

        let back: LSystemState = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, saved);
    }
}
