//! Editing Session - Single Source of Truth (SSOT)
//!
//! Holds the L-system being shown and the draft the user is editing. Edits
//! only touch the draft until `apply` validates it and reconciles the system.

use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_MAX_STEP_COUNT};
use crate::error::SessionError;
use crate::lsystem::{format_rules, parse_rules, LSystem, LSystemState, Reconciliation};
use crate::turtle::{interpret, Geometry, TurtleConfig};

/// Unvalidated configuration as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub axiom: String,
    pub rules_text: String,
    pub angle: f64,
    pub step_count: usize,
}

impl From<&LSystemState> for Draft {
    fn from(state: &LSystemState) -> Self {
        Self {
            axiom: state.axiom.clone(),
            rules_text: format_rules(&state.rules),
            angle: state.angle,
            step_count: state.step_count,
        }
    }
}

/// One user's L-system and pending edits
#[derive(Debug, Clone)]
pub struct Session {
    system: LSystem,
    draft: Draft,
    max_step_count: usize,
    turtle: TurtleConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_max_step_count(DEFAULT_MAX_STEP_COUNT)
    }
}

impl Session {
    /// Start from the default system
    pub fn with_max_step_count(max_step_count: usize) -> Self {
        let system = LSystem::default();
        let draft = Draft::from(&system.state());
        Self {
            system,
            draft,
            max_step_count,
            turtle: TurtleConfig::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_max_step_count(config.max_step_count)
    }

    pub fn with_turtle(mut self, turtle: TurtleConfig) -> Self {
        self.turtle = turtle;
        self
    }

    pub fn system(&self) -> &LSystem {
        &self.system
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn max_step_count(&self) -> usize {
        self.max_step_count
    }

    pub fn set_axiom(&mut self, axiom: &str) {
        self.draft.axiom = axiom.to_string();
    }

    pub fn set_rules_text(&mut self, rules_text: &str) {
        self.draft.rules_text = rules_text.to_string();
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.draft.angle = angle;
    }

    pub fn set_step_count(&mut self, step_count: usize) {
        self.draft.step_count = step_count;
    }

    /// Throw away pending edits
    pub fn revert(&mut self) {
        self.draft = Draft::from(&self.system.state());
    }

    /// Validate the draft without applying it
    pub fn validate(&self) -> Result<LSystemState, SessionError> {
        let state = LSystemState {
            axiom: self.draft.axiom.clone(),
            rules: parse_rules(&self.draft.rules_text)?,
            angle: self.draft.angle,
            step_count: self.draft.step_count,
        };
        self.check(&state)?;
        Ok(state)
    }

    /// Limits that hold no matter where a configuration came from
    fn check(&self, state: &LSystemState) -> Result<(), SessionError> {
        if state.step_count > self.max_step_count {
            return Err(SessionError::StepCountOutOfRange {
                requested: state.step_count,
                max: self.max_step_count,
            });
        }

        if !state.angle.is_finite() {
            return Err(SessionError::InvalidAngle(state.angle));
        }

        for (i, rule) in state.rules.iter().enumerate() {
            rule.validate(i + 1)?;
        }
        Ok(())
    }

    /// Validate the draft and bring the system in line with it
    ///
    /// A rejected draft leaves the system untouched.
    pub fn apply(&mut self) -> Result<Reconciliation, SessionError> {
        let state = match self.validate() {
            Ok(state) => state,
            Err(e) => {
                warn!("Draft rejected: {}", e);
                return Err(e);
            }
        };
        Ok(self.reconcile(state))
    }

    /// Replace the draft with `state` and apply it
    ///
    /// The rules are applied as given, not re-read from the draft text.
    pub fn load(&mut self, state: &LSystemState) -> Result<Reconciliation, SessionError> {
        debug!(axiom = %state.axiom, rules = state.rules.len(), "Loading configuration");
        self.draft = Draft::from(state);
        if let Err(e) = self.check(state) {
            warn!("Configuration rejected: {}", e);
            return Err(e);
        }
        Ok(self.reconcile(state.clone()))
    }

    fn reconcile(&mut self, state: LSystemState) -> Reconciliation {
        let outcome = self.system.set_state(state);
        info!(
            ?outcome,
            step_count = self.system.step_count(),
            length = self.system.result().len(),
            "Applied configuration"
        );
        outcome
    }

    /// Load a preset by name, user presets first
    pub fn load_preset(&mut self, config: &Config, name: &str) -> Result<Reconciliation, SessionError> {
        let state = config
            .resolve(name)
            .ok_or_else(|| SessionError::UnknownPreset(name.to_string()))??;
        self.load(&state)
    }

    /// Apply a sequence of configurations in order, as a user editing and
    /// submitting repeatedly would
    pub fn replay(&mut self, states: &[LSystemState]) -> Vec<Result<Reconciliation, SessionError>> {
        states.iter().map(|state| self.load(state)).collect()
    }

    /// Turtle geometry of the current result
    pub fn geometry(&self) -> Geometry {
        interpret(self.system.result(), self.system.angle(), &self.turtle)
    }
}
