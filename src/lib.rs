//! L-System Walker
//!
//! Parametric L-system rewriting with incremental regeneration, plus a 3D
//! turtle interpreter for the generated strings.

pub mod config;
pub mod error;
pub mod logging;
pub mod lsystem;
pub mod presets;
pub mod state;
pub mod turtle;

pub use error::{RuleError, SessionError};
pub use lsystem::{LSystem, LSystemState, Reconciliation, Rule};
pub use presets::Preset;
pub use state::Session;
pub use turtle::{interpret, Geometry, TurtleConfig};
