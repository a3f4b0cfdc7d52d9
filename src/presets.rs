//! Built-in L-systems
//!
//! - Demo: the default bush and one system per turtle command
//! - Curves: Dragon curve, Koch snowflake, Sierpinski arrowhead, Hilbert, Peano, Gosper
//! - Parametric: attribute conditionals and arithmetic

use crate::lsystem::{LSystemState, Rule};

/// All built-in systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    // Demo
    Default,
    ZPositive,
    ZNegative,
    XPositive,
    XNegative,
    Skip,

    // Curves
    DragonCurve,
    KochSnowflake,
    SierpinskiArrowhead,
    HilbertCurve,
    PeanoCurve,
    GosperCurve,

    // Parametric
    Budding,
}

impl Preset {
    pub const ALL: [Preset; 13] = [
        Preset::Default,
        Preset::ZPositive,
        Preset::ZNegative,
        Preset::XPositive,
        Preset::XNegative,
        Preset::Skip,
        Preset::DragonCurve,
        Preset::KochSnowflake,
        Preset::SierpinskiArrowhead,
        Preset::HilbertCurve,
        Preset::PeanoCurve,
        Preset::GosperCurve,
        Preset::Budding,
    ];

    /// Name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::ZPositive => "z-positive",
            Preset::ZNegative => "z-negative",
            Preset::XPositive => "x-positive",
            Preset::XNegative => "x-negative",
            Preset::Skip => "skip",
            Preset::DragonCurve => "dragon",
            Preset::KochSnowflake => "koch",
            Preset::SierpinskiArrowhead => "sierpinski",
            Preset::HilbertCurve => "hilbert",
            Preset::PeanoCurve => "peano",
            Preset::GosperCurve => "gosper",
            Preset::Budding => "budding",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Default => "Bush branching around both axes",
            Preset::ZPositive => "Turn around the Z-axis in the positive direction",
            Preset::ZNegative => "Turn around the Z-axis in the negative direction",
            Preset::XPositive => "Turn around the X-axis in the positive direction",
            Preset::XNegative => "Turn around the X-axis in the negative direction",
            Preset::Skip => "Skip forward along the current direction",
            Preset::DragonCurve => "Heighway dragon",
            Preset::KochSnowflake => "Koch snowflake",
            Preset::SierpinskiArrowhead => "Sierpinski arrowhead curve",
            Preset::HilbertCurve => "Hilbert space-filling curve",
            Preset::PeanoCurve => "Peano space-filling curve",
            Preset::GosperCurve => "Gosper curve (flowsnake)",
            Preset::Budding => "Stem that grows three segments, then buds",
        }
    }

    /// Look up a preset by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Axiom, rules, angle and step count for this preset
    pub fn state(&self) -> LSystemState {
        match self {
            Preset::Default => LSystemState::default(),

            Preset::ZPositive => demo("F[+F]F"),
            Preset::ZNegative => demo("F[-F]F"),
            Preset::XPositive => demo("F[*F]F"),
            Preset::XNegative => demo("F[/F]F"),
            Preset::Skip => demo("F[+fF][-fF]F"),

            // Axiom: F, Rules: F → F+G, G → F-G, Angle: 90°
            Preset::DragonCurve => system("F", &[("F", "F+G"), ("G", "F-G")], 90.0, 10),
            // Axiom: F--F--F, Rules: F → F+F--F+F, Angle: 60°
            Preset::KochSnowflake => system("F--F--F", &[("F", "F+F--F+F")], 60.0, 4),
            // Axiom: F, Rules: F → G-F-G, G → F+G+F, Angle: 60°
            Preset::SierpinskiArrowhead => {
                system("F", &[("F", "G-F-G"), ("G", "F+G+F")], 60.0, 6)
            }
            // X and Y are not drawn, only F is
            Preset::HilbertCurve => system(
                "X",
                &[("X", "-YF+XFX+FY-"), ("Y", "+XF-YFY-FX+")],
                90.0,
                5,
            ),
            // Axiom: F, Rules: F → F+F-F-F-F+F+F+F-F, Angle: 90°
            Preset::PeanoCurve => system("F", &[("F", "F+F-F-F-F+F+F+F-F")], 90.0, 3),
            // Axiom: A, Rules: A → A-B--B+A++AA+B-, B → +A-BB--B-A++A+B
            Preset::GosperCurve => system(
                "A",
                &[("A", "A-B--B+A++AA+B-"), ("B", "+A-BB--B-A++A+B")],
                60.0,
                4,
            ),

            // Grows while t counts up, then the t=3 rule claims the bud first
            Preset::Budding => system(
                "A(t=1)",
                &[("A(t=3)", "F[+F][-F]"), ("A(t>0)", "FA(t+1)")],
                30.0,
                3,
            ),
        }
    }
}

/// The single-rule demo systems share axiom, angle and depth
fn demo(successor: &str) -> LSystemState {
    system("F", &[("F", successor)], 30.0, 3)
}

fn system(axiom: &str, rules: &[(&str, &str)], angle: f64, step_count: usize) -> LSystemState {
    LSystemState {
        axiom: axiom.to_string(),
        rules: rules.iter().map(|(p, s)| Rule::new(p, s)).collect(),
        angle,
        step_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsystem::LSystem;

    #[test]
    fn test_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(Preset::from_name(" Dragon "), Some(Preset::DragonCurve));
        assert_eq!(Preset::from_name("mandelbrot"), None);
    }

    #[test]
    fn test_all_rules_validate() {
        for preset in Preset::ALL {
            for (i, rule) in preset.state().rules.iter().enumerate() {
                assert!(rule.validate(i + 1).is_ok(), "{}: {}", preset.name(), rule);
            }
        }
    }

    #[test]
    fn test_default_matches_engine_default() {
        assert_eq!(Preset::Default.state(), LSystem::default().state());
    }

    #[test]
    fn test_dragon_curve_growth() {
        let mut system = LSystem::from_state(Preset::DragonCurve.state());
        let d2 = system.generation(2).map(str::len);
        let d3 = system.generation(3).map(str::len);
        assert!(d3 > d2);
        assert_eq!(system.generation(1), Some("F+G"));
        system.advance();
        assert_eq!(system.step_count(), 11);
    }

    #[test]
    fn test_koch_first_generation() {
        let system = LSystem::from_state(Preset::KochSnowflake.state());
        assert_eq!(
            system.generation(1),
            Some("F+F--F+F--F+F--F+F--F+F--F+F")
        );
    }

    #[test]
    fn test_budding_generations() {
        let system = LSystem::from_state(Preset::Budding.state());
        assert_eq!(
            system.results(),
            ["A(t=1)", "FA(t=2)", "FFA(t=3)", "FFF[+F][-F]"]
        );
    }
}
