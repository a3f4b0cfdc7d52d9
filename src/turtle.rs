//! Turtle 3D Interpreter
//!
//! Walks a generated L-system string and emits 3D line segments.
//! - `A`-`I`: draw a segment and move forward
//! - `a`-`i`: move forward without drawing
//! - `[` / `]`: push / pop position and orientation
//! - `+` / `-`: rotate about the Z axis by the system angle
//! - `*` / `/`: rotate about the X axis by the system angle
//!
//! Every other character is ignored.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Initial heading: straight up
const HEADING: [f32; 3] = [0.0, 1.0, 0.0];

const X_AXIS: [f32; 3] = [1.0, 0.0, 0.0];
const Z_AXIS: [f32; 3] = [0.0, 0.0, 1.0];

/// Quaternion as [w, x, y, z]
type Quat = [f32; 4];

const IDENTITY: Quat = [1.0, 0.0, 0.0, 0.0];

/// Create quaternion from axis-angle
fn q_from_axis_angle(axis: [f32; 3], angle: f32) -> Quat {
    let half = angle / 2.0;
    let s = half.sin();
    [half.cos(), axis[0] * s, axis[1] * s, axis[2] * s]
}

/// Multiply two quaternions
fn q_mul(a: Quat, b: Quat) -> Quat {
    [
        a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3],
        a[0] * b[1] + a[1] * b[0] + a[2] * b[3] - a[3] * b[2],
        a[0] * b[2] - a[1] * b[3] + a[2] * b[0] + a[3] * b[1],
        a[0] * b[3] + a[1] * b[2] - a[2] * b[1] + a[3] * b[0],
    ]
}

/// Rotate vector by quaternion
fn q_rotate_vec(q: Quat, v: [f32; 3]) -> [f32; 3] {
    let qv: Quat = [0.0, v[0], v[1], v[2]];
    let qc: Quat = [q[0], -q[1], -q[2], -q[3]]; // conjugate
    let r = q_mul(q_mul(q, qv), qc);
    [r[1], r[2], r[3]]
}

/// Turtle settings that are not part of the L-system itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurtleConfig {
    /// Distance covered by one forward symbol
    pub step_length: f32,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self { step_length: 1.0 }
    }
}

impl TurtleConfig {
    pub fn with_step_length(mut self, step_length: f32) -> Self {
        self.step_length = step_length;
        self
    }
}

/// One drawn line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: [f32; 3],
    pub end: [f32; 3],
}

/// Axis-aligned box around everything the turtle visited
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn at(p: [f32; 3]) -> Self {
        Self { min: p, max: p }
    }

    fn include(&mut self, p: [f32; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }
}

/// Result of interpreting a string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    pub segments: Vec<Segment>,
    pub bounds: Bounds,
    /// `]` symbols that had nothing to pop
    pub unmatched_pops: usize,
}

impl Geometry {
    /// Highest point reached, used to frame the result
    pub fn max_y(&self) -> f32 {
        self.bounds.max[1]
    }

    pub fn vertex_count(&self) -> usize {
        self.segments.len() * 2
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Draw,
    Move,
    Push,
    Pop,
    Turn { axis: [f32; 3], sign: f32 },
}

impl Command {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            'A'..='I' => Some(Command::Draw),
            'a'..='i' => Some(Command::Move),
            '[' => Some(Command::Push),
            ']' => Some(Command::Pop),
            '+' => Some(Command::Turn { axis: Z_AXIS, sign: 1.0 }),
            '-' => Some(Command::Turn { axis: Z_AXIS, sign: -1.0 }),
            '*' => Some(Command::Turn { axis: X_AXIS, sign: 1.0 }),
            '/' => Some(Command::Turn { axis: X_AXIS, sign: -1.0 }),
            _ => None,
        }
    }
}

/// Interpret `symbols` with turns of `angle_degrees`
pub fn interpret(symbols: &str, angle_degrees: f64, config: &TurtleConfig) -> Geometry {
    let angle = angle_degrees.to_radians() as f32;
    let forward = HEADING.map(|c| c * config.step_length);

    let mut pos = [0.0f32, 0.0, 0.0];
    let mut rot = IDENTITY;
    let mut stack: Vec<([f32; 3], Quat)> = Vec::new();

    let mut segments = Vec::new();
    let mut bounds = Bounds::at(pos);
    let mut unmatched_pops = 0;

    for command in symbols.chars().filter_map(Command::from_symbol) {
        match command {
            Command::Draw | Command::Move => {
                let dir = q_rotate_vec(rot, forward);
                let next = [pos[0] + dir[0], pos[1] + dir[1], pos[2] + dir[2]];
                if matches!(command, Command::Draw) {
                    segments.push(Segment { start: pos, end: next });
                }
                bounds.include(next);
                pos = next;
            }
            Command::Push => stack.push((pos, rot)),
            Command::Pop => match stack.pop() {
                Some((p, r)) => {
                    pos = p;
                    rot = r;
                }
                None => unmatched_pops += 1,
            },
            Command::Turn { axis, sign } => {
                let q = q_from_axis_angle(axis, angle * sign);
                rot = q_mul(q, rot);
            }
        }
    }

    debug!(
        segments = segments.len(),
        unmatched_pops,
        open_branches = stack.len(),
        "Turtle interpretation done"
    );

    Geometry {
        segments,
        bounds,
        unmatched_pops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_single_segment() {
        let g = interpret("F", 90.0, &TurtleConfig::default());
        assert_eq!(g.segments.len(), 1);
        assert!(close(g.segments[0].start, [0.0, 0.0, 0.0]));
        assert!(close(g.segments[0].end, [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_turn_about_z() {
        let g = interpret("+F", 90.0, &TurtleConfig::default());
        assert!(close(g.segments[0].end, [-1.0, 0.0, 0.0]));

        let g = interpret("-F", 90.0, &TurtleConfig::default());
        assert!(close(g.segments[0].end, [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_turn_about_x() {
        let g = interpret("*F", 90.0, &TurtleConfig::default());
        assert!(close(g.segments[0].end, [0.0, 0.0, 1.0]));

        let g = interpret("/F", 90.0, &TurtleConfig::default());
        assert!(close(g.segments[0].end, [0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_branch_restores_state() {
        let g = interpret("F[+F]F", 90.0, &TurtleConfig::default());
        assert_eq!(g.segments.len(), 3);
        assert!(close(g.segments[2].start, [0.0, 1.0, 0.0]));
        assert!(close(g.segments[2].end, [0.0, 2.0, 0.0]));
        assert_eq!(g.unmatched_pops, 0);
    }

    #[test]
    fn test_move_without_drawing() {
        let g = interpret("fF", 15.0, &TurtleConfig::default());
        assert_eq!(g.segments.len(), 1);
        assert!(close(g.segments[0].start, [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_symbol_classes() {
        // J, j and digits are not turtle commands
        let g = interpret("ABCDEFGHIJj0(i=1)", 15.0, &TurtleConfig::default());
        assert_eq!(g.segments.len(), 9);
    }

    #[test]
    fn test_unmatched_pop_is_ignored() {
        let g = interpret("]F", 90.0, &TurtleConfig::default());
        assert_eq!(g.unmatched_pops, 1);
        assert!(close(g.segments[0].start, [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_step_length_and_bounds() {
        let config = TurtleConfig::default().with_step_length(2.0);
        let g = interpret("FF", 0.0, &config);
        assert!(close(g.segments[1].end, [0.0, 4.0, 0.0]));
        assert!((g.max_y() - 4.0).abs() < 1e-5);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn test_empty_string() {
        let g = interpret("", 15.0, &TurtleConfig::default());
        assert!(g.segments.is_empty());
        assert_eq!(g.bounds.min, [0.0, 0.0, 0.0]);
    }
}
