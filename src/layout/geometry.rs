//! layout::geometry
//!
//! Points and SVG path descriptions.
//!
//! Coordinates print the way SVG consumers expect: integral values carry no
//! fractional part (`150`, not `150.0`).

use std::fmt;

use serde::{Serialize, Serializer};

/// A position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point moved by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// An edge's drawn shape.
///
/// Serializes as its SVG path string.
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    /// `M from L to`
    Line { from: Point, to: Point },
    /// `M from C c1, c2, to`
    Curve {
        from: Point,
        c1: Point,
        c2: Point,
        to: Point,
    },
}

impl Path {
    pub fn line(from: Point, to: Point) -> Self {
        Path::Line { from, to }
    }

    /// Cubic curve leaving `from` and entering `to` along the depth axis.
    ///
    /// `bend` is the control-point distance from each end; `vertical`
    /// selects which axis the control points are pushed along.
    pub fn depth_curve(from: Point, to: Point, bend: f64, vertical: bool) -> Self {
        let (c1, c2) = if vertical {
            (from.offset(0.0, bend), to.offset(0.0, -bend))
        } else {
            (from.offset(bend, 0.0), to.offset(-bend, 0.0))
        };
        Path::Curve { from, c1, c2, to }
    }

    /// Start point.
    pub fn start(&self) -> Point {
        match self {
            Path::Line { from, .. } | Path::Curve { from, .. } => *from,
        }
    }

    /// End point.
    pub fn end(&self) -> Point {
        match self {
            Path::Line { to, .. } | Path::Curve { to, .. } => *to,
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, Path::Curve { .. })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Line { from, to } => write!(f, "M {from} L {to}"),
            Path::Curve { from, c1, c2, to } => write!(f, "M {from} C {c1}, {c2}, {to}"),
        }
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Size of the drawn content box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}
