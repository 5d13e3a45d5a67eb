//! Turtle state and drawing operations.

use crate::wire::{Value, WireMessage};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Upper bound on the points sampled for a single arc.
const MAX_ARC_SAMPLES: usize = 4096;

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const ORANGE: Color = Color::rgb(1.0, 0.5, 0.0);
    pub const PURPLE: Color = Color::rgb(0.5, 0.0, 0.5);

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl WireMessage for Color {
    fn to_value(&self) -> Value {
        Value::dictionary([
            ("red", Value::Real(self.red)),
            ("green", Value::Real(self.green)),
            ("blue", Value::Real(self.blue)),
            ("alpha", Value::Real(self.alpha)),
        ])
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            red: value.get("red")?.as_real()?,
            green: value.get("green")?.as_real()?,
            blue: value.get("blue")?.as_real()?,
            alpha: value.get("alpha")?.as_real()?,
        })
    }
}

/// One continuous polyline drawn with a single style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<DVec2>,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
}

/// Whether the turtle is recording its path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PenState {
    Up,
    /// The stroke currently being drawn.
    Down(Stroke),
}

/// What an accepted operation did, used to pace its animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Moved along a path of this length.
    Travel(f64),
    /// Turned in place by this many degrees (unsigned).
    Turn(f64),
    /// Changed style only.
    Restyle,
}

/// The state of a drawing turtle.
///
/// Heading is in radians, counter-clockwise from `+X`, normalized to `[0, 2pi)`.
/// Drawn geometry is never rewritten: changing style while the pen is down
/// closes the current stroke and starts a new one at the same point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    position: DVec2,
    heading: f64,
    stroke_color: Color,
    line_width: f64,
    pen: PenState,
    strokes: Vec<Stroke>,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::new(Color::GREEN, 3.0)
    }
}

impl TurtleState {
    /// A turtle at the origin facing `+X`, pen up.
    pub fn new(stroke_color: Color, line_width: f64) -> Self {
        Self {
            position: DVec2::ZERO,
            heading: 0.0,
            stroke_color,
            line_width,
            pen: PenState::Up,
            strokes: Vec::new(),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Unit vector along the heading.
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.heading)
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn is_pen_down(&self) -> bool {
        matches!(self.pen, PenState::Down(_))
    }

    /// Strokes that are finished.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Every stroke that is visible, including the one being drawn.
    pub fn drawn(&self) -> impl Iterator<Item = &Stroke> {
        let active = match &self.pen {
            PenState::Down(stroke) => Some(stroke),
            PenState::Up => None,
        };
        self.strokes.iter().chain(active)
    }

    /// Moves `distance` along the heading. Negative distances move backwards.
    pub fn forward(&mut self, distance: f64) -> Option<Motion> {
        if !distance.is_finite() {
            return None;
        }
        self.position += self.direction() * distance;
        self.trace(self.position);
        Some(Motion::Travel(distance.abs()))
    }

    pub fn backward(&mut self, distance: f64) -> Option<Motion> {
        self.forward(-distance)
    }

    /// Turns by `degrees`; positive is counter-clockwise (left).
    pub fn rotate(&mut self, degrees: f64) -> Option<Motion> {
        if !degrees.is_finite() {
            return None;
        }
        self.heading = normalize(self.heading + degrees.to_radians());
        Some(Motion::Turn(degrees.abs()))
    }

    /// Follows a circular arc of `radius` through `degrees` of turn.
    ///
    /// Non-negative angles curve left, negative angles curve right. The center
    /// sits `radius` away on that side, perpendicular to the heading, and the
    /// turtle ends tangent to the circle. While the pen is down the arc is
    /// sampled every `step_degrees` into the active stroke.
    ///
    /// Negative radii are rejected.
    pub fn arc(&mut self, radius: f64, degrees: f64, step_degrees: f64) -> Option<Motion> {
        if !(radius.is_finite() && radius >= 0.0 && degrees.is_finite()) {
            return None;
        }
        let side = if degrees >= 0.0 { 1.0 } else { -1.0 };
        let center = self.position + self.direction().perp() * (side * radius);
        let start = self.heading - side * FRAC_PI_2;
        let sweep = degrees.to_radians();
        let on_circle = |angle: f64| center + DVec2::from_angle(angle) * radius;

        if self.is_pen_down() {
            let step = if step_degrees > 0.0 { step_degrees } else { 5.0 };
            let samples = ((degrees.abs() / step).ceil() as usize).clamp(1, MAX_ARC_SAMPLES);
            for i in 1..samples {
                let point = on_circle(start + sweep * i as f64 / samples as f64);
                self.trace(point);
            }
        }

        self.position = on_circle(start + sweep);
        self.heading = normalize(self.heading + sweep);
        self.trace(self.position);
        Some(Motion::Travel((TAU * radius * degrees / 360.0).abs()))
    }

    /// Starts a new stroke at the current position with the current style.
    ///
    /// If the pen is already down, the current stroke is closed first.
    pub fn pen_down(&mut self, fill_color: Color) -> Option<Motion> {
        self.finish_stroke();
        self.pen = PenState::Down(Stroke {
            points: vec![self.position],
            stroke_color: self.stroke_color,
            fill_color,
            line_width: self.line_width,
        });
        Some(Motion::Restyle)
    }

    /// Stops recording. Already drawn geometry is kept.
    pub fn pen_up(&mut self) -> Option<Motion> {
        self.finish_stroke();
        Some(Motion::Restyle)
    }

    pub fn set_line_color(&mut self, color: Color) -> Option<Motion> {
        self.stroke_color = color;
        self.restart_stroke();
        Some(Motion::Restyle)
    }

    /// Widths must be finite and positive.
    pub fn set_line_width(&mut self, width: f64) -> Option<Motion> {
        if !(width.is_finite() && width > 0.0) {
            return None;
        }
        self.line_width = width;
        self.restart_stroke();
        Some(Motion::Restyle)
    }

    fn trace(&mut self, point: DVec2) {
        if let PenState::Down(stroke) = &mut self.pen {
            stroke.points.push(point);
        }
    }

    fn restart_stroke(&mut self) {
        if let PenState::Down(stroke) = &self.pen {
            let fill = stroke.fill_color;
            self.pen_down(fill);
        }
    }

    fn finish_stroke(&mut self) {
        if let PenState::Down(stroke) = std::mem::replace(&mut self.pen, PenState::Up) {
            // A lone point draws nothing.
            if stroke.points.len() > 1 {
                self.strokes.push(stroke);
            }
        }
    }
}

fn normalize(radians: f64) -> f64 {
    radians.rem_euclid(TAU)
}
