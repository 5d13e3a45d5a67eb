//! Multi-turtle drawing engine and its wire protocol.
//!
//! The engine owns a table of [`TurtleState`]s keyed by [`TurtleId`]. Callers
//! only ever hold ids; every mutation goes through a [`TurtleCommand`].

use crate::error::UnknownTurtle;
use crate::host::{Engine, Reply};
use crate::turtle::{Color, Motion, TurtleState};
use crate::wire::{Value, WireMessage};
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Opaque handle to a turtle owned by a [`TurtleEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurtleId(u64);

impl TurtleId {
    /// The integer carried on the wire.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TurtleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turtle #{}", self.0)
    }
}

impl WireMessage for TurtleId {
    fn to_value(&self) -> Value {
        Value::Integer(self.0 as i64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        u64::try_from(value.as_integer()?).ok().map(TurtleId)
    }
}

/// A single operation on one turtle. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleAction {
    Forward(f64),
    Rotate(f64),
    Arc { radius: f64, angle: f64 },
    PenDown(Color),
    PenUp,
    LineColor(Color),
    LineWidth(f64),
}

impl WireMessage for TurtleAction {
    fn to_value(&self) -> Value {
        match *self {
            TurtleAction::Forward(distance) => Value::dictionary([
                ("Action", Value::string("Forward")),
                ("Distance", Value::Real(distance)),
            ]),
            TurtleAction::Rotate(angle) => Value::dictionary([
                ("Action", Value::string("Rotate")),
                ("Angle", Value::Real(angle)),
            ]),
            TurtleAction::Arc { radius, angle } => Value::dictionary([
                ("Action", Value::string("Arc")),
                ("Radius", Value::Real(radius)),
                ("Angle", Value::Real(angle)),
            ]),
            TurtleAction::PenDown(fill) => Value::dictionary([
                ("Action", Value::string("PenDown")),
                ("Color", fill.to_value()),
            ]),
            TurtleAction::PenUp => Value::dictionary([("Action", Value::string("PenUp"))]),
            TurtleAction::LineColor(color) => Value::dictionary([
                ("Action", Value::string("LineColor")),
                ("Color", color.to_value()),
            ]),
            TurtleAction::LineWidth(width) => Value::dictionary([
                ("Action", Value::string("LineWidth")),
                ("Width", Value::Real(width)),
            ]),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let real = |key: &str| value.get(key).and_then(Value::as_real);
        let color = || value.get("Color").and_then(Color::from_value);
        match value.get("Action")?.as_str()? {
            "Forward" => Some(TurtleAction::Forward(real("Distance")?)),
            "Rotate" => Some(TurtleAction::Rotate(real("Angle")?)),
            "Arc" => Some(TurtleAction::Arc {
                radius: real("Radius")?,
                angle: real("Angle")?,
            }),
            "PenDown" => Some(TurtleAction::PenDown(color()?)),
            "PenUp" => Some(TurtleAction::PenUp),
            "LineColor" => Some(TurtleAction::LineColor(color()?)),
            "LineWidth" => Some(TurtleAction::LineWidth(real("Width")?)),
            _ => None,
        }
    }
}

/// Requests understood by a [`TurtleEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleCommand {
    AddTurtle,
    Action(TurtleId, TurtleAction),
}

impl WireMessage for TurtleCommand {
    fn to_value(&self) -> Value {
        match self {
            TurtleCommand::AddTurtle => Value::dictionary([("Command", Value::string("AddTurtle"))]),
            TurtleCommand::Action(id, action) => Value::dictionary([
                ("Command", Value::string("TurtleAction")),
                ("Turtle", id.to_value()),
                ("Action", action.to_value()),
            ]),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.command_tag()? {
            "AddTurtle" => Some(TurtleCommand::AddTurtle),
            "TurtleAction" => Some(TurtleCommand::Action(
                TurtleId::from_value(value.get("Turtle")?)?,
                TurtleAction::from_value(value.get("Action")?)?,
            )),
            _ => None,
        }
    }
}

/// Answers sent back by a [`TurtleEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurtleResponse {
    Added(TurtleId),
    /// The action finished, or was ignored for an invalid parameter.
    Completed,
    UnknownTurtle(TurtleId),
}

impl WireMessage for TurtleResponse {
    fn to_value(&self) -> Value {
        match self {
            TurtleResponse::Added(id) => Value::dictionary([
                ("Command", Value::string("Added")),
                ("Turtle", id.to_value()),
            ]),
            TurtleResponse::Completed => Value::dictionary([("Command", Value::string("Completed"))]),
            TurtleResponse::UnknownTurtle(id) => Value::dictionary([
                ("Command", Value::string("UnknownTurtle")),
                ("Turtle", id.to_value()),
            ]),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.command_tag()? {
            "Added" => Some(TurtleResponse::Added(TurtleId::from_value(
                value.get("Turtle")?,
            )?)),
            "Completed" => Some(TurtleResponse::Completed),
            "UnknownTurtle" => Some(TurtleResponse::UnknownTurtle(TurtleId::from_value(
                value.get("Turtle")?,
            )?)),
            _ => None,
        }
    }
}

/// Configuration for turtle drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleConfig {
    /// Travel speed in points per second.
    pub movement_speed: f64,
    /// Turning speed in degrees per second.
    pub rotation_speed: f64,
    /// Stroke color of a freshly added turtle.
    pub default_color: Color,
    /// Line width of a freshly added turtle.
    pub default_line_width: f64,
    /// Angular spacing of the points recorded along an arc.
    pub arc_step_degrees: f64,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            movement_speed: 200.0,
            rotation_speed: 90.0,
            default_color: Color::GREEN,
            default_line_width: 3.0,
            arc_step_degrees: 5.0,
        }
    }
}

impl TurtleConfig {
    /// Animation time for a motion.
    pub fn duration(&self, motion: Motion) -> Duration {
        let seconds = match motion {
            Motion::Travel(length) => length / self.movement_speed,
            Motion::Turn(degrees) => degrees / self.rotation_speed,
            Motion::Restyle => 0.0,
        };
        if seconds.is_finite() && seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        }
    }
}

/// Owns every turtle of a drawing session.
#[derive(Clone, Debug, Default)]
pub struct TurtleEngine {
    config: TurtleConfig,
    turtles: BTreeMap<TurtleId, TurtleState>,
    next_id: u64,
}

impl TurtleEngine {
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            config,
            turtles: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// Creates a turtle at the origin and returns its fresh id.
    pub fn add_turtle(&mut self) -> TurtleId {
        let id = TurtleId(self.next_id);
        self.next_id += 1;
        self.turtles.insert(
            id,
            TurtleState::new(self.config.default_color, self.config.default_line_width),
        );
        id
    }

    pub fn turtle(&self, id: TurtleId) -> Option<&TurtleState> {
        self.turtles.get(&id)
    }

    /// All turtles, in creation order.
    pub fn turtles(&self) -> impl Iterator<Item = (TurtleId, &TurtleState)> {
        self.turtles.iter().map(|(id, state)| (*id, state))
    }

    /// Applies `action` to one turtle.
    ///
    /// `Ok(None)` means the action was ignored for an invalid parameter.
    pub fn apply(
        &mut self,
        id: TurtleId,
        action: TurtleAction,
    ) -> Result<Option<Motion>, UnknownTurtle> {
        let step = self.config.arc_step_degrees;
        let turtle = self.turtles.get_mut(&id).ok_or(UnknownTurtle(id))?;
        let motion = match action {
            TurtleAction::Forward(distance) => turtle.forward(distance),
            TurtleAction::Rotate(angle) => turtle.rotate(angle),
            TurtleAction::Arc { radius, angle } => turtle.arc(radius, angle, step),
            TurtleAction::PenDown(fill) => turtle.pen_down(fill),
            TurtleAction::PenUp => turtle.pen_up(),
            TurtleAction::LineColor(color) => turtle.set_line_color(color),
            TurtleAction::LineWidth(width) => turtle.set_line_width(width),
        };
        Ok(motion)
    }
}

impl Engine for TurtleEngine {
    type Command = TurtleCommand;
    type Response = TurtleResponse;

    fn handle(&mut self, command: TurtleCommand) -> Reply<TurtleResponse> {
        match command {
            TurtleCommand::AddTurtle => {
                let id = self.add_turtle();
                trace!("added {id}");
                Reply::immediate(TurtleResponse::Added(id))
            }
            TurtleCommand::Action(id, action) => match self.apply(id, action) {
                Err(err) => {
                    warn!("{err}");
                    Reply::immediate(TurtleResponse::UnknownTurtle(id))
                }
                Ok(None) => {
                    warn!("{id} ignored {action:?}: invalid parameter");
                    Reply::immediate(TurtleResponse::Completed)
                }
                Ok(Some(motion)) => {
                    Reply::after(self.config.duration(motion), TurtleResponse::Completed)
                }
            },
        }
    }
}
