//! Blocking, learner-facing API over the command bridge.
//!
//! Each call sends one command and returns once the engine has shown its
//! effect, so a program reads like a list of ordinary function calls.

use crate::channel::CommandChannel;
use crate::error::ClientError;
use crate::geometry::Level;
use crate::robot::{RobotAction, RobotCommand, RobotResponse};
use crate::turtle::Color;
use crate::turtle_engine::{TurtleAction, TurtleCommand, TurtleId, TurtleResponse};

fn unexpected(response: impl std::fmt::Debug) -> ClientError {
    ClientError::UnexpectedResponse(format!("{response:?}"))
}

/// Entry point for turtle drawing programs.
pub struct TurtleClient {
    channel: CommandChannel<TurtleCommand, TurtleResponse>,
}

impl TurtleClient {
    pub fn new(channel: CommandChannel<TurtleCommand, TurtleResponse>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &CommandChannel<TurtleCommand, TurtleResponse> {
        &self.channel
    }

    /// Adds a turtle to the drawing and returns a handle to steer it.
    pub fn add_turtle(&self) -> Result<TurtleHandle<'_>, ClientError> {
        match self.channel.send_and_await(&TurtleCommand::AddTurtle)? {
            TurtleResponse::Added(id) => Ok(TurtleHandle { client: self, id }),
            other => Err(unexpected(other)),
        }
    }
}

/// A thin reference to one turtle. The engine owns the turtle itself.
#[derive(Clone, Copy)]
pub struct TurtleHandle<'a> {
    client: &'a TurtleClient,
    id: TurtleId,
}

impl TurtleHandle<'_> {
    pub fn id(&self) -> TurtleId {
        self.id
    }

    /// Moves forward `distance` points.
    pub fn forward(&self, distance: f64) -> Result<(), ClientError> {
        self.act(TurtleAction::Forward(distance))
    }

    pub fn backward(&self, distance: f64) -> Result<(), ClientError> {
        self.forward(-distance)
    }

    /// Turns by `degrees`; positive turns left.
    pub fn rotate(&self, degrees: f64) -> Result<(), ClientError> {
        self.act(TurtleAction::Rotate(degrees))
    }

    /// Moves along an arc of `radius` for `degrees`; positive curves left.
    pub fn arc(&self, radius: f64, degrees: f64) -> Result<(), ClientError> {
        self.act(TurtleAction::Arc {
            radius,
            angle: degrees,
        })
    }

    pub fn pen_up(&self) -> Result<(), ClientError> {
        self.act(TurtleAction::PenUp)
    }

    /// Starts drawing with no fill.
    pub fn pen_down(&self) -> Result<(), ClientError> {
        self.pen_down_with_fill(Color::CLEAR)
    }

    pub fn pen_down_with_fill(&self, fill: Color) -> Result<(), ClientError> {
        self.act(TurtleAction::PenDown(fill))
    }

    pub fn line_color(&self, color: Color) -> Result<(), ClientError> {
        self.act(TurtleAction::LineColor(color))
    }

    pub fn line_width(&self, width: f64) -> Result<(), ClientError> {
        self.act(TurtleAction::LineWidth(width))
    }

    fn act(&self, action: TurtleAction) -> Result<(), ClientError> {
        let command = TurtleCommand::Action(self.id, action);
        match self.client.channel.send_and_await(&command)? {
            TurtleResponse::Completed => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

/// Entry point for robot programs.
pub struct RobotClient {
    channel: CommandChannel<RobotCommand, RobotResponse>,
}

impl RobotClient {
    pub fn new(channel: CommandChannel<RobotCommand, RobotResponse>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &CommandChannel<RobotCommand, RobotResponse> {
        &self.channel
    }

    /// Loads `level` and returns a handle to drive its robot.
    pub fn load_level(&self, level: &Level) -> Result<RobotHandle<'_>, ClientError> {
        match self
            .channel
            .send_and_await(&RobotCommand::LoadLevel(level.clone()))?
        {
            RobotResponse::LevelLoaded => Ok(RobotHandle { client: self }),
            other => Err(unexpected(other)),
        }
    }

    /// Puts the robot back at the start of the loaded level.
    ///
    /// Answers [`RobotResponse::NoLevelLoaded`] if there is nothing to reset.
    pub fn reset(&self) -> Result<RobotResponse, ClientError> {
        Ok(self.channel.send_and_await(&RobotCommand::Reset)?)
    }
}

/// Steers the robot of the loaded level.
#[derive(Clone, Copy)]
pub struct RobotHandle<'a> {
    client: &'a RobotClient,
}

impl RobotHandle<'_> {
    /// Moves one cell ahead. The response tells whether the robot moved,
    /// won, crashed, or was refused because the game is over.
    pub fn forward(&self) -> Result<RobotResponse, ClientError> {
        self.act(RobotAction::Forward)
    }

    pub fn turn_right(&self) -> Result<RobotResponse, ClientError> {
        self.act(RobotAction::TurnRight)
    }

    pub fn turn_left(&self) -> Result<RobotResponse, ClientError> {
        self.act(RobotAction::TurnLeft)
    }

    fn act(&self, action: RobotAction) -> Result<RobotResponse, ClientError> {
        Ok(self
            .client
            .channel
            .send_and_await(&RobotCommand::Action(action))?)
    }
}
