//! Grid robot game: one robot walking a walled level towards a goal cell.
//!
//! The engine is `Uninitialized` until a level is loaded; from then on it is
//! in one of the [`GameState`]s. `Won` and `Lost` are terminal for actions;
//! only [`RobotCommand::LoadLevel`] or [`RobotCommand::Reset`] leave them.
//! Every command gets exactly one response, including actions that arrive
//! when no game is being played.

use crate::geometry::{GameState, Level, LossReason, RobotState};
use crate::host::{Engine, Reply};
use crate::wire::{Value, WireMessage};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A move the learner's program can ask the robot to make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotAction {
    Forward,
    TurnRight,
    TurnLeft,
}

impl RobotAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RobotAction::Forward => "forward",
            RobotAction::TurnRight => "turnRight",
            RobotAction::TurnLeft => "turnLeft",
        }
    }
}

impl WireMessage for RobotAction {
    fn to_value(&self) -> Value {
        Value::string(self.as_str())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "forward" => Some(RobotAction::Forward),
            "turnRight" => Some(RobotAction::TurnRight),
            "turnLeft" => Some(RobotAction::TurnLeft),
            _ => None,
        }
    }
}

/// Why an action was refused without being attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    NoLevel,
    AlreadyWon,
    AlreadyLost,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::NoLevel => "No level loaded",
            Rejection::AlreadyWon => "Level already won",
            Rejection::AlreadyLost => "Level already lost",
        }
    }
}

impl WireMessage for Rejection {
    fn to_value(&self) -> Value {
        Value::string(self.as_str())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "No level loaded" => Some(Rejection::NoLevel),
            "Level already won" => Some(Rejection::AlreadyWon),
            "Level already lost" => Some(Rejection::AlreadyLost),
            _ => None,
        }
    }
}

/// Requests understood by a [`RobotEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum RobotCommand {
    LoadLevel(Level),
    Action(RobotAction),
    Reset,
}

impl WireMessage for RobotCommand {
    fn to_value(&self) -> Value {
        match self {
            RobotCommand::LoadLevel(level) => Value::dictionary([
                ("Command", Value::string("LoadLevel")),
                ("Level", level.to_value()),
            ]),
            RobotCommand::Action(action) => Value::dictionary([
                ("Command", Value::string("RobotAction")),
                ("Action", action.to_value()),
            ]),
            RobotCommand::Reset => Value::dictionary([("Command", Value::string("Reset"))]),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.command_tag()? {
            "LoadLevel" => Some(RobotCommand::LoadLevel(Level::from_value(
                value.get("Level")?,
            )?)),
            "RobotAction" => Some(RobotCommand::Action(RobotAction::from_value(
                value.get("Action")?,
            )?)),
            "Reset" => Some(RobotCommand::Reset),
            _ => None,
        }
    }
}

/// Answers sent back by a [`RobotEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobotResponse {
    LevelLoaded,
    ActionCompleted(RobotAction),
    ActionFailed(RobotAction, LossReason),
    Won,
    ActionRejected(RobotAction, Rejection),
    /// A reset arrived before any level was loaded.
    NoLevelLoaded,
}

impl WireMessage for RobotResponse {
    fn to_value(&self) -> Value {
        let tag = |name: &str| ("Command", Value::string(name));
        match self {
            RobotResponse::LevelLoaded => Value::dictionary([tag("LevelLoaded")]),
            RobotResponse::ActionCompleted(action) => {
                Value::dictionary([tag("ActionCompleted"), ("Action", action.to_value())])
            }
            RobotResponse::ActionFailed(action, reason) => Value::dictionary([
                tag("ActionFailed"),
                ("Action", action.to_value()),
                ("Reason", reason.to_value()),
            ]),
            RobotResponse::Won => Value::dictionary([tag("Won")]),
            RobotResponse::ActionRejected(action, rejection) => Value::dictionary([
                tag("ActionRejected"),
                ("Action", action.to_value()),
                ("Reason", rejection.to_value()),
            ]),
            RobotResponse::NoLevelLoaded => Value::dictionary([tag("NoLevelLoaded")]),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let action = || RobotAction::from_value(value.get("Action")?);
        match value.command_tag()? {
            "LevelLoaded" => Some(RobotResponse::LevelLoaded),
            "ActionCompleted" => Some(RobotResponse::ActionCompleted(action()?)),
            "ActionFailed" => Some(RobotResponse::ActionFailed(
                action()?,
                LossReason::from_value(value.get("Reason")?)?,
            )),
            "Won" => Some(RobotResponse::Won),
            "ActionRejected" => Some(RobotResponse::ActionRejected(
                action()?,
                Rejection::from_value(value.get("Reason")?)?,
            )),
            "NoLevelLoaded" => Some(RobotResponse::NoLevelLoaded),
            _ => None,
        }
    }
}

/// Configuration for the robot game.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Animation time of a successful step or turn.
    pub step_duration: Duration,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            step_duration: Duration::from_millis(300),
        }
    }
}

#[derive(Clone, Debug)]
struct Session {
    level: Level,
    robot: RobotState,
    game: GameState,
}

impl Session {
    fn start(level: Level) -> Self {
        Self {
            robot: level.start,
            level,
            game: GameState::Playing,
        }
    }
}

/// The robot game engine. Holds at most one level and one robot.
#[derive(Clone, Debug, Default)]
pub struct RobotEngine {
    config: RobotConfig,
    session: Option<Session>,
}

impl RobotEngine {
    pub fn new(config: RobotConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&Level> {
        self.session.as_ref().map(|s| &s.level)
    }

    pub fn robot(&self) -> Option<RobotState> {
        self.session.as_ref().map(|s| s.robot)
    }

    /// `None` until a level has been loaded.
    pub fn game_state(&self) -> Option<GameState> {
        self.session.as_ref().map(|s| s.game)
    }

    /// Replaces any current game with a fresh one on `level`.
    pub fn load_level(&mut self, level: Level) -> RobotResponse {
        info!(
            "loading {}x{} level with {} walls",
            level.grid_size.columns,
            level.grid_size.rows,
            level.walls.len()
        );
        self.session = Some(Session::start(level));
        RobotResponse::LevelLoaded
    }

    /// Restarts the loaded level.
    pub fn reset(&mut self) -> RobotResponse {
        match self.session.take() {
            Some(session) => {
                self.session = Some(Session::start(session.level));
                RobotResponse::LevelLoaded
            }
            None => {
                debug!("reset ignored: no level loaded");
                RobotResponse::NoLevelLoaded
            }
        }
    }

    /// Performs one action while a game is being played.
    pub fn act(&mut self, action: RobotAction) -> RobotResponse {
        let Some(session) = &mut self.session else {
            return RobotResponse::ActionRejected(action, Rejection::NoLevel);
        };
        match session.game {
            GameState::Playing => {}
            GameState::Won => return RobotResponse::ActionRejected(action, Rejection::AlreadyWon),
            GameState::Lost(_) => {
                return RobotResponse::ActionRejected(action, Rejection::AlreadyLost);
            }
        }

        let robot = &mut session.robot;
        match action {
            RobotAction::TurnRight => {
                robot.direction = robot.direction.turned_right();
                RobotResponse::ActionCompleted(action)
            }
            RobotAction::TurnLeft => {
                robot.direction = robot.direction.turned_left();
                RobotResponse::ActionCompleted(action)
            }
            RobotAction::Forward => {
                // A wall on the boundary edge counts as a wall, not as leaving the grid.
                let next = robot
                    .position
                    .moved(robot.direction)
                    .filter(|next| session.level.contains(*next));
                let next = if session.level.is_blocked(robot.position, robot.direction) {
                    Err(LossReason::HitWall)
                } else {
                    next.ok_or(LossReason::OutOfBounds)
                };
                let next = match next {
                    Ok(next) => next,
                    Err(reason) => {
                        info!("robot lost: {}", reason.as_str());
                        session.game = GameState::Lost(reason);
                        return RobotResponse::ActionFailed(action, reason);
                    }
                };

                robot.position = next;
                if next == session.level.goal {
                    info!("robot reached the goal");
                    session.game = GameState::Won;
                    RobotResponse::Won
                } else {
                    RobotResponse::ActionCompleted(action)
                }
            }
        }
    }
}

impl Engine for RobotEngine {
    type Command = RobotCommand;
    type Response = RobotResponse;

    fn handle(&mut self, command: RobotCommand) -> Reply<RobotResponse> {
        let response = match command {
            RobotCommand::LoadLevel(level) => self.load_level(level),
            RobotCommand::Reset => self.reset(),
            RobotCommand::Action(action) => self.act(action),
        };
        match response {
            RobotResponse::ActionCompleted(_) | RobotResponse::Won => {
                Reply::after(self.config.step_duration, response)
            }
            _ => Reply::immediate(response),
        }
    }
}
