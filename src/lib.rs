//! # live-playground
//!
//! Lets a learner's program drive a live simulation through ordinary blocking
//! calls while the simulation runs on its own execution context.
//!
//! Two pieces make that work:
//!
//! * a synchronous command bridge ([`CommandChannel`] on the calling side,
//!   [`EngineHost`] on the engine side) that carries [`Value`]-encoded commands
//!   and answers exactly one response per request;
//! * two deterministic engines that interpret those commands: a continuous
//!   turtle-graphics tracer ([`TurtleEngine`]) and a grid navigation game
//!   ([`RobotEngine`]).
//!
//! Rendering is left to the embedding program, which can read engine state at
//! any time through the host.

pub mod channel;
pub mod client;
pub mod error;
pub mod geometry;
pub mod host;
pub mod levels;
pub mod logging;
pub mod robot;
pub mod turtle;
pub mod turtle_engine;
pub mod wire;

pub use channel::*;
pub use client::*;
pub use error::*;
pub use geometry::*;
pub use host::*;
pub use robot::*;
pub use turtle::*;
pub use turtle_engine::*;
pub use wire::*;
