//! Errors surfaced to the calling side of the bridge.
//!
//! Game-rule failures and rejected actions are not errors: they come back as
//! ordinary responses. Only transport problems and protocol misuse end up here.

use crate::turtle_engine::TurtleId;
use thiserror::Error;

/// Failure of a single command round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// No engine is attached, or it has already gone away.
    #[error("no peer is registered on this channel")]
    NoPeer,

    /// The engine hung up before answering.
    #[error("peer disconnected while a response was pending")]
    Disconnected,

    /// Another request on this channel has not been answered yet.
    #[error("a request is already in flight on this channel")]
    RequestInFlight,
}

/// Failure of a learner-facing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The engine answered with a response that does not fit the request.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// A turtle action named an id the engine never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no such turtle: {0}")]
pub struct UnknownTurtle(pub TurtleId);
