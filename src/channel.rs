//! Calling side of the command bridge.
//!
//! A [`CommandChannel`] turns an asynchronous, ordered transport into blocking
//! calls. The caller encodes a command, sends it, then polls for the single
//! response. Between polls it runs a caller-supplied `pump`, so an engine hosted
//! on the same thread (see [`EngineHost::poll`](crate::host::EngineHost::poll))
//! keeps making progress while the caller waits.
//!
//! The transport is a pair of `crossbeam-channel` queues created by [`link`].
//! The host wires the two ends together; nothing is discovered through global
//! state.

use crate::error::ChannelError;
use crate::wire::{Value, WireMessage};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::{Mutex, TryLockError};
use std::time::Duration;

/// A command in transit, tagged with whether the caller waits for an answer.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub body: Value,
    pub wants_reply: bool,
}

/// Caller end of a transport.
#[derive(Debug)]
pub struct ClientLink {
    commands: Sender<Envelope>,
    responses: Receiver<Value>,
}

/// Engine end of a transport.
#[derive(Debug)]
pub struct PeerLink {
    pub(crate) commands: Receiver<Envelope>,
    pub(crate) responses: Sender<Value>,
}

/// Creates a connected pair of transport ends.
pub fn link() -> (ClientLink, PeerLink) {
    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    let (response_tx, response_rx) = crossbeam_channel::unbounded();
    (
        ClientLink {
            commands: command_tx,
            responses: response_rx,
        },
        PeerLink {
            commands: command_rx,
            responses: response_tx,
        },
    )
}

/// Configuration for a [`CommandChannel`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// How long a waiting caller blocks before running its pump again.
    pub poll_interval: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
        }
    }
}

struct Attached {
    commands: Sender<Envelope>,
    // Holding this lock is what marks a request as in flight.
    responses: Mutex<Receiver<Value>>,
}

/// Blocking request/response channel for commands `C` answered by `R`.
///
/// At most one [`send_and_await`](Self::send_and_await) may be outstanding per
/// channel; a concurrent second request fails with
/// [`ChannelError::RequestInFlight`].
pub struct CommandChannel<C, R> {
    attached: Option<Attached>,
    config: ChannelConfig,
    _marker: PhantomData<fn(&C) -> R>,
}

impl<C: WireMessage, R: WireMessage> CommandChannel<C, R> {
    /// Creates a channel with no peer. Requests fail with [`ChannelError::NoPeer`]
    /// until [`attach`](Self::attach) is called.
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            attached: None,
            config,
            _marker: PhantomData,
        }
    }

    /// Creates a channel already wired to a peer.
    pub fn connected(link: ClientLink, config: ChannelConfig) -> Self {
        let mut channel = Self::new(config);
        channel.attach(link);
        channel
    }

    /// Wires the channel to a peer, replacing any previous one.
    pub fn attach(&mut self, link: ClientLink) {
        self.attached = Some(Attached {
            commands: link.commands,
            responses: Mutex::new(link.responses),
        });
    }

    /// Drops the current peer, if any.
    pub fn detach(&mut self) {
        self.attached = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Sends a command without waiting for, or ever receiving, a response.
    ///
    /// Does nothing when no peer is attached.
    pub fn send(&self, command: &C) {
        let Some(attached) = &self.attached else {
            debug!("send without a peer; command dropped");
            return;
        };
        let envelope = Envelope {
            body: command.to_value(),
            wants_reply: false,
        };
        if attached.commands.send(envelope).is_err() {
            debug!("peer is gone; command dropped");
        }
    }

    /// Sends a command and blocks until its response arrives.
    pub fn send_and_await(&self, command: &C) -> Result<R, ChannelError> {
        self.send_and_await_pumping(command, || {})
    }

    /// Sends a command and waits for its response, running `pump` between
    /// polls so the caller's own scheduler is never starved.
    ///
    /// Responses that fail to decode are dropped and waiting continues.
    pub fn send_and_await_pumping(
        &self,
        command: &C,
        mut pump: impl FnMut(),
    ) -> Result<R, ChannelError> {
        let attached = self.attached.as_ref().ok_or(ChannelError::NoPeer)?;
        let responses = match attached.responses.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(ChannelError::RequestInFlight),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        for stale in responses.try_iter() {
            warn!("discarding unmatched response {stale:?}");
        }

        let envelope = Envelope {
            body: command.to_value(),
            wants_reply: true,
        };
        attached
            .commands
            .send(envelope)
            .map_err(|_| ChannelError::NoPeer)?;

        loop {
            pump();
            match responses.recv_timeout(self.config.poll_interval) {
                Ok(value) => match R::from_value(&value) {
                    Some(response) => return Ok(response),
                    None => debug!("dropping undecodable response {value:?}"),
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(ChannelError::Disconnected),
            }
        }
    }
}
