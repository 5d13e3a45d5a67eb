//! Engine side of the command bridge.
//!
//! An [`EngineHost`] owns exactly one [`Engine`] and is its only writer. It
//! decodes incoming commands in arrival order, hands them to the engine and
//! releases each reply only once the reply's animation time has elapsed. While
//! a reply is pending no further command is touched, which gives every caller
//! a total order of visible effects.
//!
//! The host can run on its own thread ([`EngineHost::spawn`]) or be serviced
//! cooperatively from the caller's loop ([`EngineHost::poll`]).

use crate::channel::{self, ChannelConfig, CommandChannel, Envelope, PeerLink};
use crate::wire::{Value, WireMessage};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// The answer to one command, with the animation time it takes to show.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply<R> {
    pub response: R,
    pub animation: Duration,
}

impl<R> Reply<R> {
    /// A reply with nothing to animate.
    pub fn immediate(response: R) -> Self {
        Self {
            response,
            animation: Duration::ZERO,
        }
    }

    /// A reply released once `animation` has played out.
    pub fn after(animation: Duration, response: R) -> Self {
        Self {
            response,
            animation,
        }
    }
}

/// A single-writer state machine driven by wire commands.
pub trait Engine {
    type Command: WireMessage;
    type Response: WireMessage;

    /// Applies one command. Must answer every command it is given.
    fn handle(&mut self, command: Self::Command) -> Reply<Self::Response>;
}

/// Configuration for an [`EngineHost`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Multiplier applied to every animation time. `0.0` answers immediately.
    pub animation_scale: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            animation_scale: 1.0,
        }
    }
}

impl HostConfig {
    /// Skips all animation delays. Useful for tests and headless runs.
    pub fn instant() -> Self {
        Self {
            animation_scale: 0.0,
        }
    }

    fn scaled(&self, animation: Duration) -> Duration {
        if !(self.animation_scale.is_finite() && self.animation_scale > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(animation.as_secs_f64() * self.animation_scale)
            .unwrap_or(Duration::ZERO)
    }
}

struct Pending {
    // `None` for fire-and-forget commands, which still pace what follows.
    response: Option<Value>,
    due: Instant,
}

/// Drives an [`Engine`] from a [`PeerLink`].
pub struct EngineHost<E: Engine> {
    engine: E,
    link: PeerLink,
    config: HostConfig,
    pending: Option<Pending>,
}

impl<E: Engine> EngineHost<E> {
    pub fn new(engine: E, link: PeerLink, config: HostConfig) -> Self {
        Self {
            engine,
            link,
            config,
            pending: None,
        }
    }

    /// Builds a host and the channel that talks to it.
    pub fn connect(
        engine: E,
        config: HostConfig,
        channel_config: ChannelConfig,
    ) -> (Self, CommandChannel<E::Command, E::Response>) {
        let (client, peer) = channel::link();
        (
            Self::new(engine, peer, config),
            CommandChannel::connected(client, channel_config),
        )
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// True while a reply is waiting for its animation to finish.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Services the link without blocking. Delivers a reply whose animation is
    /// over, then handles queued commands until one needs animation time.
    ///
    /// Returns the number of commands handled.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while self.flush_due(Instant::now()) {
            match self.link.commands.try_recv() {
                Ok(envelope) => {
                    if self.dispatch(envelope) {
                        handled += 1;
                    }
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Serves commands until every caller has hung up, then returns the engine.
    pub fn run(mut self) -> E {
        loop {
            if let Some(pending) = &self.pending {
                let wait = pending.due.saturating_duration_since(Instant::now());
                if !wait.is_zero() {
                    thread::sleep(wait);
                }
                self.flush_due(Instant::now());
            }
            match self.link.commands.recv() {
                Ok(envelope) => {
                    self.dispatch(envelope);
                }
                Err(_) => break,
            }
        }
        debug!("command link closed; engine host stopping");
        self.engine
    }

    /// Runs [`run`](Self::run) on a dedicated thread.
    pub fn spawn(self) -> JoinHandle<E>
    where
        E: Send + 'static,
    {
        thread::spawn(move || self.run())
    }

    // Returns false while the pending reply is still animating.
    fn flush_due(&mut self, now: Instant) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.due > now) {
            return false;
        }
        if let Some(Pending {
            response: Some(value),
            ..
        }) = self.pending.take()
            && self.link.responses.send(value).is_err()
        {
            debug!("caller went away before its response was delivered");
        }
        true
    }

    // Returns false if the envelope did not decode.
    fn dispatch(&mut self, envelope: Envelope) -> bool {
        let Some(command) = E::Command::from_value(&envelope.body) else {
            debug!("dropping malformed command {:?}", envelope.body);
            return false;
        };
        let reply = self.engine.handle(command);
        let response = reply.response.to_value();
        trace!("reply {response:?} after {:?}", reply.animation);
        let now = Instant::now();
        let due = now
            .checked_add(self.config.scaled(reply.animation))
            .unwrap_or_else(|| {
                warn!("animation of {:?} is out of range; replying now", reply.animation);
                now
            });
        self.pending = Some(Pending {
            response: envelope.wants_reply.then_some(response),
            due,
        });
        true
    }
}
