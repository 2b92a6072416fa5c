//! Host lifecycle signals, decoupled from the host through an event bus.
//!
//! Integrations register host callbacks as [`Hook`]s and keep them in a
//! [`Hooks`] set; dropping the set unregisters everything.

mod hooks;

pub use hooks::{Hook, Hooks};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::models::Game;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    GameWasRunningBefore { created_at: i64, game: Game },
    GameStarted { created_at: i64, game: Game },
    GameStopped { created_at: i64, game: Game },
    Suspended { created_at: i64, game: Option<Game> },
    ResumeFromSuspend { created_at: i64, game: Option<Game> },
    UserLoggedIn { created_at: i64, username: String },
    UserLoggedOut { created_at: i64 },
}

impl Event {
    /// Milliseconds since the unix epoch at which the host reported the event
    pub fn created_at(&self) -> i64 {
        match self {
            Self::GameWasRunningBefore { created_at, .. }
            | Self::GameStarted { created_at, .. }
            | Self::GameStopped { created_at, .. }
            | Self::Suspended { created_at, .. }
            | Self::ResumeFromSuspend { created_at, .. }
            | Self::UserLoggedIn { created_at, .. }
            | Self::UserLoggedOut { created_at } => *created_at,
        }
    }
}

pub trait EventBus: Send + Sync {
    fn emit(&self, event: Event);
}

/// Fan-out bus; slow subscribers lose the oldest events past `capacity`
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    sender: broadcast::Sender<Event>,
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus for BroadcastBus {
    fn emit(&self, event: Event) {
        // No subscribers is not an error
        if self.sender.send(event).is_err() {
            trace!("event emitted without subscribers");
        }
    }
}
