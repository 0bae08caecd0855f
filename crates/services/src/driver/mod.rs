//! Runs a `DeckEngine` on a dedicated tokio task.
//!
//! Navigation calls and auto reveal fires are funnelled through one command
//! queue, so every engine mutation happens on the same task.

mod runtime;
mod timer;

use std::sync::Arc;

use flash_core::model::DeckSettings;
use flash_core::{DeckEngine, DeckSnapshot};
use tokio::sync::{mpsc, oneshot, watch};

use crate::card_source::CardSourceService;
use crate::error::DriverError;
use runtime::Command;
use timer::TokioRevealScheduler;

/// Spawns deck engines wired to a card source.
#[derive(Clone)]
pub struct DeckDriver {
    source: Arc<CardSourceService>,
    settings: DeckSettings,
    seed: Option<u64>,
}

impl DeckDriver {
    #[must_use]
    pub fn new(source: CardSourceService) -> Self {
        Self {
            source: Arc::new(source),
            settings: DeckSettings::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: DeckSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a deterministic shuffle for every session.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Start the engine task. Must be called inside a tokio runtime.
    ///
    /// The engine starts unloaded; call [`DeckHandle::reload`] to fill it.
    #[must_use]
    pub fn spawn(&self) -> DeckHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = TokioRevealScheduler::new(tx.downgrade());

        let engine = DeckEngine::new(self.settings.clone()).with_timer(Box::new(scheduler));
        let engine = match self.seed {
            Some(seed) => engine.with_seed(seed),
            None => engine,
        };

        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
        tokio::spawn(runtime::run(engine, rx, snapshot_tx));

        DeckHandle {
            commands: tx,
            snapshots: snapshot_rx,
            source: Arc::clone(&self.source),
        }
    }
}

/// Cloneable handle to a running deck engine.
///
/// The engine task stops once every handle is dropped.
#[derive(Clone)]
pub struct DeckHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<DeckSnapshot>,
    source: Arc<CardSourceService>,
}

impl DeckHandle {
    fn send(&self, command: Command) -> Result<(), DriverError> {
        self.commands.send(command).map_err(|_| DriverError::Closed)
    }

    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub fn advance(&self) -> Result<(), DriverError> {
        self.send(Command::Advance)
    }

    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub fn retreat(&self) -> Result<(), DriverError> {
        self.send(Command::Retreat)
    }

    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub fn toggle_reveal(&self) -> Result<(), DriverError> {
        self.send(Command::ToggleReveal)
    }

    /// Reshuffle the current bank and start over.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub fn reset_deck(&self) -> Result<(), DriverError> {
        self.send(Command::Reset)
    }

    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub fn set_settings(&self, settings: DeckSettings) -> Result<(), DriverError> {
        self.send(Command::Settings(settings))
    }

    /// Rebuild the card bank from the source (re-reading overrides) and start
    /// a new session. Returns the number of cards loaded.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub async fn reload(&self) -> Result<usize, DriverError> {
        let bank = self.source.load().await;
        let count = bank.len();
        self.send(Command::Load(bank))?;
        Ok(count)
    }

    /// Current engine state, after every command sent before this call.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Closed` if the engine task has stopped.
    pub async fn snapshot(&self) -> Result<DeckSnapshot, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    /// Receiver that is notified whenever the engine state changes, including
    /// auto reveals.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeckSnapshot> {
        self.snapshots.clone()
    }

    #[must_use]
    pub fn card_source(&self) -> &CardSourceService {
        &self.source
    }
}
