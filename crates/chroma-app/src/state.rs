//! Host state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};

use chroma_core::commands::PlayerCommand;
use chroma_core::events::GameEvent;
use chroma_core::state::GameStateSnapshot;
use chroma_sim::engine::SimConfig;

use crate::game_loop;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// What the game loop publishes for readers on other threads.
#[derive(Debug, Default)]
pub struct Published {
    /// Latest snapshot, replaced every tick.
    pub snapshot: Option<GameStateSnapshot>,
    /// Events not yet drained by a reader.
    pub events: Vec<GameEvent>,
}

/// Shared host state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` so the state is `Sync`
/// - `Option` covers the time before `start` is called
/// - the published data is an `Arc<Mutex<...>>` shared with the loop thread
pub struct AppState {
    /// `None` until `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub published: Arc<Mutex<Published>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            published: Arc::new(Mutex::new(Published::default())),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the game loop thread. Fails if it is already running.
    pub fn start(&self, config: SimConfig) -> Result<()> {
        let mut running = self.running.lock().map_err(|e| anyhow!("{e}"))?;
        if *running {
            bail!("simulation already running");
        }

        let tx = game_loop::spawn_game_loop(config, self.published.clone())?;
        *self.command_tx.lock().map_err(|e| anyhow!("{e}"))? = Some(tx);
        *running = true;
        Ok(())
    }

    /// Forward a player command to the game loop.
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.send_raw(GameLoopCommand::Player(command))
    }

    /// Ask the loop to stop. Later `send` calls fail.
    pub fn shutdown(&self) -> Result<()> {
        self.send_raw(GameLoopCommand::Shutdown)?;
        *self.command_tx.lock().map_err(|e| anyhow!("{e}"))? = None;
        *self.running.lock().map_err(|e| anyhow!("{e}"))? = false;
        Ok(())
    }

    fn send_raw(&self, command: GameLoopCommand) -> Result<()> {
        let tx = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?;
        match tx.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|e| anyhow!("failed to send command: {e}")),
            None => bail!("simulation not started"),
        }
    }

    /// Latest published snapshot, if any tick has run.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.published
            .lock()
            .ok()
            .and_then(|published| published.snapshot.clone())
    }

    /// Take every event published since the last call.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        match self.published.lock() {
            Ok(mut published) => std::mem::take(&mut published.events),
            Err(_) => Vec::new(),
        }
    }
}
