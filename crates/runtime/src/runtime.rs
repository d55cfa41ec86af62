//! High-level runtime orchestrator.
//!
//! The runtime owns the game worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a match.

use std::env;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use adrenaline_content::{MapKind, standard_decks};
use adrenaline_core::{Decks, Game, GameConfig, GameMap};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, GameWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Board used when the builder is not given one.
    pub map: MapKind,
    /// Deck shuffle seed used when the builder is not given decks.
    pub seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            command_buffer_size: 32,
            event_buffer_size: 100,
            map: MapKind::default(),
            seed: 0,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ADRENALINE_KILL_SHOTS` - Skulls on the kill-shot track, 5 to 8 (default: 8)
    /// - `ADRENALINE_TERMINATOR` - Add the Terminator to small games (default: false)
    /// - `ADRENALINE_FINAL_FRENZY` - Play final frenzy after the last skull (default: true)
    /// - `ADRENALINE_MAP` - `small`, `medium_a`, `medium_b` or `large` (default: small)
    /// - `ADRENALINE_SEED` - Deck shuffle seed (default: 0)
    /// - `RUNTIME_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `RUNTIME_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(kill_shots) = read_env::<u8>("ADRENALINE_KILL_SHOTS") {
            config.game = config.game.with_kill_shots(kill_shots);
        }
        if let Some(enabled) = read_env_bool("ADRENALINE_TERMINATOR") {
            config.game = config.game.with_terminator(enabled);
        }
        if let Some(enabled) = read_env_bool("ADRENALINE_FINAL_FRENZY") {
            config.game = config.game.with_final_frenzy(enabled);
        }
        if let Some(map) = read_env::<MapKind>("ADRENALINE_MAP") {
            config.map = map;
        }
        if let Some(seed) = read_env::<u64>("ADRENALINE_SEED") {
            config.seed = seed;
        }

        if let Some(capacity) = read_env::<usize>("RUNTIME_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("RUNTIME_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Main runtime that hosts one match
///
/// Runtime owns the worker task; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    map: Option<GameMap>,
    decks: Option<Decks>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            map: None,
            decks: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Play on this board instead of `config.map`
    pub fn map(mut self, map: GameMap) -> Self {
        self.map = Some(map);
        self
    }

    /// Draw from these decks instead of the standard ones
    pub fn decks(mut self, decks: Decks) -> Self {
        self.decks = Some(decks);
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let map = match self.map {
            Some(map) => map,
            None => self.config.map.load()?,
        };
        let decks = self
            .decks
            .unwrap_or_else(|| standard_decks(self.config.seed));
        let game = Game::new(self.config.game.clone(), map, decks);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = GameWorker::new(game, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_standard_game() {
        let config = RuntimeConfig::default();
        assert_eq!(config.game.kill_shots, GameConfig::DEFAULT_KILL_SHOTS);
        assert!(config.game.final_frenzy);
        assert!(!config.game.terminator);
        assert_eq!(config.map, MapKind::Small);
    }

    #[test]
    fn boolean_variables_accept_common_spellings() {
        // SAFETY: the keys are private to this test.
        unsafe {
            env::set_var("ADRENALINE_TEST_FLAG_ON", "Yes");
            env::set_var("ADRENALINE_TEST_FLAG_OFF", "0");
            env::set_var("ADRENALINE_TEST_FLAG_BAD", "maybe");
        }
        assert_eq!(read_env_bool("ADRENALINE_TEST_FLAG_ON"), Some(true));
        assert_eq!(read_env_bool("ADRENALINE_TEST_FLAG_OFF"), Some(false));
        assert_eq!(read_env_bool("ADRENALINE_TEST_FLAG_BAD"), None);
        assert_eq!(read_env_bool("ADRENALINE_TEST_FLAG_UNSET"), None);
    }

    #[test]
    fn map_names_parse_from_the_environment() {
        // SAFETY: the key is private to this test.
        unsafe { env::set_var("ADRENALINE_TEST_MAP", "medium_a") };
        assert_eq!(read_env::<MapKind>("ADRENALINE_TEST_MAP"), Some(MapKind::MediumA));
    }
}
