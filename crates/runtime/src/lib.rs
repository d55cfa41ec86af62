//! Runtime orchestration for one Adrenaline match.
//!
//! The rules live in `adrenaline-core` and never block. This crate puts a
//! [`adrenaline_core::Game`] behind a single worker task so that request
//! handlers can share it through a cloneable [`RuntimeHandle`] and follow the
//! match through topic subscriptions.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, its builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the game worker internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, GameStateEvent, LobbyEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
