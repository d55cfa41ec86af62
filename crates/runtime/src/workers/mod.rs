//! Worker tasks that back the runtime orchestration.
//!
//! The game worker is the only writer of the match; everything else talks to
//! it through [`Command`]s.

mod game;

pub use game::{Command, GameWorker};
