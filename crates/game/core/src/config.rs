use crate::env::MovementRules;
use crate::state::AmmoColor;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Skulls on the kill-shot track at game start (5..=8).
    pub kill_shots: u8,
    /// Whether the Terminator joins games with fewer than five players.
    pub terminator: bool,
    /// Whether the last skull triggers final frenzy instead of ending the game.
    pub final_frenzy: bool,
    /// Spawn colour used for the Terminator.
    pub terminator_spawn: AmmoColor,
    /// How movement budgets are measured.
    pub movement: MovementRules,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_DAMAGE: usize = 12;
    pub const KILL_SHOT: usize = 11;
    pub const MAX_AMMO: u8 = 3;
    pub const MAX_WEAPONS: usize = 3;
    pub const MAX_POWERUPS: usize = 3;
    pub const MAX_MARKS_PER_DEALER: usize = 3;
    pub const SPAWN_WEAPONS: usize = 3;
    pub const MIN_PLAYERS: usize = 3;
    pub const MAX_PLAYERS: usize = 5;

    /// Damage taken before the pick action gains a second step.
    pub const ADRENALINE_PICK: usize = 3;
    /// Damage taken before the shoot action gains a pre-shot step.
    pub const ADRENALINE_SHOOT: usize = 6;
    pub const TERMINATOR_DAMAGE: u8 = 1;

    // ===== runtime-tunable defaults =====
    pub const MIN_KILL_SHOTS: u8 = 5;
    pub const DEFAULT_KILL_SHOTS: u8 = 8;

    pub fn new() -> Self {
        Self {
            kill_shots: Self::DEFAULT_KILL_SHOTS,
            terminator: false,
            final_frenzy: true,
            terminator_spawn: AmmoColor::Red,
            movement: MovementRules::Coordinate,
        }
    }

    /// Sets the kill-shot skulls, clamped to the 5..=8 range of the track.
    pub fn with_kill_shots(mut self, kill_shots: u8) -> Self {
        self.kill_shots = kill_shots.clamp(Self::MIN_KILL_SHOTS, Self::DEFAULT_KILL_SHOTS);
        self
    }

    pub fn with_terminator(mut self, terminator: bool) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_final_frenzy(mut self, final_frenzy: bool) -> Self {
        self.final_frenzy = final_frenzy;
        self
    }

    pub fn with_terminator_spawn(mut self, color: AmmoColor) -> Self {
        self.terminator_spawn = color;
        self
    }

    pub fn with_movement(mut self, movement: MovementRules) -> Self {
        self.movement = movement;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
