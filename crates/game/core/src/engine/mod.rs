//! Game orchestration.
//!
//! [`Game`] owns the [`GameContext`] of one match and is the only way players
//! change it. Every request goes through [`Game::handle`]: offered-set check,
//! payload check, validate + execute, phase advance. Turn ends, deaths and
//! final frenzy are driven from here as consequences of those requests.

mod errors;
pub mod scoring;
mod snapshot;
mod transition;
mod turns;

pub use errors::SetupError;
pub use scoring::Standing;
pub use snapshot::{ActorView, GameSnapshot, PlayerView, SquareView, WeaponView};
pub use transition::ActionEffect;

use crate::action::{
    ActionContext, ActionEnvelope, ActionError, ActionKind, ActionSet, Rejection,
    StructuralError, possible_actions,
};
use crate::cards::{Decks, PowerupCard};
use crate::config::GameConfig;
use crate::env::GameMap;
use crate::state::{GameContext, PhaseState, PlayerColor, Terminator, UserPlayer};

/// Life cycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// Seating players.
    Setup,
    Started,
    /// The last skull is gone; every player gets one more turn.
    FinalFrenzy,
    Ended,
}

impl GameStatus {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Started | Self::FinalFrenzy)
    }
}

/// Result of one accepted request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// Count of accepted actions including this one.
    pub nonce: u64,
    pub effect: ActionEffect,
    /// State once the action and its consequences have settled.
    pub snapshot: GameSnapshot,
}

/// One match of Adrenaline.
#[derive(Clone, Debug)]
pub struct Game {
    ctx: GameContext,
    status: GameStatus,
    nonce: u64,
    standings: Vec<Standing>,
}

impl Game {
    /// An empty lobby. `decks` are used in the order given.
    pub fn new(config: GameConfig, map: GameMap, decks: Decks) -> Self {
        Self {
            ctx: GameContext::new(config, map, decks),
            status: GameStatus::Setup,
            nonce: 0,
            standings: Vec::new(),
        }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn turn_owner(&self) -> Option<PlayerColor> {
        self.ctx.turn_owner()
    }

    /// Final ranking; empty until the game has ended.
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.ctx, self.status, self.nonce)
    }

    /// Private hand content of one player.
    pub fn powerups(&self, color: PlayerColor) -> Option<&[PowerupCard]> {
        self.ctx
            .player(color)
            .map(|player| player.hand.powerups.as_slice())
    }

    pub fn phase_state(&self, color: PlayerColor) -> Option<PhaseState> {
        self.ctx.player(color).map(UserPlayer::phase)
    }

    /// Verbs `color` may send right now, or `None` for an unknown player.
    pub fn possible_actions(&self, color: PlayerColor) -> Option<ActionSet> {
        ActionContext::of(&self.ctx, color, self.is_running()).map(|ctx| possible_actions(&ctx))
    }

    // ========================================================================
    // Lobby
    // ========================================================================

    pub fn add_player(
        &mut self,
        nickname: impl Into<String>,
        color: PlayerColor,
    ) -> Result<(), SetupError> {
        if self.status != GameStatus::Setup {
            return Err(SetupError::AlreadyStarted);
        }
        let nickname = nickname.into();
        if nickname.trim().is_empty() {
            return Err(SetupError::EmptyNickname);
        }
        if self.ctx.players.len() >= GameConfig::MAX_PLAYERS {
            return Err(SetupError::GameFull {
                max: GameConfig::MAX_PLAYERS,
            });
        }
        if nickname == Terminator::NICKNAME
            || self
                .ctx
                .players
                .iter()
                .any(|player| player.actor.nickname == nickname)
        {
            return Err(SetupError::NicknameTaken(nickname));
        }
        if self.ctx.player(color).is_some() {
            return Err(SetupError::ColorTaken(color));
        }

        self.ctx.players.push(UserPlayer::new(nickname, color));
        Ok(())
    }

    /// Closes the lobby and opens the first player's turn.
    ///
    /// Seating order is turn order. The first player starts in `Spawn`
    /// holding two powerups; the Terminator, when enabled and a seat is free,
    /// takes the first unused colour at its configured spawn square.
    pub fn start(&mut self) -> Result<(), SetupError> {
        use strum::IntoEnumIterator;

        if self.status != GameStatus::Setup {
            return Err(SetupError::AlreadyStarted);
        }
        let found = self.ctx.players.len();
        if found < GameConfig::MIN_PLAYERS {
            return Err(SetupError::NotEnoughPlayers {
                found,
                required: GameConfig::MIN_PLAYERS,
            });
        }

        let terminator = if self.ctx.config.terminator && found < GameConfig::MAX_PLAYERS {
            let spawn = self
                .ctx
                .map
                .spawn_of(self.ctx.config.terminator_spawn)
                .ok_or(SetupError::NoTerminatorSpawn)?;
            PlayerColor::iter()
                .find(|&color| self.ctx.player(color).is_none())
                .map(|color| (color, spawn))
        } else {
            None
        };

        let order: Vec<PlayerColor> = self.ctx.players.iter().map(UserPlayer::color).collect();
        self.ctx.turns = crate::state::TurnManager::new(order);
        if let Some(first) = self.ctx.players.first_mut() {
            first.first_player = true;
            first.round.start_round(2);
        }
        if let Some((color, spawn)) = terminator {
            self.ctx.terminator = Some(Terminator::new(color));
            self.ctx.place(color, spawn);
        }
        self.ctx.board.refill(&mut self.ctx.decks);
        if let Some(first) = self.ctx.turn_owner() {
            self.ctx.draw_powerup(first);
            self.ctx.draw_powerup(first);
        }

        self.status = GameStatus::Started;
        Ok(())
    }

    // ========================================================================
    // Play
    // ========================================================================

    /// Runs one player request to completion.
    ///
    /// On error nothing has changed and the nonce is not advanced.
    pub fn handle(&mut self, envelope: &ActionEnvelope) -> Result<ActionOutcome, ActionError> {
        if !self.is_running() {
            return Err(Rejection::GameNotRunning.into());
        }
        let sender = envelope.sender;
        let offered = self
            .possible_actions(sender)
            .ok_or(StructuralError::UnknownPlayer(sender))?;

        if !offered.has(envelope.kind) {
            if offered.is_empty() && self.turn_owner() != Some(sender) {
                return Err(Rejection::NotYourTurn(sender).into());
            }
            return Err(Rejection::ActionNotAvailable(envelope.kind).into());
        }
        if !envelope.request.accepts(envelope.kind) {
            return Err(StructuralError::IncompatibleAction {
                expected: envelope.kind,
                got: envelope.request.default_kind(),
            }
            .into());
        }

        let dead = self.phase_state(sender) == Some(PhaseState::Dead);
        let effect =
            transition::execute_transition(&mut self.ctx, sender, envelope.kind, &envelope.request)?;
        self.advance(sender, envelope.kind, dead)?;
        self.nonce += 1;

        Ok(ActionOutcome {
            kind: envelope.kind,
            nonce: self.nonce,
            effect,
            snapshot: self.snapshot(),
        })
    }

    /// Moves the sender's phase on after an accepted action of `kind`.
    fn advance(&mut self, sender: PlayerColor, kind: ActionKind, dead: bool) -> Result<(), ActionError> {
        let present = self.ctx.terminator_present();
        match kind {
            ActionKind::Spawn if dead => self.respawned(sender),
            ActionKind::Reload | ActionKind::PassTurn => self.finish_turn(),
            ActionKind::Powerup => Ok(()),
            ActionKind::TerminatorAction => {
                if let Some(player) = self.ctx.player_mut(sender) {
                    player.round.next_move(true, present);
                }
                Ok(())
            }
            _ => {
                if let Some(player) = self.ctx.player_mut(sender) {
                    player.round.next_move(false, present);
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // Connection
    // ========================================================================

    /// Marks `color` as gone. A pending respawn is made for it, and an open
    /// turn of its own is closed.
    pub fn disconnect(&mut self, color: PlayerColor) -> Result<(), ActionError> {
        let player = self
            .ctx
            .player_mut(color)
            .ok_or(StructuralError::UnknownPlayer(color))?;
        player.connected = false;
        if !self.is_running() {
            return Ok(());
        }

        if self.ctx.turns.dying().contains(&color) {
            self.auto_spawn(color)?;
            return self.respawned(color);
        }
        if self.turn_owner() == Some(color) && self.ctx.turns.dying().is_empty() {
            if self.phase_state(color) == Some(PhaseState::Spawn) {
                self.auto_spawn(color)?;
            }
            return self.finish_turn();
        }
        Ok(())
    }

    pub fn reconnect(&mut self, color: PlayerColor) -> Result<(), ActionError> {
        let player = self
            .ctx
            .player_mut(color)
            .ok_or(StructuralError::UnknownPlayer(color))?;
        player.connected = true;
        Ok(())
    }
}
