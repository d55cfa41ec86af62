//! Turn boundaries: death resolution, final frenzy, hand-over and game end.
//!
//! These run as consequences of accepted requests (pass, reload, respawn,
//! disconnect); they are never requested on their own.

use crate::action::{ActionError, ActionTransition, SpawnAction, SpawnRequest};
use crate::config::GameConfig;
use crate::state::{FrenzyMode, PhaseState, PlayerColor};

use super::scoring::{self, board_scores, kill_track_scores};
use super::{Game, GameStatus};

impl Game {
    /// Closes the owner's turn and resolves what it caused.
    pub(super) fn finish_turn(&mut self) -> Result<(), ActionError> {
        let Some(owner) = self.ctx.turn_owner() else {
            return Ok(());
        };
        if let Some(player) = self.ctx.player_mut(owner) {
            player.round.end_round();
        }

        self.resolve_deaths(owner);

        if self.status == GameStatus::Started && self.ctx.kill_shots.is_exhausted() {
            if !self.ctx.config.final_frenzy {
                self.end_game();
                return Ok(());
            }
            self.enter_final_frenzy(owner);
        }

        self.ctx.board.refill(&mut self.ctx.decks);

        // Nobody is left waiting on a player who cannot answer.
        let absent: Vec<PlayerColor> = self
            .ctx
            .turns
            .dying()
            .iter()
            .copied()
            .filter(|&color| self.ctx.player(color).is_some_and(|player| !player.connected))
            .collect();
        for color in absent {
            self.auto_spawn(color)?;
            self.ctx.turns.remove_dying(color);
            if let Some(player) = self.ctx.player_mut(color) {
                player.round.respawned();
            }
        }

        if self.ctx.turns.dying().is_empty() {
            self.advance_turn()?;
        }
        Ok(())
    }

    /// A killed player is back on the board. The next turn starts once the
    /// last one is.
    pub(super) fn respawned(&mut self, color: PlayerColor) -> Result<(), ActionError> {
        if let Some(player) = self.ctx.player_mut(color) {
            player.round.respawned();
        }
        self.ctx.turns.remove_dying(color);
        if self.ctx.turns.dying().is_empty() && self.is_running() {
            self.advance_turn()?;
        }
        Ok(())
    }

    /// Spawns `color` with its first powerup, drawing one if the hand is empty.
    pub(super) fn auto_spawn(&mut self, color: PlayerColor) -> Result<(), ActionError> {
        let empty = self
            .ctx
            .player(color)
            .is_some_and(|player| player.hand.powerups.is_empty());
        if empty {
            self.ctx.draw_powerup(color);
        }
        SpawnAction::new(color, SpawnRequest { powerup: 0 }).execute(&mut self.ctx)?;
        Ok(())
    }

    /// Scores and clears every dead board.
    fn resolve_deaths(&mut self, owner: PlayerColor) {
        let dead: Vec<PlayerColor> = self
            .ctx
            .actors()
            .filter(|actor| actor.board.is_dead())
            .map(|actor| actor.color)
            .collect();
        let frenzy = self.status == GameStatus::FinalFrenzy;
        let mut kills = 0;

        for victim in dead {
            let Some(actor) = self.ctx.actor(victim) else {
                continue;
            };
            let scores = board_scores(&actor.board);
            let killer = actor.board.killer();
            let overkiller = actor.board.overkiller();
            self.award(&scores);

            if let Some(killer) = killer {
                self.ctx.kill_shots.add_kill(killer, overkiller.is_some());
                if killer == owner {
                    kills += 1;
                }
            }
            if let Some(overkiller) = overkiller
                && let Some(revenge) = self.ctx.actor_mut(overkiller)
                && revenge.board.marks_by(victim) < GameConfig::MAX_MARKS_PER_DEALER
            {
                revenge.board.add_mark(victim, 1);
            }

            if let Some(actor) = self.ctx.actor_mut(victim) {
                actor.board.on_death();
                actor.position = None;
                if frenzy {
                    actor.board.flip();
                }
            }

            if self.ctx.is_terminator(victim) {
                if let Some(spawn) = self.ctx.map.spawn_of(self.ctx.config.terminator_spawn) {
                    self.ctx.place(victim, spawn);
                }
            } else {
                if let Some(player) = self.ctx.player_mut(victim) {
                    player.round.kill();
                }
                self.ctx.turns.add_dying(victim);
                self.ctx.draw_powerup(victim);
            }
        }

        if kills >= 2
            && let Some(actor) = self.ctx.actor_mut(owner)
        {
            actor.points += 1;
        }
    }

    fn enter_final_frenzy(&mut self, activator: PlayerColor) {
        self.status = GameStatus::FinalFrenzy;
        self.ctx.turns.set_frenzy_players(activator);
        for player in &mut self.ctx.players {
            player.actor.board.flip();
        }
        if let Some(terminator) = self.ctx.terminator.as_mut() {
            terminator.actor.board.flip();
        }
    }

    /// Hands the turn to the next connected player.
    ///
    /// Disconnected players are spawned if needed and skipped. The game ends
    /// after the last frenzy turn, or when nobody is connected.
    fn advance_turn(&mut self) -> Result<(), ActionError> {
        for _ in 0..self.ctx.players.len() {
            if self.status == GameStatus::FinalFrenzy
                && self.ctx.turn_owner() == self.ctx.turns.last_player()
            {
                self.end_game();
                return Ok(());
            }

            let Some(owner) = self.ctx.turns.next_turn() else {
                return Ok(());
            };
            let actions = match self.ctx.turns.frenzy_mode(owner) {
                Some(FrenzyMode::Light) => 1,
                Some(FrenzyMode::Double) | None => 2,
            };
            let Some(player) = self.ctx.player_mut(owner) else {
                continue;
            };
            player.round.start_round(actions);
            let spawning = player.phase() == PhaseState::Spawn;
            let connected = player.connected;

            if spawning {
                self.ctx.draw_powerup(owner);
                self.ctx.draw_powerup(owner);
            }
            if connected {
                return Ok(());
            }

            if spawning {
                self.auto_spawn(owner)?;
            }
            if let Some(player) = self.ctx.player_mut(owner) {
                player.round.end_round();
            }
        }

        self.end_game();
        Ok(())
    }

    /// Scores the boards still carrying damage and the kill-shot track, then
    /// ranks the players.
    fn end_game(&mut self) {
        let pending: Vec<Vec<(PlayerColor, u32)>> = self
            .ctx
            .actors()
            .filter(|actor| actor.board.damage_count() > 0)
            .map(|actor| board_scores(&actor.board))
            .collect();
        for scores in &pending {
            self.award(scores);
        }
        let track = kill_track_scores(&self.ctx.kill_shots);
        self.award(&track);

        self.standings = scoring::standings(&self.ctx.players, &self.ctx.kill_shots);
        self.status = GameStatus::Ended;
    }

    fn award(&mut self, scores: &[(PlayerColor, u32)]) {
        for &(color, points) in scores {
            if let Some(actor) = self.ctx.actor_mut(color) {
                actor.points += points;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{ActionEnvelope, ActionKind, ActionRequest, SpawnRequest};
    use crate::config::GameConfig;
    use crate::engine::{Game, GameStatus};
    use crate::state::{FrenzyMode, KillShotTrack, PhaseState, PlayerColor};
    use crate::testing::{COLORS, decks, pos, small_map};

    use PlayerColor::{Blue, Green, Yellow};

    fn started(config: GameConfig) -> Game {
        let mut game = Game::new(config, small_map(), decks());
        for &color in &COLORS[..3] {
            game.add_player(color.to_string(), color).unwrap();
        }
        game.start().unwrap();
        game.handle(&spawn(Yellow)).unwrap();
        game
    }

    fn spawn(color: PlayerColor) -> ActionEnvelope {
        ActionEnvelope::new(
            color,
            ActionKind::Spawn,
            ActionRequest::Spawn(SpawnRequest { powerup: 0 }),
        )
    }

    fn wound(game: &mut Game, victim: PlayerColor, by: PlayerColor, amount: u8) {
        let actor = game.ctx.actor_mut(victim).unwrap();
        actor.position = Some(pos(1, 1));
        actor.board.add_damage(by, amount);
    }

    #[test]
    fn a_kill_scores_and_waits_for_the_respawn() {
        let mut game = started(GameConfig::default());
        wound(&mut game, Green, Yellow, 11);
        game.handle(&ActionEnvelope::pass(Yellow)).unwrap();

        assert_eq!(game.phase_state(Green), Some(PhaseState::Dead));
        assert_eq!(game.ctx.turns.dying(), &[Green]);
        assert_eq!(game.ctx.kill_shots.skulls(), 7);
        // 8 for most damage, 1 for first blood.
        assert_eq!(game.ctx.actor(Yellow).unwrap().points, 9);
        assert_eq!(game.ctx.actor(Green).unwrap().board.skulls(), 1);
        assert_eq!(game.possible_actions(Blue), Some(Default::default()));

        // The turn is held until Green is back.
        assert_eq!(game.turn_owner(), Some(Yellow));
        game.handle(&spawn(Green)).unwrap();
        assert!(game.ctx.position_of(Green).is_some());
        assert_eq!(game.turn_owner(), Some(Green));
        assert_eq!(game.phase_state(Green), Some(PhaseState::Begin));
    }

    #[test]
    fn overkill_marks_the_killer_back() {
        let mut game = started(GameConfig::default());
        wound(&mut game, Green, Blue, 12);
        game.handle(&ActionEnvelope::pass(Yellow)).unwrap();

        assert_eq!(game.ctx.kill_shots.tokens()[0].count, 2);
        assert_eq!(game.ctx.actor(Blue).unwrap().board.marks_by(Green), 1);
    }

    #[test]
    fn double_kill_earns_a_bonus() {
        let mut game = started(GameConfig::default());
        wound(&mut game, Green, Yellow, 11);
        wound(&mut game, Blue, Yellow, 11);
        game.handle(&ActionEnvelope::pass(Yellow)).unwrap();

        // Two boards at 8 + 1 each, plus the bonus.
        assert_eq!(game.ctx.actor(Yellow).unwrap().points, 19);
    }

    #[test]
    fn disconnected_dead_player_is_respawned_at_once() {
        let mut game = started(GameConfig::default());
        game.disconnect(Green).unwrap();
        wound(&mut game, Green, Yellow, 11);
        game.handle(&ActionEnvelope::pass(Yellow)).unwrap();

        assert!(game.ctx.turns.dying().is_empty());
        assert!(game.ctx.position_of(Green).is_some());
        // Green's turn is skipped.
        assert_eq!(game.turn_owner(), Some(Blue));
    }

    #[test]
    fn last_skull_starts_final_frenzy_and_the_game_ends() {
        let mut game = started(GameConfig::default());
        game.ctx.kill_shots = KillShotTrack::new(1);
        wound(&mut game, Green, Yellow, 11);
        game.handle(&ActionEnvelope::pass(Yellow)).unwrap();

        assert_eq!(game.status(), GameStatus::FinalFrenzy);
        assert_eq!(game.ctx.turns.frenzy_mode(Green), Some(FrenzyMode::Double));
        assert_eq!(game.ctx.turns.frenzy_mode(Blue), Some(FrenzyMode::Double));
        assert_eq!(game.ctx.turns.frenzy_mode(Yellow), None);
        // Undamaged boards turn to the frenzy side.
        assert!(game.ctx.actor(Blue).unwrap().board.is_flipped());

        game.handle(&spawn(Green)).unwrap();
        assert_eq!(game.turn_owner(), Some(Green));
        game.handle(&ActionEnvelope::pass(Green)).unwrap();
        game.handle(&spawn(Blue)).unwrap();
        game.handle(&ActionEnvelope::pass(Blue)).unwrap();

        assert_eq!(game.status(), GameStatus::Ended);
        let standings = game.standings();
        assert_eq!(standings.len(), 3);
        assert_eq!(standings[0].color, Yellow);
        // Board 9 and a lone kill-track token 8.
        assert_eq!(standings[0].points, 17);
        assert!(game.handle(&ActionEnvelope::pass(Green)).is_err());
    }

    #[test]
    fn without_frenzy_the_last_skull_ends_the_game() {
        let mut game = started(GameConfig::default().with_final_frenzy(false));
        game.ctx.kill_shots = KillShotTrack::new(1);
        wound(&mut game, Green, Yellow, 11);
        game.handle(&ActionEnvelope::pass(Yellow)).unwrap();

        assert_eq!(game.status(), GameStatus::Ended);
        assert!(!game.is_running());
    }

    #[test]
    fn dead_terminator_respawns_immediately() {
        let mut game = started(GameConfig::default().with_terminator(true));
        let terminator = game.ctx.terminator_color().unwrap();
        wound(&mut game, terminator, Yellow, 11);
        // Passing is not offered before the Terminator has acted.
        game.finish_turn().unwrap();

        let spawn = game.ctx.map.spawn_of(game.ctx.config.terminator_spawn);
        assert_eq!(game.ctx.position_of(terminator), spawn);
        assert!(game.ctx.turns.dying().is_empty());
        assert_eq!(game.turn_owner(), Some(Green));
    }
}
