use super::PlayerColor;

/// Action set granted to a player during final frenzy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrenzyMode {
    /// Players after the activator and before the first player: two actions.
    Double,
    /// The first player and those following it up to the activator: one action.
    Light,
}

/// Turn order and the cross-turn bookkeeping of a game.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnManager {
    order: Vec<PlayerColor>,
    current: usize,
    turn_count: u32,
    last_player: Option<PlayerColor>,
    frenzy_activator: Option<PlayerColor>,
    before_frenzy: Vec<PlayerColor>,
    after_frenzy: Vec<PlayerColor>,
    damaged: Vec<PlayerColor>,
    dying: Vec<PlayerColor>,
}

impl TurnManager {
    /// The first entry of `order` is the first player.
    pub fn new(order: Vec<PlayerColor>) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn order(&self) -> &[PlayerColor] {
        &self.order
    }

    pub fn first_player(&self) -> Option<PlayerColor> {
        self.order.first().copied()
    }

    pub fn turn_owner(&self) -> Option<PlayerColor> {
        self.order.get(self.current).copied()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Hands the turn to the next player in cyclic order.
    pub fn next_turn(&mut self) -> Option<PlayerColor> {
        if self.order.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.order.len();
        self.turn_count += 1;
        self.damaged.clear();
        self.turn_owner()
    }

    pub fn last_player(&self) -> Option<PlayerColor> {
        self.last_player
    }

    pub fn frenzy_activator(&self) -> Option<PlayerColor> {
        self.frenzy_activator
    }

    pub fn before_frenzy(&self) -> &[PlayerColor] {
        &self.before_frenzy
    }

    pub fn after_frenzy(&self) -> &[PlayerColor] {
        &self.after_frenzy
    }

    pub fn is_frenzy(&self) -> bool {
        self.frenzy_activator.is_some()
    }

    /// Partitions the other players for final frenzy.
    ///
    /// Walks the order once starting after `activator`: players met before
    /// the first player comes round again get a double turn, the rest a
    /// light one. The activator's predecessor becomes the last player. Only
    /// the first call has an effect.
    pub fn set_frenzy_players(&mut self, activator: PlayerColor) -> bool {
        if self.frenzy_activator.is_some() {
            return false;
        }
        let Some(start) = self.order.iter().position(|&color| color == activator) else {
            return false;
        };

        let len = self.order.len();
        let mut first_met = false;
        for offset in 1..len {
            let color = self.order[(start + offset) % len];
            if (start + offset) % len == 0 {
                first_met = true;
            }
            if first_met {
                self.before_frenzy.push(color);
            } else {
                self.after_frenzy.push(color);
            }
        }

        self.frenzy_activator = Some(activator);
        self.last_player = Some(self.order[(start + len - 1) % len]);
        true
    }

    pub fn frenzy_mode(&self, color: PlayerColor) -> Option<FrenzyMode> {
        if self.after_frenzy.contains(&color) {
            Some(FrenzyMode::Double)
        } else if self.before_frenzy.contains(&color) {
            Some(FrenzyMode::Light)
        } else {
            None
        }
    }

    pub fn damaged(&self) -> &[PlayerColor] {
        &self.damaged
    }

    pub fn add_damaged(&mut self, color: PlayerColor) {
        if !self.damaged.contains(&color) {
            self.damaged.push(color);
        }
    }

    /// Consumes a damaged player's right to answer with a tagback grenade.
    pub fn remove_damaged(&mut self, color: PlayerColor) {
        self.damaged.retain(|&other| other != color);
    }

    pub fn dying(&self) -> &[PlayerColor] {
        &self.dying
    }

    pub fn add_dying(&mut self, color: PlayerColor) {
        if !self.dying.contains(&color) {
            self.dying.push(color);
        }
    }

    pub fn remove_dying(&mut self, color: PlayerColor) {
        self.dying.retain(|&other| other != color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [PlayerColor; 5] = [
        PlayerColor::Yellow,
        PlayerColor::Green,
        PlayerColor::Blue,
        PlayerColor::Purple,
        PlayerColor::Grey,
    ];

    #[test]
    fn next_turn_cycles_back_to_owner() {
        for players in 3..=5 {
            let mut turns = TurnManager::new(ORDER[..players].to_vec());
            let owner = turns.turn_owner();
            for _ in 0..players {
                turns.next_turn();
            }
            assert_eq!(turns.turn_owner(), owner);
            assert_eq!(turns.turn_count() as usize, players);
        }
    }

    #[test]
    fn frenzy_partition_excludes_activator() {
        let mut turns = TurnManager::new(ORDER.to_vec());
        assert!(turns.set_frenzy_players(PlayerColor::Blue));

        assert_eq!(
            turns.after_frenzy(),
            &[PlayerColor::Purple, PlayerColor::Grey]
        );
        assert_eq!(
            turns.before_frenzy(),
            &[PlayerColor::Yellow, PlayerColor::Green]
        );
        assert_eq!(turns.last_player(), Some(PlayerColor::Green));
        for color in ORDER {
            let in_after = turns.after_frenzy().contains(&color);
            let in_before = turns.before_frenzy().contains(&color);
            if color == PlayerColor::Blue {
                assert!(!in_after && !in_before);
            } else {
                assert!(in_after ^ in_before);
            }
        }
    }

    #[test]
    fn frenzy_partition_is_computed_once() {
        let mut turns = TurnManager::new(ORDER[..3].to_vec());
        assert!(turns.set_frenzy_players(PlayerColor::Yellow));
        assert!(!turns.set_frenzy_players(PlayerColor::Green));
        assert_eq!(turns.frenzy_activator(), Some(PlayerColor::Yellow));
        // Activated by the first player: everyone else plays a double turn.
        assert_eq!(
            turns.after_frenzy(),
            &[PlayerColor::Green, PlayerColor::Blue]
        );
        assert!(turns.before_frenzy().is_empty());
    }

    #[test]
    fn damaged_list_resets_every_turn() {
        let mut turns = TurnManager::new(ORDER[..3].to_vec());
        turns.add_damaged(PlayerColor::Green);
        turns.add_damaged(PlayerColor::Green);
        assert_eq!(turns.damaged(), &[PlayerColor::Green]);
        turns.next_turn();
        assert!(turns.damaged().is_empty());
    }
}
