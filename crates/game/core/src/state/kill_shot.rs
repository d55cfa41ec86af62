use super::PlayerColor;

/// One kill on the track: the killer and 1 token, or 2 for an overkill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KillToken {
    pub color: PlayerColor,
    pub count: u8,
}

/// Score curve of the kill-shot track by rank of token count.
pub const KILL_TRACK_POINTS: [u8; 4] = [8, 6, 4, 2];
/// Points for every rank past the end of the curve.
pub const KILL_TRACK_TAIL: u8 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KillShotTrack {
    skulls: u8,
    tokens: Vec<KillToken>,
}

impl KillShotTrack {
    pub fn new(skulls: u8) -> Self {
        Self {
            skulls,
            tokens: Vec::new(),
        }
    }

    pub fn skulls(&self) -> u8 {
        self.skulls
    }

    pub fn tokens(&self) -> &[KillToken] {
        &self.tokens
    }

    pub fn is_exhausted(&self) -> bool {
        self.skulls == 0
    }

    /// Records a kill, taking a skull while any are left. Kills scored once
    /// the skulls are gone (final frenzy) are still recorded.
    pub fn add_kill(&mut self, color: PlayerColor, overkill: bool) {
        self.skulls = self.skulls.saturating_sub(1);
        self.tokens.push(KillToken {
            color,
            count: if overkill { 2 } else { 1 },
        });
    }

    /// Total tokens per player, in order of each player's first token.
    pub fn totals(&self) -> Vec<(PlayerColor, u32)> {
        let mut totals: Vec<(PlayerColor, u32)> = Vec::new();
        for token in &self.tokens {
            match totals.iter_mut().find(|(color, _)| *color == token.color) {
                Some((_, total)) => *total += u32::from(token.count),
                None => totals.push((token.color, u32::from(token.count))),
            }
        }
        totals
    }
}
