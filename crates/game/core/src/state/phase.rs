//! Per-player round phase state machine.
//!
//! A phase names the last step completed in the current turn:
//! `FirstAction` means the first action is done and the second is pending.
//! `TerminatorInterleave(n)` means the Terminator just acted in front of
//! action slot `n` (3 being the slot after the last action).

/// Where a player stands inside its own turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseState {
    /// Waiting to choose a spawn point.
    Spawn,
    Begin,
    FirstAction,
    SecondAction,
    TerminatorInterleave(u8),
    Reload,
    End,
    Dead,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    phase: PhaseState,
    started: bool,
    terminator_moved: bool,
    actions_allowed: u8,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: PhaseState::Spawn,
            started: false,
            terminator_moved: false,
            actions_allowed: 2,
        }
    }

    pub fn phase(&self) -> PhaseState {
        self.phase
    }

    pub fn terminator_moved(&self) -> bool {
        self.terminator_moved
    }

    /// Opens the owner's turn with one or two action slots.
    pub fn start_round(&mut self, actions_allowed: u8) {
        self.started = true;
        self.terminator_moved = false;
        self.actions_allowed = actions_allowed.clamp(1, 2);
    }

    /// Closes the turn: back to `Begin`, latch cleared.
    pub fn end_round(&mut self) {
        self.started = false;
        self.terminator_moved = false;
        if self.phase != PhaseState::Dead {
            self.phase = PhaseState::Begin;
        }
    }

    pub fn kill(&mut self) {
        self.phase = PhaseState::Dead;
    }

    /// Back on the board after a death, waiting for the next turn.
    pub fn respawned(&mut self) {
        self.phase = PhaseState::Begin;
    }

    /// Advances the phase after a step of the turn.
    ///
    /// `terminator_requested` routes through a Terminator interleave slot.
    /// Returns false without changing anything when the round has not
    /// started, when the Terminator already acted this round, or when the
    /// phase has no successor.
    pub fn next_move(&mut self, terminator_requested: bool, terminator_present: bool) -> bool {
        if !self.started {
            return false;
        }
        let requested = terminator_requested && terminator_present;
        if requested && self.terminator_moved {
            return false;
        }

        let next = match (self.phase, requested) {
            (PhaseState::Spawn, false) => PhaseState::Begin,
            (PhaseState::Begin, true) => PhaseState::TerminatorInterleave(1),
            (PhaseState::Begin, false) => PhaseState::FirstAction,
            (PhaseState::TerminatorInterleave(1), false) => PhaseState::FirstAction,
            (PhaseState::FirstAction, true) if self.actions_allowed == 2 => {
                PhaseState::TerminatorInterleave(2)
            }
            (PhaseState::FirstAction, false) if self.actions_allowed == 2 => {
                PhaseState::SecondAction
            }
            (PhaseState::FirstAction, true) => PhaseState::TerminatorInterleave(3),
            (PhaseState::FirstAction, false) => PhaseState::End,
            (PhaseState::TerminatorInterleave(2), false) => PhaseState::SecondAction,
            (PhaseState::SecondAction, true) => PhaseState::TerminatorInterleave(3),
            (PhaseState::SecondAction, false) => PhaseState::End,
            (PhaseState::TerminatorInterleave(_), false) => PhaseState::End,
            (PhaseState::End, false) => PhaseState::Reload,
            _ => return false,
        };

        if requested {
            self.terminator_moved = true;
        }
        self.phase = next;
        true
    }

    /// Index of the action slot open in this phase (1 or 2), if any.
    pub fn open_action_slot(&self) -> Option<u8> {
        match self.phase {
            PhaseState::Begin | PhaseState::TerminatorInterleave(1) => Some(1),
            PhaseState::FirstAction | PhaseState::TerminatorInterleave(2)
                if self.actions_allowed == 2 =>
            {
                Some(2)
            }
            _ => None,
        }
    }

    /// Whether the Terminator may still be moved before the turn ends.
    pub fn terminator_slot_open(&self) -> bool {
        !self.terminator_moved
            && matches!(
                self.phase,
                PhaseState::Begin | PhaseState::FirstAction | PhaseState::SecondAction
            )
    }

    /// Whether reloading (and so closing the turn) is legal now.
    pub fn can_reload(&self) -> bool {
        match self.phase {
            PhaseState::SecondAction | PhaseState::TerminatorInterleave(3) | PhaseState::End => {
                true
            }
            PhaseState::FirstAction => self.actions_allowed == 1,
            _ => false,
        }
    }
}
