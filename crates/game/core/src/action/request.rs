use crate::state::{PlayerColor, PlayerPosition};

use super::{
    ActionKind, PickRequest, PowerupRequest, ReloadRequest, ShootRequest, SpawnRequest,
    TerminatorRequest,
};

/// Kind-specific payload of an action request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionRequest {
    Spawn(SpawnRequest),
    Move { destination: PlayerPosition },
    Pick(PickRequest),
    Shoot(ShootRequest),
    Reload(ReloadRequest),
    Powerup(PowerupRequest),
    Terminator(TerminatorRequest),
    Pass,
}

impl ActionRequest {
    /// Whether this payload can carry out an action of `kind`.
    pub fn accepts(&self, kind: ActionKind) -> bool {
        match self {
            Self::Spawn(_) => kind == ActionKind::Spawn,
            Self::Move { .. } => kind.is_move(),
            Self::Pick(_) => kind.is_pick(),
            Self::Shoot(_) => kind.is_shoot(),
            Self::Reload(_) => kind == ActionKind::Reload,
            Self::Powerup(_) => kind == ActionKind::Powerup,
            Self::Terminator(_) => kind == ActionKind::TerminatorAction,
            Self::Pass => kind == ActionKind::PassTurn,
        }
    }

    /// The kind this payload is most naturally sent under.
    pub fn default_kind(&self) -> ActionKind {
        match self {
            Self::Spawn(_) => ActionKind::Spawn,
            Self::Move { .. } => ActionKind::Move,
            Self::Pick(_) => ActionKind::MoveAndPick,
            Self::Shoot(_) => ActionKind::Shoot,
            Self::Reload(_) => ActionKind::Reload,
            Self::Powerup(_) => ActionKind::Powerup,
            Self::Terminator(_) => ActionKind::TerminatorAction,
            Self::Pass => ActionKind::PassTurn,
        }
    }
}

/// One command from a player: who sends it, the offered kind it was chosen
/// from, and the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionEnvelope {
    pub sender: PlayerColor,
    pub kind: ActionKind,
    pub request: ActionRequest,
}

impl ActionEnvelope {
    pub fn new(sender: PlayerColor, kind: ActionKind, request: ActionRequest) -> Self {
        Self {
            sender,
            kind,
            request,
        }
    }

    pub fn pass(sender: PlayerColor) -> Self {
        Self::new(sender, ActionKind::PassTurn, ActionRequest::Pass)
    }
}
