//! Action errors.
//!
//! Two disjoint families: [`Rejection`] for requests a player may legally
//! send but that the rules refuse, and [`StructuralError`] for requests that
//! could never have been offered (caller bugs).

use crate::cards::WeaponError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{AmmoError, PlayerColor, PlayerPosition};

use super::ActionKind;
use super::targeting::TargetCheck;

// ============================================================================
// Gameplay rejections
// ============================================================================

/// Why an otherwise well-formed action is illegal right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidReason {
    #[error("{0}")]
    Targeting(TargetCheck),

    #[error("moving {distance} squares is outside {min}..={max}")]
    MovementOutOfRange { distance: u32, min: u32, max: u32 },

    #[error("destination cannot be reached")]
    Unreachable,

    #[error("no ammo tile on this square")]
    NoAmmoTile,

    #[error("this square does not sell weapons")]
    NotASpawnSquare,

    #[error("arguments do not fit the square kind")]
    WrongSquareKind,

    #[error("no weapon in that slot")]
    NothingToPick,

    #[error("a discard is only allowed with a full hand")]
    UnneededDiscard,

    #[error("a powerup was offered as payment but is not needed")]
    Overpayment,

    #[error("player is not on the board")]
    NotSpawned,

    #[error("player is already on the board")]
    AlreadySpawned,

    #[error("target is not visible")]
    TargetNotVisible,

    #[error("a visible target must be chosen")]
    VisibleTargetIgnored,

    #[error("the terminator cannot target itself")]
    SelfTarget,

    #[error("there is no terminator in this game")]
    NoTerminator,

    #[error("powerup cannot be used this way")]
    WrongPowerup,

    #[error("targeting scope can only be used while shooting")]
    ScopeOutsideShoot,

    #[error("targeting scope target was not hit by this shot")]
    ScopeTargetNotHit,

    #[error("player was not damaged by the turn owner this turn")]
    NotDamaged,

    #[error("destination is not in line with the target")]
    NotAligned,
}

/// Gameplay rejection returned to the requesting player.
///
/// The game state is unchanged when one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("invalid action: {0}")]
    InvalidAction(InvalidReason),

    #[error(transparent)]
    NotEnoughAmmo(#[from] AmmoError),

    #[error("weapon not charged")]
    WeaponNotCharged,

    #[error("weapon already charged")]
    WeaponAlreadyCharged,

    #[error("hand already holds the maximum number of cards")]
    MaxCardsInHand,

    #[error("position {0} is outside the map")]
    OutOfMap(PlayerPosition),

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerColor),

    #[error("action {0} is not available now")]
    ActionNotAvailable(ActionKind),

    #[error("game is not running")]
    GameNotRunning,
}

impl From<InvalidReason> for Rejection {
    fn from(reason: InvalidReason) -> Self {
        Self::InvalidAction(reason)
    }
}

impl From<TargetCheck> for Rejection {
    fn from(check: TargetCheck) -> Self {
        Self::InvalidAction(InvalidReason::Targeting(check))
    }
}

impl From<WeaponError> for Rejection {
    fn from(error: WeaponError) -> Self {
        match error {
            WeaponError::NotCharged => Self::WeaponNotCharged,
            WeaponError::AlreadyCharged => Self::WeaponAlreadyCharged,
        }
    }
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotYourTurn(_) | Self::ActionNotAvailable(_) | Self::GameNotRunning => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAction(_) => "INVALID_ACTION",
            Self::NotEnoughAmmo(_) => "NOT_ENOUGH_AMMO",
            Self::WeaponNotCharged => "WEAPON_NOT_CHARGED",
            Self::WeaponAlreadyCharged => "WEAPON_ALREADY_CHARGED",
            Self::MaxCardsInHand => "MAX_CARDS_IN_HAND",
            Self::OutOfMap(_) => "OUT_OF_MAP",
            Self::NotYourTurn(_) => "NOT_YOUR_TURN",
            Self::ActionNotAvailable(_) => "ACTION_NOT_AVAILABLE",
            Self::GameNotRunning => "GAME_NOT_RUNNING",
        }
    }
}

// ============================================================================
// Structural errors
// ============================================================================

/// A request that no front-end following the offered actions could build.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuralError {
    #[error("payload for {got} does not fit action kind {expected}")]
    IncompatibleAction { expected: ActionKind, got: ActionKind },

    #[error("hand index {index} out of bounds (len {len})")]
    HandIndexOutOfBounds { index: usize, len: usize },

    #[error("effect index {index} out of bounds (len {len})")]
    EffectIndexOutOfBounds { index: usize, len: usize },

    #[error("duplicate hand index {0}")]
    DuplicateIndex(usize),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerColor),

    #[error("no spawn slot for a dropped weapon at {0}")]
    NoRoomForWeapon(PlayerPosition),
}

impl GameError for StructuralError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IncompatibleAction { .. } => "INCOMPATIBLE_ACTION",
            Self::HandIndexOutOfBounds { .. } => "HAND_INDEX_OUT_OF_BOUNDS",
            Self::EffectIndexOutOfBounds { .. } => "EFFECT_INDEX_OUT_OF_BOUNDS",
            Self::DuplicateIndex(_) => "DUPLICATE_INDEX",
            Self::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            Self::NoRoomForWeapon(_) => "NO_ROOM_FOR_WEAPON",
        }
    }
}

// ============================================================================
// Combined
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl ActionError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Structural(_) => None,
        }
    }
}

impl From<InvalidReason> for ActionError {
    fn from(reason: InvalidReason) -> Self {
        Self::Rejected(reason.into())
    }
}

impl From<TargetCheck> for ActionError {
    fn from(check: TargetCheck) -> Self {
        Self::Rejected(check.into())
    }
}

impl From<AmmoError> for ActionError {
    fn from(error: AmmoError) -> Self {
        Self::Rejected(error.into())
    }
}

impl From<WeaponError> for ActionError {
    fn from(error: WeaponError) -> Self {
        Self::Rejected(error.into())
    }
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(rejection) => rejection.severity(),
            Self::Structural(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.error_code(),
            Self::Structural(error) => error.error_code(),
        }
    }
}
