//! Shared error classification for the rules crate.
//!
//! Each component keeps its own error enum next to the code that raises it
//! (`AmmoError`, `WeaponError`, `Rejection`, `SetupError`, ...). They all
//! implement [`GameError`] so that callers can tell a player's mistake from
//! a caller bug without matching on every variant.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The player may try again, possibly with other arguments.
    ///
    /// Examples: not enough ammo, target out of range
    Recoverable,

    /// The request does not fit the current turn.
    ///
    /// Examples: not your turn, action not offered
    Validation,

    /// The caller built a request that can never be valid.
    Internal,

    /// The game cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Whether the error points at a bug rather than at the player.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error enum of the rules.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable, upper-case identifier sent to clients.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
