//! Action domain.
//!
//! - `effect`: declarative weapon effects and the step interpreter
//! - `targeting`: pure predicates over one effect invocation
//! - `error`: rejections vs structural errors
//! - `request`: the envelope a front-end submits
//! - one module per verb implementing [`ActionTransition`]
//!
//! [`possible_actions`] derives the offered verbs from the turn state on
//! demand; nothing caches it.

pub mod effect;
pub mod error;
pub mod payment;
pub mod request;
pub mod targeting;

mod movement;
mod pick;
mod powerup;
mod reload;
mod shoot;
mod spawn;
mod terminator;

pub use effect::{
    Effect, EffectProperties, EffectReport, EffectStep, Target, TargetKind, TargetSelector,
    apply_effect,
};
pub use error::{ActionError, InvalidReason, Rejection, StructuralError};
pub use movement::MoveAction;
pub use payment::{Payment, PaymentPlan, plan_payment};
pub use pick::{PickAction, PickRequest};
pub use powerup::{PowerupAction, PowerupRequest};
pub use reload::{ReloadAction, ReloadRequest};
pub use request::{ActionEnvelope, ActionRequest};
pub use shoot::{ScopePayment, ScopeRequest, ShootAction, ShootRequest};
pub use spawn::{SpawnAction, SpawnRequest};
pub use targeting::{TargetCheck, TargetRequest, validate_target};
pub use terminator::{TerminatorAction, TerminatorRequest};

use crate::state::{
    Adrenaline, FrenzyMode, GameContext, PhaseState, PlayerColor, PlayerPosition,
};

// ============================================================================
// Action kinds
// ============================================================================

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Spawn,
    Move,
    MoveAndPick,
    Shoot,
    AdrenalinePick,
    AdrenalineShoot,
    FrenzyMove,
    FrenzyPick,
    FrenzyShoot,
    LightFrenzyPick,
    LightFrenzyShoot,
    Reload,
    Powerup,
    TerminatorAction,
    PassTurn,
}

impl ActionKind {
    /// Inclusive bounds on the squares moved by this action, if it moves.
    pub const fn movement_bounds(self) -> Option<(u32, u32)> {
        match self {
            Self::Move => Some((1, 3)),
            Self::FrenzyMove => Some((1, 4)),
            Self::MoveAndPick => Some((0, 1)),
            Self::AdrenalinePick | Self::FrenzyPick => Some((0, 2)),
            Self::LightFrenzyPick => Some((0, 3)),
            Self::Shoot => Some((0, 0)),
            Self::AdrenalineShoot | Self::FrenzyShoot => Some((0, 1)),
            Self::LightFrenzyShoot => Some((0, 2)),
            Self::Spawn | Self::Reload | Self::Powerup | Self::TerminatorAction | Self::PassTurn => {
                None
            }
        }
    }

    pub const fn is_move(self) -> bool {
        matches!(self, Self::Move | Self::FrenzyMove)
    }

    pub const fn is_pick(self) -> bool {
        matches!(
            self,
            Self::MoveAndPick | Self::AdrenalinePick | Self::FrenzyPick | Self::LightFrenzyPick
        )
    }

    pub const fn is_shoot(self) -> bool {
        matches!(
            self,
            Self::Shoot | Self::AdrenalineShoot | Self::FrenzyShoot | Self::LightFrenzyShoot
        )
    }

    /// Frenzy shots may bundle a reload before firing.
    pub const fn allows_bundled_reload(self) -> bool {
        matches!(self, Self::FrenzyShoot | Self::LightFrenzyShoot)
    }

    /// Whether this kind fills one of the owner's action slots.
    pub const fn uses_action_slot(self) -> bool {
        self.is_move() || self.is_pick() || self.is_shoot()
    }

    pub const fn flag(self) -> ActionSet {
        match self {
            Self::Spawn => ActionSet::SPAWN,
            Self::Move => ActionSet::MOVE,
            Self::MoveAndPick => ActionSet::MOVE_AND_PICK,
            Self::Shoot => ActionSet::SHOOT,
            Self::AdrenalinePick => ActionSet::ADRENALINE_PICK,
            Self::AdrenalineShoot => ActionSet::ADRENALINE_SHOOT,
            Self::FrenzyMove => ActionSet::FRENZY_MOVE,
            Self::FrenzyPick => ActionSet::FRENZY_PICK,
            Self::FrenzyShoot => ActionSet::FRENZY_SHOOT,
            Self::LightFrenzyPick => ActionSet::LIGHT_FRENZY_PICK,
            Self::LightFrenzyShoot => ActionSet::LIGHT_FRENZY_SHOOT,
            Self::Reload => ActionSet::RELOAD,
            Self::Powerup => ActionSet::POWERUP,
            Self::TerminatorAction => ActionSet::TERMINATOR_ACTION,
            Self::PassTurn => ActionSet::PASS_TURN,
        }
    }
}

bitflags::bitflags! {
    /// Set of offered [`ActionKind`]s.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionSet: u16 {
        const SPAWN              = 1 << 0;
        const MOVE               = 1 << 1;
        const MOVE_AND_PICK      = 1 << 2;
        const SHOOT              = 1 << 3;
        const ADRENALINE_PICK    = 1 << 4;
        const ADRENALINE_SHOOT   = 1 << 5;
        const FRENZY_MOVE        = 1 << 6;
        const FRENZY_PICK        = 1 << 7;
        const FRENZY_SHOOT       = 1 << 8;
        const LIGHT_FRENZY_PICK  = 1 << 9;
        const LIGHT_FRENZY_SHOOT = 1 << 10;
        const RELOAD             = 1 << 11;
        const POWERUP            = 1 << 12;
        const TERMINATOR_ACTION  = 1 << 13;
        const PASS_TURN          = 1 << 14;
    }
}

impl ActionSet {
    pub fn has(&self, kind: ActionKind) -> bool {
        self.contains(kind.flag())
    }
}

// ============================================================================
// Offered actions
// ============================================================================

/// Everything [`possible_actions`] looks at for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionContext {
    pub running: bool,
    /// The owner's turn is over and killed players are choosing where to
    /// respawn.
    pub respawning: bool,
    /// The player asking is the turn owner.
    pub is_owner: bool,
    pub phase: PhaseState,
    /// Action slot open in this phase (1 or 2).
    pub open_slot: Option<u8>,
    pub adrenaline: Adrenaline,
    pub frenzy: Option<FrenzyMode>,
    pub terminator_present: bool,
    pub terminator_moved: bool,
    /// The phase has a slot where the Terminator may act.
    pub terminator_slot: bool,
    pub can_reload: bool,
    /// Holds a Newton or a Teleporter.
    pub has_turn_powerup: bool,
    /// Not the owner, damaged by the owner this turn, holding a tagback grenade.
    pub tagback_eligible: bool,
}

impl ActionContext {
    /// Builds the context of `color` from the live game.
    pub fn of(ctx: &GameContext, color: PlayerColor, running: bool) -> Option<Self> {
        use crate::cards::PowerupKind;

        let player = ctx.player(color)?;
        let owner = ctx.turn_owner();
        let is_owner = owner == Some(color);

        let tagback_eligible = !is_owner
            && player.hand.has_powerup(PowerupKind::TagbackGrenade)
            && ctx.turns.damaged().contains(&color)
            && player.actor.is_spawned()
            && owner
                .and_then(|owner| ctx.position_of(owner))
                .zip(player.actor.position)
                .is_some_and(|(owner, own)| ctx.map.is_visible(own, owner));

        Some(Self {
            running,
            respawning: !ctx.turns.dying().is_empty(),
            is_owner,
            phase: player.phase(),
            open_slot: player.round.open_action_slot(),
            adrenaline: player.actor.board.adrenaline(),
            frenzy: ctx.turns.frenzy_mode(color),
            terminator_present: ctx.terminator_present(),
            terminator_moved: player.round.terminator_moved(),
            terminator_slot: player.round.terminator_slot_open(),
            can_reload: player.round.can_reload(),
            has_turn_powerup: player.hand.has_powerup(PowerupKind::Newton)
                || player.hand.has_powerup(PowerupKind::Teleporter),
            tagback_eligible,
        })
    }

    fn terminator_pending(&self) -> bool {
        self.terminator_present && !self.terminator_moved
    }
}

fn regular_actions(adrenaline: Adrenaline, frenzy: Option<FrenzyMode>) -> ActionSet {
    match frenzy {
        Some(FrenzyMode::Double) => {
            ActionSet::FRENZY_MOVE | ActionSet::FRENZY_PICK | ActionSet::FRENZY_SHOOT
        }
        Some(FrenzyMode::Light) => ActionSet::LIGHT_FRENZY_PICK | ActionSet::LIGHT_FRENZY_SHOOT,
        None => {
            let pick = match adrenaline {
                Adrenaline::None => ActionSet::MOVE_AND_PICK,
                Adrenaline::Pick | Adrenaline::Shoot => ActionSet::ADRENALINE_PICK,
            };
            let shoot = match adrenaline {
                Adrenaline::Shoot => ActionSet::ADRENALINE_SHOOT,
                Adrenaline::None | Adrenaline::Pick => ActionSet::SHOOT,
            };
            ActionSet::MOVE | pick | shoot
        }
    }
}

/// Actions offered to one player right now.
pub fn possible_actions(ctx: &ActionContext) -> ActionSet {
    if !ctx.running {
        return ActionSet::empty();
    }

    if ctx.respawning {
        return if ctx.phase == PhaseState::Dead {
            ActionSet::SPAWN
        } else {
            ActionSet::empty()
        };
    }

    if !ctx.is_owner {
        let mut set = ActionSet::empty();
        if ctx.phase == PhaseState::Dead {
            set |= ActionSet::SPAWN;
        }
        if ctx.tagback_eligible {
            set |= ActionSet::POWERUP;
        }
        return set;
    }

    if matches!(ctx.phase, PhaseState::Spawn | PhaseState::Dead) {
        return ActionSet::SPAWN;
    }

    let mut set = ActionSet::empty();
    if ctx.open_slot.is_some() {
        set |= regular_actions(ctx.adrenaline, ctx.frenzy);
    }

    if ctx.terminator_pending() {
        if ctx.terminator_slot {
            set |= ActionSet::TERMINATOR_ACTION;
        }
    } else {
        if ctx.can_reload && ctx.frenzy.is_none() {
            set |= ActionSet::RELOAD;
        }
        set |= ActionSet::PASS_TURN;
    }

    if ctx.has_turn_powerup {
        set |= ActionSet::POWERUP;
    }

    set
}

// ============================================================================
// Transition trait
// ============================================================================

/// One verb: validated against the context, then applied to it.
///
/// `validate` fully predicts `execute`. A rejected `execute` leaves the
/// context untouched, so a shot with an uncharged weapon keeps its shooter on
/// the starting square.
pub trait ActionTransition {
    type Output;

    fn actor(&self) -> PlayerColor;

    fn kind(&self) -> ActionKind;

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError>;

    fn execute(&self, ctx: &mut GameContext) -> Result<Self::Output, ActionError>;
}

/// Checks a move of `kind` from `from` to `to` against its bounds.
pub(crate) fn check_movement(
    ctx: &GameContext,
    kind: ActionKind,
    from: PlayerPosition,
    to: PlayerPosition,
) -> Result<(), ActionError> {
    let (min, max) = kind.movement_bounds().unwrap_or((0, 0));
    if !ctx.map.contains(to) {
        return Err(Rejection::OutOfMap(to).into());
    }
    let distance = ctx
        .map
        .movement_cost(ctx.config.movement, from, to)
        .ok_or(InvalidReason::Unreachable)?;
    if distance < min || distance > max {
        return Err(InvalidReason::MovementOutOfRange { distance, min, max }.into());
    }
    Ok(())
}

/// Current square of a spawned actor.
pub(crate) fn spawned_position(
    ctx: &GameContext,
    color: PlayerColor,
) -> Result<PlayerPosition, ActionError> {
    let actor = ctx
        .actor(color)
        .ok_or(StructuralError::UnknownPlayer(color))?;
    actor
        .position
        .ok_or_else(|| InvalidReason::NotSpawned.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(phase: PhaseState, open_slot: Option<u8>) -> ActionContext {
        ActionContext {
            running: true,
            respawning: false,
            is_owner: true,
            phase,
            open_slot,
            adrenaline: Adrenaline::None,
            frenzy: None,
            terminator_present: false,
            terminator_moved: false,
            terminator_slot: true,
            can_reload: false,
            has_turn_powerup: false,
            tagback_eligible: false,
        }
    }

    #[test]
    fn nothing_is_offered_outside_a_running_game() {
        let mut ctx = owner(PhaseState::Begin, Some(1));
        ctx.running = false;
        assert!(possible_actions(&ctx).is_empty());
    }

    #[test]
    fn spawning_player_may_only_spawn() {
        assert_eq!(
            possible_actions(&owner(PhaseState::Spawn, None)),
            ActionSet::SPAWN
        );
    }

    #[test]
    fn adrenaline_upgrades_pick_and_shoot() {
        let mut ctx = owner(PhaseState::Begin, Some(1));
        ctx.adrenaline = Adrenaline::Shoot;
        let set = possible_actions(&ctx);
        assert!(set.has(ActionKind::AdrenalinePick));
        assert!(set.has(ActionKind::AdrenalineShoot));
        assert!(!set.has(ActionKind::Shoot));
        assert!(!set.has(ActionKind::MoveAndPick));
    }

    #[test]
    fn pending_terminator_blocks_passing() {
        let mut ctx = owner(PhaseState::SecondAction, None);
        ctx.terminator_present = true;
        ctx.can_reload = true;
        let set = possible_actions(&ctx);
        assert_eq!(set, ActionSet::TERMINATOR_ACTION);

        ctx.terminator_moved = true;
        ctx.terminator_slot = false;
        let set = possible_actions(&ctx);
        assert!(set.has(ActionKind::Reload));
        assert!(set.has(ActionKind::PassTurn));
        assert!(!set.has(ActionKind::TerminatorAction));
    }

    #[test]
    fn frenzy_sets_replace_regular_actions() {
        let mut ctx = owner(PhaseState::Begin, Some(1));
        ctx.frenzy = Some(FrenzyMode::Light);
        assert_eq!(
            possible_actions(&ctx) & !(ActionSet::PASS_TURN),
            ActionSet::LIGHT_FRENZY_PICK | ActionSet::LIGHT_FRENZY_SHOOT
        );
    }

    #[test]
    fn bystanders_get_spawn_or_tagback_only() {
        let mut ctx = owner(PhaseState::Dead, None);
        ctx.is_owner = false;
        assert_eq!(possible_actions(&ctx), ActionSet::SPAWN);

        ctx.phase = PhaseState::Begin;
        ctx.tagback_eligible = true;
        assert_eq!(possible_actions(&ctx), ActionSet::POWERUP);
    }

    #[test]
    fn only_the_dead_act_while_respawning() {
        let mut ctx = owner(PhaseState::Begin, Some(1));
        ctx.respawning = true;
        assert!(possible_actions(&ctx).is_empty());

        ctx.is_owner = false;
        ctx.phase = PhaseState::Dead;
        assert_eq!(possible_actions(&ctx), ActionSet::SPAWN);
    }

    #[test]
    fn movement_bounds_per_kind() {
        assert_eq!(ActionKind::Move.movement_bounds(), Some((1, 3)));
        assert_eq!(ActionKind::Shoot.movement_bounds(), Some((0, 0)));
        assert_eq!(ActionKind::LightFrenzyPick.movement_bounds(), Some((0, 3)));
        assert_eq!(ActionKind::Reload.movement_bounds(), None);
    }
}
