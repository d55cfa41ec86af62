//! Declarative weapon effects.
//!
//! An [`Effect`] is a property map checked by the targeting validator, a cost,
//! and an ordered list of [`EffectStep`]s. Movement requested by the player is
//! spliced into that list by [`Effect::plan`], and the resulting list is run by
//! [`apply_effect`], the single interpreter for every weapon.

use crate::config::GameConfig;
use crate::state::{AmmoColor, AmmoQuantity, GameContext, PlayerColor, PlayerPosition, RoomColor};

// ============================================================================
// Property map
// ============================================================================

/// What kind of argument an effect is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    Player,
    Square,
    Room,
}

/// Constraints an invocation must satisfy. `None`/`false` means unchecked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectProperties {
    /// Exact distance between the shooter and every target.
    pub distance: Option<u32>,
    pub min_distance: Option<u32>,
    pub max_distance: Option<u32>,
    /// `Some(true)`: every target visible. `Some(false)`: none visible.
    pub visible: Option<bool>,
    /// Each target visible from the previous one, the shooter being first.
    pub concatenated_visible: bool,
    /// All targets in one compass direction from the shooter.
    pub inline: bool,
    /// Exact number of targets.
    pub target_num: Option<usize>,
    pub max_target_num: Option<usize>,
    /// Exact length of the optional shooter move.
    pub move_shooter: Option<u32>,
    /// Upper bound on the shooter move; a move must cover at least one step.
    pub max_move_shooter: Option<u32>,
    /// Exact length of each target move.
    pub move_target: Option<u32>,
    pub max_move_target: Option<u32>,
    /// Target moves must follow a compass direction.
    pub move_inline: bool,
    /// The shooter must end on the last target's square.
    pub move_to_last_target: bool,
    /// All targets stand on one square.
    pub same_position: bool,
    /// No two targets share a square.
    pub different_positions: bool,
    /// The n-th target stands exactly n squares from the shooter.
    pub stepped: bool,
    /// Square effects only: between one and this many listed players are
    /// pulled onto the chosen square.
    pub pull_onto_square: Option<usize>,
    /// The shooter may list itself as a target.
    pub allow_self: bool,
}

impl EffectProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn min_distance(mut self, distance: u32) -> Self {
        self.min_distance = Some(distance);
        self
    }

    pub fn max_distance(mut self, distance: u32) -> Self {
        self.max_distance = Some(distance);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn concatenated_visible(mut self) -> Self {
        self.concatenated_visible = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn target_num(mut self, count: usize) -> Self {
        self.target_num = Some(count);
        self
    }

    pub fn max_target_num(mut self, count: usize) -> Self {
        self.max_target_num = Some(count);
        self
    }

    pub fn move_shooter(mut self, distance: u32) -> Self {
        self.move_shooter = Some(distance);
        self
    }

    pub fn max_move_shooter(mut self, distance: u32) -> Self {
        self.max_move_shooter = Some(distance);
        self
    }

    pub fn move_target(mut self, distance: u32) -> Self {
        self.move_target = Some(distance);
        self
    }

    pub fn max_move_target(mut self, distance: u32) -> Self {
        self.max_move_target = Some(distance);
        self
    }

    pub fn move_inline(mut self) -> Self {
        self.move_inline = true;
        self
    }

    pub fn move_to_last_target(mut self) -> Self {
        self.move_to_last_target = true;
        self
    }

    pub fn same_position(mut self) -> Self {
        self.same_position = true;
        self
    }

    pub fn different_positions(mut self) -> Self {
        self.different_positions = true;
        self
    }

    pub fn stepped(mut self) -> Self {
        self.stepped = true;
        self
    }

    pub fn pull_onto_square(mut self, max_players: usize) -> Self {
        self.pull_onto_square = Some(max_players);
        self
    }

    pub fn allow_self(mut self) -> Self {
        self.allow_self = true;
        self
    }
}

// ============================================================================
// Steps
// ============================================================================

/// Which actors a step hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSelector {
    /// Every listed player target.
    AllTargets,
    /// The listed player target at this index, skipped if absent.
    Target(usize),
    /// The listed player target at this index, plus everyone but the shooter
    /// on the square it stood on when the effect began.
    TargetSquare(usize),
    /// Everyone but the shooter standing on a listed square.
    SquareOccupants,
    /// Everyone but the shooter standing on the listed square at this index.
    SquareOccupantsAt(usize),
    /// Everyone but the shooter standing in the chosen room.
    RoomOccupants,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectStep {
    Damage { to: TargetSelector, amount: u8 },
    Mark { to: TargetSelector, amount: u8 },
    MoveShooter,
    MoveTargets,
}

impl EffectStep {
    pub const fn damage(to: TargetSelector, amount: u8) -> Self {
        Self::Damage { to, amount }
    }

    pub const fn mark(to: TargetSelector, amount: u8) -> Self {
        Self::Mark { to, amount }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub name: String,
    pub cost: Vec<AmmoColor>,
    pub target_kind: TargetKind,
    pub properties: EffectProperties,
    pub steps: Vec<EffectStep>,
}

impl Effect {
    pub fn new(name: impl Into<String>, target_kind: TargetKind) -> Self {
        Self {
            name: name.into(),
            cost: Vec::new(),
            target_kind,
            properties: EffectProperties::default(),
            steps: Vec::new(),
        }
    }

    pub fn cost(mut self, cost: &[AmmoColor]) -> Self {
        self.cost = cost.to_vec();
        self
    }

    pub fn properties(mut self, properties: EffectProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn step(mut self, step: EffectStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn cost_quantity(&self) -> AmmoQuantity {
        AmmoQuantity::from_colors(&self.cost)
    }

    /// Orders the effect's own steps together with the moves requested in
    /// `target`: a requested move runs before the damage when its
    /// "first" flag is set and after it otherwise.
    pub fn plan(&self, target: &Target) -> Vec<EffectStep> {
        let shooter_moves = target.shooter_move.is_some();
        let targets_move = target.target_moves.iter().any(Option::is_some);

        let mut plan = Vec::with_capacity(self.steps.len() + 2);
        if shooter_moves && target.shooter_moves_first {
            plan.push(EffectStep::MoveShooter);
        }
        if targets_move && target.targets_move_first {
            plan.push(EffectStep::MoveTargets);
        }
        plan.extend(self.steps.iter().copied());
        if shooter_moves && !target.shooter_moves_first {
            plan.push(EffectStep::MoveShooter);
        }
        if targets_move && !target.targets_move_first {
            plan.push(EffectStep::MoveTargets);
        }
        plan
    }
}

// ============================================================================
// Resolved invocation
// ============================================================================

/// Arguments of one effect invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub players: Vec<PlayerColor>,
    pub squares: Vec<PlayerPosition>,
    pub room: Option<RoomColor>,
    pub shooter_move: Option<PlayerPosition>,
    pub shooter_moves_first: bool,
    /// Destinations aligned with `players`; `None` leaves a target in place.
    pub target_moves: Vec<Option<PlayerPosition>>,
    pub targets_move_first: bool,
}

impl Target {
    pub fn players(players: impl IntoIterator<Item = PlayerColor>) -> Self {
        Self {
            players: players.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn squares(squares: impl IntoIterator<Item = PlayerPosition>) -> Self {
        Self {
            squares: squares.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn room(room: RoomColor) -> Self {
        Self {
            room: Some(room),
            ..Self::default()
        }
    }

    pub fn target_move(&self, index: usize) -> Option<PlayerPosition> {
        self.target_moves.get(index).copied().flatten()
    }
}

/// Players hit by an effect, in the order they were first damaged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectReport {
    pub damaged: Vec<PlayerColor>,
    pub marked: Vec<PlayerColor>,
}

impl EffectReport {
    fn record(list: &mut Vec<PlayerColor>, color: PlayerColor) {
        if !list.contains(&color) {
            list.push(color);
        }
    }
}

// ============================================================================
// Interpreter
// ============================================================================

fn occupants(
    ctx: &GameContext,
    shooter: PlayerColor,
    on: impl Fn(PlayerPosition) -> bool,
) -> Vec<PlayerColor> {
    ctx.actors()
        .filter(|actor| actor.color != shooter)
        .filter(|actor| actor.position.is_some_and(&on))
        .map(|actor| actor.color)
        .collect()
}

fn select(
    ctx: &GameContext,
    shooter: PlayerColor,
    selector: TargetSelector,
    target: &Target,
    starts: &[Option<PlayerPosition>],
) -> Vec<PlayerColor> {
    match selector {
        TargetSelector::AllTargets => target.players.clone(),
        TargetSelector::Target(index) => target.players.get(index).copied().into_iter().collect(),
        TargetSelector::TargetSquare(index) => {
            let Some(&listed) = target.players.get(index) else {
                return Vec::new();
            };
            let mut hit = vec![listed];
            if let Some(start) = starts.get(index).copied().flatten() {
                hit.extend(
                    occupants(ctx, shooter, |position| position == start)
                        .into_iter()
                        .filter(|&color| color != listed),
                );
            }
            hit
        }
        TargetSelector::SquareOccupants => {
            occupants(ctx, shooter, |position| target.squares.contains(&position))
        }
        TargetSelector::SquareOccupantsAt(index) => match target.squares.get(index) {
            Some(&square) => occupants(ctx, shooter, |position| position == square),
            None => Vec::new(),
        },
        TargetSelector::RoomOccupants => occupants(ctx, shooter, |position| {
            target.room.is_some() && ctx.map.room_of(position) == target.room
        }),
    }
}

/// Runs the planned steps of `effect` for `shooter` against `target`.
///
/// Validation is the caller's job. Marks stop at three per dealer on each
/// victim; damage past twelve is dropped by the board.
pub fn apply_effect(
    ctx: &mut GameContext,
    shooter: PlayerColor,
    effect: &Effect,
    target: &Target,
) -> EffectReport {
    let mut report = EffectReport::default();
    let starts: Vec<_> = target
        .players
        .iter()
        .map(|&color| ctx.actor(color).and_then(|actor| actor.position))
        .collect();

    for step in effect.plan(target) {
        match step {
            EffectStep::Damage { to, amount } => {
                for victim in select(ctx, shooter, to, target, &starts) {
                    if let Some(actor) = ctx.actor_mut(victim) {
                        actor.board.add_damage(shooter, amount);
                        EffectReport::record(&mut report.damaged, victim);
                    }
                }
            }
            EffectStep::Mark { to, amount } => {
                for victim in select(ctx, shooter, to, target, &starts) {
                    if let Some(actor) = ctx.actor_mut(victim) {
                        let held = actor.board.marks_by(shooter);
                        let room = GameConfig::MAX_MARKS_PER_DEALER.saturating_sub(held);
                        let placed = usize::from(amount).min(room);
                        actor.board.add_mark(shooter, placed as u8);
                        EffectReport::record(&mut report.marked, victim);
                    }
                }
            }
            EffectStep::MoveShooter => {
                if let (Some(destination), Some(actor)) =
                    (target.shooter_move, ctx.actor_mut(shooter))
                {
                    actor.position = Some(destination);
                }
            }
            EffectStep::MoveTargets => {
                for (index, &victim) in target.players.iter().enumerate() {
                    if let (Some(destination), Some(actor)) =
                        (target.target_move(index), ctx.actor_mut(victim))
                    {
                        actor.position = Some(destination);
                    }
                }
            }
        }
    }

    report
}
