//! Targeting validator.
//!
//! Pure predicates checking one effect invocation against the board. Each
//! stage answers with a boolean; [`validate_target`] runs the stages in their
//! fixed order and names the first one that failed.

use std::collections::BTreeSet;

use crate::env::{GameMap, MovementRules};
use crate::state::{PlayerColor, PlayerPosition};

use super::effect::{Effect, EffectProperties, Target, TargetKind};

/// Validation stage that rejected a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetCheck {
    #[error("targets do not match the effect's target kind")]
    TargetType,

    #[error("wrong number of targets")]
    Cardinality,

    #[error("targets at the wrong distance")]
    Distance,

    #[error("targets are not positioned as required")]
    Positioning,

    #[error("visibility requirement not met")]
    Visibility,

    #[error("illegal movement")]
    Movement,
}

/// Board state seen by the validator for one invocation.
#[derive(Clone, Copy, Debug)]
pub struct TargetRequest<'a> {
    pub map: &'a GameMap,
    pub movement: MovementRules,
    pub shooter: PlayerColor,
    /// Shooter square once the action's own pre-shot move is done.
    pub origin: PlayerPosition,
    /// Every actor on the board with its current position.
    pub actors: &'a [(PlayerColor, Option<PlayerPosition>)],
    pub target: &'a Target,
}

impl TargetRequest<'_> {
    fn position_of(&self, color: PlayerColor) -> Option<PlayerPosition> {
        self.actors
            .iter()
            .find(|(other, _)| *other == color)
            .and_then(|(_, position)| *position)
    }

    /// Where the shooter stands when damage is dealt.
    pub fn shooter_position(&self) -> PlayerPosition {
        match self.target.shooter_move {
            Some(destination) if self.target.shooter_moves_first => destination,
            _ => self.origin,
        }
    }

    /// Where the shooter stands once the whole effect has resolved.
    pub fn shooter_final_position(&self) -> PlayerPosition {
        self.target.shooter_move.unwrap_or(self.origin)
    }

    /// Current squares of the listed players, `None` if one is unknown or
    /// not on the board.
    pub fn player_origins(&self) -> Option<Vec<PlayerPosition>> {
        self.target
            .players
            .iter()
            .map(|&color| self.position_of(color))
            .collect()
    }

    /// Squares of the listed players when damage is dealt.
    pub fn player_positions(&self) -> Option<Vec<PlayerPosition>> {
        let origins = self.player_origins()?;
        if !self.target.targets_move_first {
            return Some(origins);
        }
        Some(
            origins
                .into_iter()
                .enumerate()
                .map(|(index, origin)| self.target.target_move(index).unwrap_or(origin))
                .collect(),
        )
    }

    /// Positions the geometric checks run against.
    fn target_positions(&self, kind: TargetKind) -> Vec<PlayerPosition> {
        match kind {
            TargetKind::Player => self.player_positions().unwrap_or_default(),
            TargetKind::Square => self.target.squares.clone(),
            TargetKind::Room => Vec::new(),
        }
    }
}

fn all_unique<T: Ord + Copy>(items: &[T]) -> bool {
    let mut seen = BTreeSet::new();
    items.iter().all(|item| seen.insert(*item))
}

/// Listed players are distinct, on the board, and the shooter only where
/// allowed.
fn are_players_valid(props: &EffectProperties, req: &TargetRequest<'_>) -> bool {
    let target = req.target;
    !target.players.is_empty()
        && all_unique(&target.players)
        && (props.allow_self || !target.players.contains(&req.shooter))
        && target.target_moves.len() <= target.players.len()
        && req.player_origins().is_some()
}

/// Stage 1: arguments conform to the effect's target kind.
pub fn is_target_valid(kind: TargetKind, props: &EffectProperties, req: &TargetRequest<'_>) -> bool {
    let target = req.target;
    match kind {
        TargetKind::Player => {
            target.squares.is_empty() && target.room.is_none() && are_players_valid(props, req)
        }
        TargetKind::Square => {
            let squares_valid = !target.squares.is_empty()
                && target.room.is_none()
                && all_unique(&target.squares)
                && target.squares.iter().all(|&square| req.map.contains(square));
            if !squares_valid {
                return false;
            }
            match props.pull_onto_square {
                None => target.players.is_empty() && target.target_moves.is_empty(),
                Some(max) => {
                    target.squares.len() == 1
                        && target.players.len() <= max
                        && are_players_valid(props, req)
                }
            }
        }
        TargetKind::Room => {
            target.players.is_empty()
                && target.squares.is_empty()
                && target.target_moves.is_empty()
                && target
                    .room
                    .is_some_and(|room| req.map.rooms().contains(&room))
        }
    }
}

/// Stage 2: `TARGET_NUM` is exact, `MAX_TARGET_NUM` an upper bound.
pub fn is_cardinality_valid(kind: TargetKind, props: &EffectProperties, target: &Target) -> bool {
    let count = match kind {
        TargetKind::Player => target.players.len(),
        TargetKind::Square => target.squares.len(),
        TargetKind::Room => usize::from(target.room.is_some()),
    };
    props.target_num.is_none_or(|exact| count == exact)
        && props.max_target_num.is_none_or(|max| count <= max)
}

/// Every requested destination is a square of the map. Runs before any
/// distance is measured so geometry only ever sees real squares.
pub fn are_moves_on_map(req: &TargetRequest<'_>) -> bool {
    let target = req.target;
    target
        .shooter_move
        .into_iter()
        .chain(target.target_moves.iter().flatten().copied())
        .all(|destination| req.map.contains(destination))
}

/// Stage 3: numeric distance for players and squares, room (in)equality for
/// rooms.
pub fn is_distance_valid(kind: TargetKind, props: &EffectProperties, req: &TargetRequest<'_>) -> bool {
    let shooter = req.shooter_position();

    if kind == TargetKind::Room {
        let own_room = req.map.room_of(shooter);
        let same_room = req.target.room.is_some() && req.target.room == own_room;
        if props.distance == Some(0) && !same_room {
            return false;
        }
        if props.min_distance.is_some_and(|min| min > 0) && same_room {
            return false;
        }
        return true;
    }

    let positions = req.target_positions(kind);
    if props.stepped
        && !positions
            .iter()
            .zip(1u32..)
            .all(|(&position, steps)| shooter.distance_of(position) == steps)
    {
        return false;
    }

    positions.into_iter().all(|position| {
        let distance = shooter.distance_of(position);
        props.distance.is_none_or(|exact| distance == exact)
            && props.min_distance.is_none_or(|min| distance >= min)
            && props.max_distance.is_none_or(|max| distance <= max)
    })
}

/// Stage 4: `INLINE`, distinct squares and `MOVE_TO_LAST_TARGET`.
pub fn is_positioning_valid(kind: TargetKind, props: &EffectProperties, req: &TargetRequest<'_>) -> bool {
    let shooter = req.shooter_position();
    let positions = req.target_positions(kind);

    if props.inline {
        let mut direction = None;
        for &position in &positions {
            if position == shooter {
                continue;
            }
            let Ok(found) = shooter.direction_to(position) else {
                return false;
            };
            if *direction.get_or_insert(found) != found {
                return false;
            }
        }
    }

    if props.different_positions && !all_unique(&positions) {
        return false;
    }

    if props.move_to_last_target {
        let last = match kind {
            TargetKind::Player => req.player_origins().and_then(|origins| origins.last().copied()),
            TargetKind::Square => req.target.squares.last().copied(),
            TargetKind::Room => None,
        };
        if last != Some(req.shooter_final_position()) {
            return false;
        }
    }

    true
}

/// Stage 5: `VISIBLE`, `CONCATENATED_VISIBLE` and `SAME_POSITION`.
pub fn is_visibility_valid(kind: TargetKind, props: &EffectProperties, req: &TargetRequest<'_>) -> bool {
    let shooter = req.shooter_position();

    if kind == TargetKind::Room {
        let Some(room) = req.target.room else {
            return false;
        };
        return props
            .visible
            .is_none_or(|wanted| req.map.is_room_visible(shooter, room) == wanted);
    }

    let positions = req.target_positions(kind);

    if let Some(wanted) = props.visible
        && !positions
            .iter()
            .all(|&position| req.map.is_visible(shooter, position) == wanted)
    {
        return false;
    }

    if props.concatenated_visible {
        let mut previous = shooter;
        for &position in &positions {
            if !req.map.is_visible(previous, position) {
                return false;
            }
            previous = position;
        }
    }

    if props.same_position && positions.windows(2).any(|pair| pair[0] != pair[1]) {
        return false;
    }

    true
}

/// Stage 6: requested moves match the movement properties.
pub fn is_move_valid(props: &EffectProperties, req: &TargetRequest<'_>) -> bool {
    let target = req.target;

    if let Some(destination) = target.shooter_move {
        if props.move_shooter.is_none() && props.max_move_shooter.is_none() {
            return false;
        }
        let Some(cost) = req.map.movement_cost(req.movement, req.origin, destination) else {
            return false;
        };
        let fits = props.move_shooter.is_none_or(|exact| cost == exact)
            && props.max_move_shooter.is_none_or(|max| (1..=max).contains(&cost));
        if !fits {
            return false;
        }
    }

    if props.pull_onto_square.is_some() {
        let Some(&square) = target.squares.first() else {
            return false;
        };
        let pulled = target.target_moves.len() == target.players.len()
            && target.target_moves.iter().all(|&moved| moved == Some(square));
        if !pulled {
            return false;
        }
    }

    if target.target_moves.iter().all(Option::is_none) {
        return true;
    }
    if props.move_target.is_none() && props.max_move_target.is_none() {
        return false;
    }
    let Some(origins) = req.player_origins() else {
        return false;
    };

    origins.into_iter().enumerate().all(|(index, origin)| {
        let Some(destination) = target.target_move(index) else {
            return true;
        };
        let Some(cost) = req.map.movement_cost(req.movement, origin, destination) else {
            return false;
        };
        let inline = !props.move_inline
            || origin == destination
            || origin.direction_to(destination).is_ok();
        props.move_target.is_none_or(|exact| cost == exact)
            && props.max_move_target.is_none_or(|max| cost <= max)
            && inline
    })
}

/// Runs every stage in order and reports the first failing one.
pub fn validate_target(effect: &Effect, req: &TargetRequest<'_>) -> Result<(), TargetCheck> {
    let kind = effect.target_kind;
    let props = &effect.properties;

    if !is_target_valid(kind, props, req) {
        return Err(TargetCheck::TargetType);
    }
    if !is_cardinality_valid(kind, props, req.target) {
        return Err(TargetCheck::Cardinality);
    }
    if !are_moves_on_map(req) {
        return Err(TargetCheck::Movement);
    }
    if !is_distance_valid(kind, props, req) {
        return Err(TargetCheck::Distance);
    }
    if !is_positioning_valid(kind, props, req) {
        return Err(TargetCheck::Positioning);
    }
    if !is_visibility_valid(kind, props, req) {
        return Err(TargetCheck::Visibility);
    }
    if !is_move_valid(props, req) {
        return Err(TargetCheck::Movement);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::effect::EffectStep;
    use crate::action::effect::TargetSelector;
    use crate::state::RoomColor;
    use crate::testing::{pos, small_map};
    use proptest::prelude::*;

    const SHOOTER: PlayerColor = PlayerColor::Yellow;

    fn actors() -> Vec<(PlayerColor, Option<PlayerPosition>)> {
        vec![
            (PlayerColor::Yellow, Some(pos(1, 0))),
            (PlayerColor::Green, Some(pos(1, 2))),
            (PlayerColor::Blue, Some(pos(0, 1))),
            (PlayerColor::Purple, Some(pos(1, 3))),
            (PlayerColor::Grey, None),
        ]
    }

    fn check(effect: &Effect, target: &Target) -> Result<(), TargetCheck> {
        let map = small_map();
        let actors = actors();
        let req = TargetRequest {
            map: &map,
            movement: MovementRules::Coordinate,
            shooter: SHOOTER,
            origin: pos(1, 0),
            actors: &actors,
            target,
        };
        validate_target(effect, &req)
    }

    fn player_effect(props: EffectProperties) -> Effect {
        Effect::new("test", TargetKind::Player)
            .properties(props)
            .step(EffectStep::damage(TargetSelector::AllTargets, 1))
    }

    #[test]
    fn player_effect_rejects_square_arguments() {
        let effect = player_effect(EffectProperties::new());
        let mut target = Target::players([PlayerColor::Green]);
        target.squares.push(pos(1, 1));
        assert_eq!(check(&effect, &target), Err(TargetCheck::TargetType));
    }

    #[test]
    fn self_targeting_needs_permission() {
        let target = Target::players([SHOOTER]);
        assert_eq!(
            check(&player_effect(EffectProperties::new()), &target),
            Err(TargetCheck::TargetType)
        );
        assert_eq!(
            check(&player_effect(EffectProperties::new().allow_self()), &target),
            Ok(())
        );
    }

    #[test]
    fn unspawned_and_duplicate_targets_are_rejected() {
        let effect = player_effect(EffectProperties::new());
        assert_eq!(
            check(&effect, &Target::players([PlayerColor::Grey])),
            Err(TargetCheck::TargetType)
        );
        assert_eq!(
            check(&effect, &Target::players([PlayerColor::Green, PlayerColor::Green])),
            Err(TargetCheck::TargetType)
        );
    }

    #[test]
    fn cardinality_bounds() {
        let exact = player_effect(EffectProperties::new().target_num(1));
        let two = Target::players([PlayerColor::Green, PlayerColor::Blue]);
        assert_eq!(check(&exact, &two), Err(TargetCheck::Cardinality));

        let bounded = player_effect(EffectProperties::new().max_target_num(2));
        assert_eq!(check(&bounded, &two), Ok(()));
    }

    #[test]
    fn distance_bounds() {
        let target = Target::players([PlayerColor::Green]);
        assert_eq!(
            check(&player_effect(EffectProperties::new().distance(1)), &target),
            Err(TargetCheck::Distance)
        );
        assert_eq!(
            check(&player_effect(EffectProperties::new().min_distance(2)), &target),
            Ok(())
        );
        assert_eq!(
            check(&player_effect(EffectProperties::new().max_distance(1)), &target),
            Err(TargetCheck::Distance)
        );
    }

    #[test]
    fn room_targets_compare_rooms_not_distance() {
        let effect = Effect::new("room", TargetKind::Room)
            .properties(EffectProperties::new().min_distance(1).visible(true));
        // Shooter at (1,0) is red; the door north opens into blue.
        assert_eq!(check(&effect, &Target::room(RoomColor::Blue)), Ok(()));
        assert_eq!(
            check(&effect, &Target::room(RoomColor::Red)),
            Err(TargetCheck::Distance)
        );
        assert_eq!(
            check(&effect, &Target::room(RoomColor::Yellow)),
            Err(TargetCheck::Visibility)
        );

        let own = Effect::new("own room", TargetKind::Room)
            .properties(EffectProperties::new().distance(0));
        assert_eq!(check(&own, &Target::room(RoomColor::Red)), Ok(()));
        assert_eq!(
            check(&own, &Target::room(RoomColor::Blue)),
            Err(TargetCheck::Distance)
        );
    }

    #[test]
    fn inline_targets_share_a_direction() {
        let effect = player_effect(EffectProperties::new().inline());
        assert_eq!(
            check(&effect, &Target::players([PlayerColor::Green, PlayerColor::Purple])),
            Ok(())
        );
        assert_eq!(
            check(&effect, &Target::players([PlayerColor::Green, PlayerColor::Blue])),
            Err(TargetCheck::Positioning)
        );
    }

    #[test]
    fn visible_true_and_false_are_all_or_nothing() {
        let visible = player_effect(EffectProperties::new().visible(true));
        assert_eq!(check(&visible, &Target::players([PlayerColor::Blue])), Ok(()));
        // Yellow room has no door back into red.
        assert_eq!(
            check(&visible, &Target::players([PlayerColor::Purple])),
            Err(TargetCheck::Visibility)
        );

        let hidden = player_effect(EffectProperties::new().visible(false));
        assert_eq!(check(&hidden, &Target::players([PlayerColor::Purple])), Ok(()));
        assert_eq!(
            check(&hidden, &Target::players([PlayerColor::Purple, PlayerColor::Green])),
            Err(TargetCheck::Visibility)
        );
    }

    #[test]
    fn concatenated_visibility_chains_from_the_shooter() {
        let effect = player_effect(EffectProperties::new().concatenated_visible());
        // Shooter sees Green (same room); Green at (1,2) sees Purple through the east door.
        assert_eq!(
            check(&effect, &Target::players([PlayerColor::Green, PlayerColor::Purple])),
            Ok(())
        );
        assert_eq!(
            check(&effect, &Target::players([PlayerColor::Purple, PlayerColor::Green])),
            Err(TargetCheck::Visibility)
        );
    }

    #[test]
    fn moves_without_matching_property_are_rejected() {
        let effect = player_effect(EffectProperties::new());
        let mut target = Target::players([PlayerColor::Green]);
        target.target_moves = vec![Some(pos(1, 1))];
        assert_eq!(check(&effect, &target), Err(TargetCheck::Movement));

        let pushing = player_effect(EffectProperties::new().max_move_target(1).move_inline());
        assert_eq!(check(&pushing, &target), Ok(()));
    }

    #[test]
    fn shooter_move_must_match_exactly() {
        let effect = player_effect(EffectProperties::new().move_shooter(1));
        let mut target = Target::players([PlayerColor::Green]);
        target.shooter_move = Some(pos(1, 2));
        assert_eq!(check(&effect, &target), Err(TargetCheck::Movement));
        target.shooter_move = Some(pos(1, 1));
        assert_eq!(check(&effect, &target), Ok(()));
    }

    #[test]
    fn move_to_last_target_checks_final_square() {
        let effect = player_effect(EffectProperties::new().move_shooter(2).move_to_last_target());
        let mut target = Target::players([PlayerColor::Green]);
        assert_eq!(check(&effect, &target), Err(TargetCheck::Positioning));

        target.shooter_move = Some(pos(1, 2));
        assert_eq!(check(&effect, &target), Ok(()));
    }

    #[test]
    fn moves_off_the_map_are_rejected_before_distances() {
        let effect = player_effect(EffectProperties::new().distance(1).max_move_target(1));
        let far = pos(i32::MIN, i32::MIN);

        let mut target = Target::players([PlayerColor::Green]);
        target.targets_move_first = true;
        target.target_moves = vec![Some(far)];
        assert_eq!(check(&effect, &target), Err(TargetCheck::Movement));

        let glide = player_effect(EffectProperties::new().distance(1).max_move_shooter(2));
        let mut target = Target::players([PlayerColor::Green]);
        target.shooter_moves_first = true;
        target.shooter_move = Some(far);
        assert_eq!(check(&glide, &target), Err(TargetCheck::Movement));
    }

    #[test]
    fn same_position_needs_every_target_on_one_square() {
        let effect = player_effect(EffectProperties::new().same_position().max_move_target(1));
        let mut target = Target::players([PlayerColor::Green, PlayerColor::Purple]);
        assert_eq!(check(&effect, &target), Err(TargetCheck::Visibility));

        // Green steps onto Purple's square before the damage.
        target.targets_move_first = true;
        target.target_moves = vec![Some(pos(1, 3))];
        assert_eq!(check(&effect, &target), Ok(()));
    }

    #[test]
    fn different_positions_rejects_shared_squares() {
        let effect =
            player_effect(EffectProperties::new().different_positions().max_move_target(1));
        let mut target = Target::players([PlayerColor::Green, PlayerColor::Purple]);
        assert_eq!(check(&effect, &target), Ok(()));

        target.targets_move_first = true;
        target.target_moves = vec![Some(pos(1, 3))];
        assert_eq!(check(&effect, &target), Err(TargetCheck::Positioning));
    }

    #[test]
    fn stepped_targets_move_one_square_further_each() {
        let effect = Effect::new("flame", TargetKind::Square)
            .properties(EffectProperties::new().max_target_num(2).stepped().inline())
            .step(EffectStep::damage(TargetSelector::SquareOccupantsAt(0), 1));

        assert_eq!(check(&effect, &Target::squares([pos(1, 1), pos(1, 2)])), Ok(()));
        assert_eq!(check(&effect, &Target::squares([pos(1, 1)])), Ok(()));
        assert_eq!(
            check(&effect, &Target::squares([pos(1, 2)])),
            Err(TargetCheck::Distance)
        );
        assert_eq!(
            check(&effect, &Target::squares([pos(1, 1), pos(1, 3)])),
            Err(TargetCheck::Distance)
        );
    }

    #[test]
    fn target_move_of_exact_length() {
        let effect = player_effect(EffectProperties::new().move_target(1));
        let mut target = Target::players([PlayerColor::Green]);

        target.target_moves = vec![Some(pos(2, 2))];
        assert_eq!(check(&effect, &target), Ok(()));
        target.target_moves = vec![Some(pos(1, 0))];
        assert_eq!(check(&effect, &target), Err(TargetCheck::Movement));
        target.target_moves = vec![Some(pos(1, 2))];
        assert_eq!(check(&effect, &target), Err(TargetCheck::Movement));
    }

    #[test]
    fn inline_moves_reject_turns() {
        let mut target = Target::players([PlayerColor::Green]);
        target.target_moves = vec![Some(pos(2, 1))];

        let free = player_effect(EffectProperties::new().max_move_target(2));
        assert_eq!(check(&free, &target), Ok(()));
        let inline = player_effect(EffectProperties::new().max_move_target(2).move_inline());
        assert_eq!(check(&inline, &target), Err(TargetCheck::Movement));
    }

    #[test]
    fn bounded_shooter_move_takes_one_or_more_steps() {
        let effect = player_effect(EffectProperties::new().max_move_shooter(2));
        let mut target = Target::players([PlayerColor::Green]);

        for (destination, expected) in [
            (pos(1, 1), Ok(())),
            (pos(1, 2), Ok(())),
            (pos(1, 3), Err(TargetCheck::Movement)),
            (pos(1, 0), Err(TargetCheck::Movement)),
        ] {
            target.shooter_move = Some(destination);
            assert_eq!(check(&effect, &target), expected, "{destination}");
        }
    }

    #[test]
    fn pulled_players_must_land_on_the_chosen_square() {
        let vortex = Effect::new("vortex", TargetKind::Square)
            .properties(
                EffectProperties::new()
                    .visible(true)
                    .min_distance(1)
                    .target_num(1)
                    .pull_onto_square(1)
                    .max_move_target(1),
            )
            .step(EffectStep::damage(TargetSelector::Target(0), 2));

        let mut target = Target::squares([pos(1, 1)]);
        target.players = vec![PlayerColor::Green];
        assert_eq!(check(&vortex, &target), Err(TargetCheck::Movement));

        target.target_moves = vec![Some(pos(1, 1))];
        assert_eq!(check(&vortex, &target), Ok(()));

        target.target_moves = vec![Some(pos(2, 2))];
        assert_eq!(check(&vortex, &target), Err(TargetCheck::Movement));

        // Purple is two squares from the vortex.
        target.players = vec![PlayerColor::Purple];
        target.target_moves = vec![Some(pos(1, 1))];
        assert_eq!(check(&vortex, &target), Err(TargetCheck::Movement));

        target.players = vec![PlayerColor::Green, PlayerColor::Blue];
        target.target_moves = vec![Some(pos(1, 1)), Some(pos(1, 1))];
        assert_eq!(check(&vortex, &target), Err(TargetCheck::TargetType));

        let plain = Effect::new("area", TargetKind::Square)
            .step(EffectStep::damage(TargetSelector::SquareOccupants, 1));
        let mut target = Target::squares([pos(1, 1)]);
        target.players = vec![PlayerColor::Green];
        assert_eq!(check(&plain, &target), Err(TargetCheck::TargetType));
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            a in (0i32..3, 0i32..4),
            b in (0i32..3, 0i32..4),
        ) {
            let a = pos(a.0, a.1);
            let b = pos(b.0, b.1);
            prop_assert_eq!(a.distance_of(b), b.distance_of(a));
        }
    }
}
