//! The weapon catalog.
//!
//! Every weapon is a list of firing modes. Mode 0 is the basic effect and is
//! covered by the reload cost; any other mode adds its own cost on top.
//! Nothing here is interpreted: the core's targeting validator and effect
//! runner read the descriptors as they are.

use adrenaline_core::AmmoColor::{Blue, Red, Yellow};
use adrenaline_core::WeaponCard;
use adrenaline_core::action::effect::{
    Effect, EffectProperties, EffectStep, TargetKind, TargetSelector,
};

use TargetSelector::{
    AllTargets, RoomOccupants, SquareOccupants, SquareOccupantsAt, Target, TargetSquare,
};

fn seen(count: usize) -> EffectProperties {
    EffectProperties::new().visible(true).target_num(count)
}

fn here(count: usize) -> EffectProperties {
    EffectProperties::new().distance(0).target_num(count)
}

/// A square one step away, then optionally the next one in line.
fn flame() -> EffectProperties {
    EffectProperties::new().max_target_num(2).stepped().inline()
}

/// A visible vortex square at least one move away; up to `pulled` players
/// standing on it or next to it are dragged onto it.
fn vortex(pulled: usize) -> EffectProperties {
    seen(1)
        .min_distance(1)
        .pull_onto_square(pulled)
        .max_move_target(1)
}

fn player(name: &str, properties: EffectProperties) -> Effect {
    Effect::new(name, TargetKind::Player).properties(properties)
}

fn damage(to: TargetSelector, amount: u8) -> EffectStep {
    EffectStep::damage(to, amount)
}

fn mark(to: TargetSelector, amount: u8) -> EffectStep {
    EffectStep::mark(to, amount)
}

/// Every weapon in the game.
pub fn weapon_catalog() -> Vec<WeaponCard> {
    vec![
        WeaponCard::new(
            "Lock Rifle",
            vec![Blue, Blue],
            vec![
                player("basic effect", seen(1))
                    .step(damage(AllTargets, 2))
                    .step(mark(AllTargets, 1)),
                player("with second lock", seen(2))
                    .cost(&[Red])
                    .step(damage(Target(0), 2))
                    .step(mark(AllTargets, 1)),
            ],
        ),
        WeaponCard::new(
            "Machine Gun",
            vec![Blue, Red],
            vec![
                player("basic effect", EffectProperties::new().visible(true).max_target_num(2))
                    .step(damage(AllTargets, 1)),
                player("with focus shot", seen(2))
                    .cost(&[Yellow])
                    .step(damage(Target(0), 2))
                    .step(damage(Target(1), 1)),
                player(
                    "with turret tripod",
                    EffectProperties::new().visible(true).max_target_num(3),
                )
                .cost(&[Yellow, Blue])
                .step(damage(Target(0), 2))
                .step(damage(Target(1), 2))
                .step(damage(Target(2), 1)),
            ],
        ),
        WeaponCard::new(
            "T.H.O.R.",
            vec![Blue, Red],
            vec![
                player("basic effect", seen(1)).step(damage(AllTargets, 2)),
                player(
                    "with chain reaction",
                    EffectProperties::new().target_num(2).concatenated_visible(),
                )
                .cost(&[Blue])
                .step(damage(Target(0), 2))
                .step(damage(Target(1), 1)),
                player(
                    "with high voltage",
                    EffectProperties::new().target_num(3).concatenated_visible(),
                )
                .cost(&[Blue, Blue])
                .step(damage(Target(0), 2))
                .step(damage(Target(1), 1))
                .step(damage(Target(2), 2)),
            ],
        ),
        WeaponCard::new(
            "Plasma Gun",
            vec![Blue, Yellow],
            vec![
                player("basic effect", seen(1)).step(damage(AllTargets, 2)),
                player("with phase glide", seen(1).max_move_shooter(2)).step(damage(AllTargets, 2)),
                player("with charged shot", seen(1))
                    .cost(&[Blue])
                    .step(damage(AllTargets, 3)),
            ],
        ),
        WeaponCard::new(
            "Whisper",
            vec![Blue, Blue, Yellow],
            vec![
                player("effect", seen(1).min_distance(2))
                    .step(damage(AllTargets, 3))
                    .step(mark(AllTargets, 1)),
            ],
        ),
        WeaponCard::new(
            "Electroscythe",
            vec![Blue],
            vec![
                Effect::new("basic mode", TargetKind::Square)
                    .properties(here(1))
                    .step(damage(SquareOccupants, 1)),
                Effect::new("in reaper mode", TargetKind::Square)
                    .cost(&[Blue, Red])
                    .properties(here(1))
                    .step(damage(SquareOccupants, 2)),
            ],
        ),
        WeaponCard::new(
            "Tractor Beam",
            vec![Blue],
            vec![
                player("basic mode", seen(1).max_move_target(2)).step(damage(AllTargets, 1)),
                player("in punisher mode", here(1).max_move_target(2))
                    .cost(&[Red, Yellow])
                    .step(damage(AllTargets, 3)),
            ],
        ),
        WeaponCard::new(
            "Furnace",
            vec![Red, Blue],
            vec![
                Effect::new("basic mode", TargetKind::Room)
                    .properties(EffectProperties::new().visible(true).min_distance(1))
                    .step(damage(RoomOccupants, 1)),
                Effect::new("in cozy fire mode", TargetKind::Square)
                    .properties(EffectProperties::new().distance(1).target_num(1))
                    .step(damage(SquareOccupants, 1))
                    .step(mark(SquareOccupants, 1)),
            ],
        ),
        WeaponCard::new(
            "Vortex Cannon",
            vec![Red, Blue],
            vec![
                Effect::new("basic effect", TargetKind::Square)
                    .properties(vortex(1))
                    .step(damage(Target(0), 2)),
                Effect::new("with black hole", TargetKind::Square)
                    .cost(&[Red])
                    .properties(vortex(3))
                    .step(damage(Target(0), 2))
                    .step(damage(Target(1), 1))
                    .step(damage(Target(2), 1)),
            ],
        ),
        WeaponCard::new(
            "Hellion",
            vec![Red, Yellow, Yellow],
            vec![
                player("basic mode", seen(1).min_distance(1))
                    .step(damage(Target(0), 1))
                    .step(mark(TargetSquare(0), 1)),
                player("in nano-tracer mode", seen(1).min_distance(1))
                    .cost(&[Red])
                    .step(damage(Target(0), 1))
                    .step(mark(TargetSquare(0), 2)),
            ],
        ),
        WeaponCard::new(
            "Heatseeker",
            vec![Red, Red, Yellow],
            vec![
                player("effect", EffectProperties::new().visible(false).target_num(1))
                    .step(damage(AllTargets, 3)),
            ],
        ),
        WeaponCard::new(
            "Flamethrower",
            vec![Red],
            vec![
                player("basic mode", flame()).step(damage(AllTargets, 1)),
                Effect::new("in barbecue mode", TargetKind::Square)
                    .cost(&[Yellow, Yellow])
                    .properties(flame())
                    .step(damage(SquareOccupantsAt(0), 2))
                    .step(damage(SquareOccupantsAt(1), 1)),
            ],
        ),
        WeaponCard::new(
            "Grenade Launcher",
            vec![Red],
            vec![
                player("basic effect", seen(1).max_move_target(1)).step(damage(AllTargets, 1)),
                Effect::new("with extra grenade", TargetKind::Square)
                    .cost(&[Red])
                    .properties(seen(1))
                    .step(damage(SquareOccupants, 1)),
            ],
        ),
        WeaponCard::new(
            "Rocket Launcher",
            vec![Red, Red],
            vec![
                player("basic effect", seen(1).min_distance(1).max_move_target(1))
                    .step(damage(AllTargets, 2)),
                player("with rocket jump", seen(1).min_distance(1).max_move_shooter(2))
                    .cost(&[Blue])
                    .step(damage(AllTargets, 2)),
                player(
                    "with fragmenting warhead",
                    seen(1).min_distance(1).max_move_target(1),
                )
                .cost(&[Yellow])
                .step(damage(Target(0), 2))
                .step(damage(TargetSquare(0), 1)),
            ],
        ),
        WeaponCard::new(
            "Railgun",
            vec![Yellow, Yellow, Blue],
            vec![
                player("basic mode", EffectProperties::new().target_num(1).inline())
                    .step(damage(AllTargets, 3)),
                player(
                    "in piercing mode",
                    EffectProperties::new().max_target_num(2).inline(),
                )
                .step(damage(AllTargets, 2)),
            ],
        ),
        WeaponCard::new(
            "Cyberblade",
            vec![Yellow, Red],
            vec![
                player("basic effect", here(1)).step(damage(AllTargets, 2)),
                player(
                    "with shadowstep",
                    EffectProperties::new().target_num(1).move_shooter(1).move_to_last_target(),
                )
                .step(damage(AllTargets, 2)),
                player("with slice and dice", here(2))
                    .cost(&[Yellow])
                    .step(damage(AllTargets, 2)),
            ],
        ),
        WeaponCard::new(
            "ZX-2",
            vec![Yellow, Red],
            vec![
                player("basic mode", seen(1))
                    .step(damage(AllTargets, 1))
                    .step(mark(AllTargets, 2)),
                player(
                    "in scanner mode",
                    EffectProperties::new().visible(true).max_target_num(3),
                )
                .step(mark(AllTargets, 1)),
            ],
        ),
        WeaponCard::new(
            "Shotgun",
            vec![Yellow, Yellow],
            vec![
                player("basic mode", here(1).max_move_target(1)).step(damage(AllTargets, 3)),
                player(
                    "in long barrel mode",
                    EffectProperties::new().distance(1).target_num(1),
                )
                .step(damage(AllTargets, 2)),
            ],
        ),
        WeaponCard::new(
            "Power Glove",
            vec![Yellow, Blue],
            vec![
                player(
                    "basic mode",
                    EffectProperties::new()
                        .distance(1)
                        .target_num(1)
                        .move_shooter(1)
                        .move_to_last_target(),
                )
                .step(damage(AllTargets, 1))
                .step(mark(AllTargets, 2)),
                player(
                    "in rocket fist mode",
                    EffectProperties::new()
                        .distance(2)
                        .target_num(1)
                        .inline()
                        .move_shooter(2)
                        .move_to_last_target(),
                )
                .cost(&[Blue])
                .step(damage(AllTargets, 2)),
            ],
        ),
        WeaponCard::new(
            "Shockwave",
            vec![Yellow],
            vec![
                player(
                    "basic mode",
                    EffectProperties::new()
                        .distance(1)
                        .max_target_num(3)
                        .different_positions(),
                )
                .step(damage(AllTargets, 1)),
                Effect::new("in tsunami mode", TargetKind::Square)
                    .cost(&[Yellow])
                    .properties(EffectProperties::new().distance(1).max_target_num(4))
                    .step(damage(SquareOccupants, 1)),
            ],
        ),
        WeaponCard::new(
            "Sledgehammer",
            vec![Yellow],
            vec![
                player("basic mode", here(1)).step(damage(AllTargets, 2)),
                player("in pulverize mode", here(1).max_move_target(2).move_inline())
                    .cost(&[Red])
                    .step(damage(AllTargets, 3)),
            ],
        ),
    ]
}
