//! Fixtures shared by the unit tests.

use crate::action::{Effect, EffectProperties, EffectStep, TargetKind, TargetSelector};
use crate::cards::{AmmoTile, Deck, Decks, PowerupCard, PowerupKind, WeaponCard};
use crate::config::GameConfig;
use crate::env::GameMap;
use crate::state::{AmmoColor, GameContext, PlayerColor, PlayerPosition, TurnManager, UserPlayer};

pub(crate) const COLORS: [PlayerColor; 5] = [
    PlayerColor::Yellow,
    PlayerColor::Green,
    PlayerColor::Blue,
    PlayerColor::Purple,
    PlayerColor::Grey,
];

pub(crate) fn pos(row: i32, column: i32) -> PlayerPosition {
    PlayerPosition::new(row, column)
}

/// Three rows, four rooms, two holes:
///
/// ```text
/// B B B* .
/// R*R R  Y
/// . W W  Y*
/// ```
pub(crate) fn small_map() -> GameMap {
    GameMap::builder(3, 4)
        .layout(&["BBB.", "RRRY", ".WWY"])
        .and_then(|builder| {
            builder
                .spawn(pos(0, 2))
                .spawn(pos(1, 0))
                .spawn(pos(2, 3))
                .door(pos(0, 0), pos(1, 0))
                .door(pos(0, 2), pos(1, 2))
                .door(pos(1, 2), pos(1, 3))
                .door(pos(1, 1), pos(2, 1))
                .door(pos(2, 2), pos(2, 3))
                .build()
        })
        .expect("fixture map is valid")
}

/// A one-effect weapon dealing two damage to one visible player.
pub(crate) fn weapon(name: &str, cost: &[AmmoColor]) -> WeaponCard {
    let base = Effect::new("base", TargetKind::Player)
        .properties(EffectProperties::new().visible(true).target_num(1))
        .step(EffectStep::damage(TargetSelector::AllTargets, 2));
    WeaponCard::new(name, cost.to_vec(), vec![base])
}

/// Unshuffled decks; cards come off the end of each list first.
pub(crate) fn decks() -> Decks {
    use AmmoColor::{Blue, Red, Yellow};

    let weapons = (0..12)
        .map(|i| {
            let cost = match i % 3 {
                0 => vec![Red, Blue],
                1 => vec![Blue, Yellow],
                _ => vec![Yellow],
            };
            weapon(&format!("weapon {i}"), &cost)
        })
        .collect();
    let powerups = [
        PowerupKind::TargetingScope,
        PowerupKind::Newton,
        PowerupKind::TagbackGrenade,
        PowerupKind::Teleporter,
    ]
    .into_iter()
    .flat_map(|kind| [Red, Blue, Yellow].map(|color| PowerupCard::new(kind, color)))
    .collect();
    let tiles = (0..12)
        .map(|i| {
            if i % 2 == 0 {
                AmmoTile::with_ammo([Red, Blue, Blue])
            } else {
                AmmoTile::with_powerup([Yellow, Red])
            }
        })
        .collect();

    Decks {
        weapons: Deck::stacked(weapons, false),
        powerups: Deck::stacked(powerups, true),
        ammo_tiles: Deck::stacked(tiles, true),
    }
}

/// `players` humans on [`small_map`], nobody spawned, Yellow owning the turn.
pub(crate) fn context(players: usize) -> GameContext {
    let mut ctx = GameContext::new(GameConfig::default(), small_map(), decks());
    let colors = &COLORS[..players];
    for &color in colors {
        ctx.players
            .push(UserPlayer::new(color.to_string(), color));
    }
    ctx.turns = TurnManager::new(colors.to_vec());
    ctx
}

/// Lays ammo tiles and weapons on the board.
pub(crate) fn stock(ctx: &mut GameContext) {
    ctx.board.refill(&mut ctx.decks);
}
