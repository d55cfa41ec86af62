mod ammo;
mod common;

pub use ammo::AmmoQuantity;
pub use common::{AmmoColor, Direction, GeometryError, PlayerColor, PlayerPosition, RoomColor};
