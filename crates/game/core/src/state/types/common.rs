use std::fmt;

/// Identity colour of an actor on the board.
///
/// Colours double as damage and mark tokens: a player board records *who*
/// dealt each point of damage by storing the dealer's colour.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerColor {
    Yellow,
    Green,
    Blue,
    Purple,
    Grey,
}

/// Resource colour used to pay weapon and powerup costs.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AmmoColor {
    Red,
    Blue,
    Yellow,
}

/// Colour of a room on the map.
///
/// Spawn squares live in the rooms sharing a colour with an [`AmmoColor`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoomColor {
    Red,
    Blue,
    Yellow,
    White,
    Purple,
    Green,
}

impl RoomColor {
    /// Parses the single-letter room code used by map layouts.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'R' => Some(Self::Red),
            'B' => Some(Self::Blue),
            'Y' => Some(Self::Yellow),
            'W' => Some(Self::White),
            'P' => Some(Self::Purple),
            'G' => Some(Self::Green),
            _ => None,
        }
    }

    /// Returns the ammo colour whose spawn point sits in this room, if any.
    pub fn spawn_color(self) -> Option<AmmoColor> {
        match self {
            Self::Red => Some(AmmoColor::Red),
            Self::Blue => Some(AmmoColor::Blue),
            Self::Yellow => Some(AmmoColor::Yellow),
            Self::White | Self::Purple | Self::Green => None,
        }
    }
}

impl From<AmmoColor> for RoomColor {
    fn from(color: AmmoColor) -> Self {
        match color {
            AmmoColor::Red => Self::Red,
            AmmoColor::Blue => Self::Blue,
            AmmoColor::Yellow => Self::Yellow,
        }
    }
}

/// Compass direction on the grid. Row 0 is the northern edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Row/column offset of a single step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }
}

/// Errors raised by direction queries between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryError {
    #[error("{from} and {to} share neither a row nor a column")]
    NoDirection {
        from: PlayerPosition,
        to: PlayerPosition,
    },

    #[error("no direction from {0} to itself")]
    SamePosition(PlayerPosition),
}

/// Grid coordinate of an actor, expressed as (row, column).
///
/// Distances and directions are pure coordinate computations; whether a
/// coordinate is a real square is answered by the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerPosition {
    pub row: i32,
    pub column: i32,
}

impl PlayerPosition {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Manhattan distance in grid steps, ignoring walls. Saturates for
    /// coordinates far outside any map.
    pub fn distance_of(self, other: PlayerPosition) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.column.abs_diff(other.column))
    }

    /// Compass direction leading from `self` to `other`.
    pub fn direction_to(self, other: PlayerPosition) -> Result<Direction, GeometryError> {
        if self == other {
            return Err(GeometryError::SamePosition(self));
        }

        if self.column == other.column {
            Ok(if other.row < self.row {
                Direction::North
            } else {
                Direction::South
            })
        } else if self.row == other.row {
            Ok(if other.column > self.column {
                Direction::East
            } else {
                Direction::West
            })
        } else {
            Err(GeometryError::NoDirection {
                from: self,
                to: other,
            })
        }
    }

    /// The coordinate one step away in `direction`. May fall outside the map.
    pub fn step(self, direction: Direction) -> PlayerPosition {
        let (dr, dc) = direction.delta();
        PlayerPosition::new(self.row.saturating_add(dr), self.column.saturating_add(dc))
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_row_and_column_alignment() {
        let origin = PlayerPosition::new(1, 1);

        assert_eq!(
            origin.direction_to(PlayerPosition::new(0, 1)),
            Ok(Direction::North)
        );
        assert_eq!(
            origin.direction_to(PlayerPosition::new(1, 3)),
            Ok(Direction::East)
        );
        assert_eq!(
            origin.direction_to(PlayerPosition::new(2, 1)),
            Ok(Direction::South)
        );
        assert_eq!(
            origin.direction_to(PlayerPosition::new(1, 0)),
            Ok(Direction::West)
        );
    }

    #[test]
    fn direction_rejects_diagonals_and_same_square() {
        let origin = PlayerPosition::new(1, 1);

        assert!(matches!(
            origin.direction_to(PlayerPosition::new(2, 2)),
            Err(GeometryError::NoDirection { .. })
        ));
        assert_eq!(
            origin.direction_to(origin),
            Err(GeometryError::SamePosition(origin))
        );
    }

    #[test]
    fn distance_is_manhattan() {
        let a = PlayerPosition::new(0, 0);
        let b = PlayerPosition::new(2, 3);
        assert_eq!(a.distance_of(b), 5);
        assert_eq!(b.distance_of(a), 5);
        assert_eq!(a.distance_of(a), 0);
    }

    #[test]
    fn distance_saturates_at_the_edges_of_the_coordinate_space() {
        let corner = PlayerPosition::new(i32::MIN, i32::MIN);
        let far = PlayerPosition::new(i32::MAX, i32::MAX);
        assert_eq!(corner.distance_of(far), u32::MAX);
        assert_eq!(far.distance_of(corner), u32::MAX);
    }

    #[test]
    fn step_then_opposite_returns_home() {
        let origin = PlayerPosition::new(1, 2);
        for direction in Direction::ALL {
            assert_eq!(origin.step(direction).step(direction.opposite()), origin);
        }
    }
}
