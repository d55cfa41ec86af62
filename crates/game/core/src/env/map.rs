use std::collections::{BTreeSet, VecDeque};

use crate::state::{AmmoColor, Direction, PlayerPosition, RoomColor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub rows: u32,
    pub columns: u32,
}

impl MapDimensions {
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    pub fn contains(&self, position: PlayerPosition) -> bool {
        position.row >= 0
            && position.column >= 0
            && position.row < self.rows as i32
            && position.column < self.columns as i32
    }

    fn index(&self, position: PlayerPosition) -> Option<usize> {
        self.contains(position)
            .then(|| position.row as usize * self.columns as usize + position.column as usize)
    }
}

/// What lies across one side of a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// Blocks movement and sight.
    Wall,
    /// Passage into a different room; grants sight into that room from this side.
    Door,
    /// Open passage to another square of the same room.
    Square,
}

impl Edge {
    pub fn is_passable(self) -> bool {
        !matches!(self, Edge::Wall)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquareKind {
    /// Holds one ammo tile.
    Tile,
    /// Holds up to three weapons for sale.
    Spawn,
}

/// Immutable descriptor of one square of the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    position: PlayerPosition,
    room: RoomColor,
    kind: SquareKind,
    edges: [Edge; 4],
}

impl Square {
    pub fn position(&self) -> PlayerPosition {
        self.position
    }

    pub fn room(&self) -> RoomColor {
        self.room
    }

    pub fn kind(&self) -> SquareKind {
        self.kind
    }

    pub fn edge(&self, direction: Direction) -> Edge {
        self.edges[direction.index()]
    }

    pub fn is_spawn(&self) -> bool {
        self.kind == SquareKind::Spawn
    }
}

/// How movement budgets are measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementRules {
    /// Manhattan distance between coordinates, walls ignored.
    #[default]
    Coordinate,
    /// Shortest walk through non-wall edges.
    WallAware,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("layout row {row} has {found} squares, expected {expected}")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown room code {0:?}")]
    UnknownRoom(char),

    #[error("{0} is not a square of the map")]
    NotASquare(PlayerPosition),

    #[error("door between {0} and {1} does not join two adjacent squares")]
    DoorNotAdjacent(PlayerPosition, PlayerPosition),

    #[error("door between {0} and {1} joins squares of the same room")]
    DoorInsideRoom(PlayerPosition, PlayerPosition),

    #[error("spawn at {0} is not in a red, blue or yellow room")]
    SpawnOutsideSpawnRoom(PlayerPosition),

    #[error("{0} spawn point is missing or duplicated")]
    SpawnCount(AmmoColor),
}

/// Static board topology: squares, rooms and the edges between them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameMap {
    dimensions: MapDimensions,
    squares: Vec<Option<Square>>,
}

impl GameMap {
    pub fn builder(rows: u32, columns: u32) -> GameMapBuilder {
        GameMapBuilder::new(rows, columns)
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    /// True if `position` is an existing square (not a hole in the layout).
    pub fn contains(&self, position: PlayerPosition) -> bool {
        self.square(position).is_some()
    }

    pub fn square(&self, position: PlayerPosition) -> Option<&Square> {
        let index = self.dimensions.index(position)?;
        self.squares[index].as_ref()
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().flatten()
    }

    pub fn room_of(&self, position: PlayerPosition) -> Option<RoomColor> {
        self.square(position).map(Square::room)
    }

    pub fn rooms(&self) -> BTreeSet<RoomColor> {
        self.squares().map(Square::room).collect()
    }

    pub fn spawn_of(&self, color: AmmoColor) -> Option<PlayerPosition> {
        let room = RoomColor::from(color);
        self.squares()
            .find(|square| square.is_spawn() && square.room == room)
            .map(Square::position)
    }

    pub fn spawn_squares(&self) -> impl Iterator<Item = &Square> {
        self.squares().filter(|square| square.is_spawn())
    }

    /// The square across `direction`, if the edge on that side is passable.
    pub fn neighbour(&self, position: PlayerPosition, direction: Direction) -> Option<PlayerPosition> {
        let square = self.square(position)?;
        if !square.edge(direction).is_passable() {
            return None;
        }
        let next = position.step(direction);
        self.contains(next).then_some(next)
    }

    /// Line-of-sight rule: `target` is visible from `shooter` when both share
    /// a square or a room, or when a door of the shooter's own square opens
    /// into the target's room. Doors are read from the shooter's side only.
    pub fn is_visible(&self, shooter: PlayerPosition, target: PlayerPosition) -> bool {
        let (Some(from), Some(to)) = (self.square(shooter), self.square(target)) else {
            return false;
        };

        if shooter == target || from.room == to.room {
            return true;
        }

        self.rooms_behind_doors(from).any(|room| room == to.room)
    }

    /// True if at least one square of `room` is visible from `shooter`.
    pub fn is_room_visible(&self, shooter: PlayerPosition, room: RoomColor) -> bool {
        let Some(from) = self.square(shooter) else {
            return false;
        };
        from.room == room || self.rooms_behind_doors(from).any(|other| other == room)
    }

    fn rooms_behind_doors<'a>(&'a self, from: &'a Square) -> impl Iterator<Item = RoomColor> + 'a {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if from.edge(direction) != Edge::Door {
                return None;
            }
            self.room_of(from.position.step(direction))
        })
    }

    /// Shortest walk from `from` to `to` through passable edges.
    pub fn walking_distance(&self, from: PlayerPosition, to: PlayerPosition) -> Option<u32> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut seen = BTreeSet::from([from]);
        let mut queue = VecDeque::from([(from, 0u32)]);
        while let Some((position, steps)) = queue.pop_front() {
            if position == to {
                return Some(steps);
            }
            for direction in Direction::ALL {
                if let Some(next) = self.neighbour(position, direction)
                    && seen.insert(next)
                {
                    queue.push_back((next, steps + 1));
                }
            }
        }
        None
    }

    /// True if `to` can be reached from `from` in at most `max` steps.
    pub fn reachable_within(&self, from: PlayerPosition, to: PlayerPosition, max: u32) -> bool {
        self.walking_distance(from, to)
            .is_some_and(|steps| steps <= max)
    }

    /// Movement cost from `from` to `to` under the given rules.
    pub fn movement_cost(
        &self,
        rules: MovementRules,
        from: PlayerPosition,
        to: PlayerPosition,
    ) -> Option<u32> {
        if !self.contains(to) {
            return None;
        }
        match rules {
            MovementRules::Coordinate => Some(from.distance_of(to)),
            MovementRules::WallAware => self.walking_distance(from, to),
        }
    }
}

/// Assembles a [`GameMap`] from a room layout, spawn points and doors.
#[derive(Clone, Debug)]
pub struct GameMapBuilder {
    dimensions: MapDimensions,
    rooms: Vec<Option<RoomColor>>,
    spawns: Vec<PlayerPosition>,
    doors: Vec<(PlayerPosition, PlayerPosition)>,
}

impl GameMapBuilder {
    fn new(rows: u32, columns: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(rows, columns),
            rooms: vec![None; rows as usize * columns as usize],
            spawns: Vec::new(),
            doors: Vec::new(),
        }
    }

    /// Fills rooms from one string per row; `.` or space marks a hole.
    pub fn layout(mut self, rows: &[&str]) -> Result<Self, MapError> {
        for (row, line) in rows.iter().enumerate() {
            let codes: Vec<char> = line.chars().collect();
            if codes.len() != self.dimensions.columns as usize {
                return Err(MapError::RowLength {
                    row,
                    found: codes.len(),
                    expected: self.dimensions.columns as usize,
                });
            }
            for (column, code) in codes.into_iter().enumerate() {
                let room = match code {
                    '.' | ' ' => None,
                    other => Some(RoomColor::from_code(other).ok_or(MapError::UnknownRoom(other))?),
                };
                self = self.room(PlayerPosition::new(row as i32, column as i32), room);
            }
        }
        Ok(self)
    }

    pub fn room(mut self, position: PlayerPosition, room: Option<RoomColor>) -> Self {
        if let Some(index) = self.dimensions.index(position) {
            self.rooms[index] = room;
        }
        self
    }

    pub fn spawn(mut self, position: PlayerPosition) -> Self {
        self.spawns.push(position);
        self
    }

    pub fn door(mut self, a: PlayerPosition, b: PlayerPosition) -> Self {
        self.doors.push((a, b));
        self
    }

    fn room_at(&self, position: PlayerPosition) -> Option<RoomColor> {
        self.dimensions
            .index(position)
            .and_then(|index| self.rooms[index])
    }

    pub fn build(self) -> Result<GameMap, MapError> {
        for &(a, b) in &self.doors {
            let (Some(room_a), Some(room_b)) = (self.room_at(a), self.room_at(b)) else {
                return Err(MapError::NotASquare(if self.room_at(a).is_none() { a } else { b }));
            };
            if a.distance_of(b) != 1 {
                return Err(MapError::DoorNotAdjacent(a, b));
            }
            if room_a == room_b {
                return Err(MapError::DoorInsideRoom(a, b));
            }
        }

        for &spawn in &self.spawns {
            let room = self.room_at(spawn).ok_or(MapError::NotASquare(spawn))?;
            if room.spawn_color().is_none() {
                return Err(MapError::SpawnOutsideSpawnRoom(spawn));
            }
        }
        for color in [AmmoColor::Red, AmmoColor::Blue, AmmoColor::Yellow] {
            let count = self
                .spawns
                .iter()
                .filter(|&&spawn| self.room_at(spawn) == Some(RoomColor::from(color)))
                .count();
            if count != 1 {
                return Err(MapError::SpawnCount(color));
            }
        }

        let mut squares = Vec::with_capacity(self.rooms.len());
        for row in 0..self.dimensions.rows as i32 {
            for column in 0..self.dimensions.columns as i32 {
                let position = PlayerPosition::new(row, column);
                let square = self.room_at(position).map(|room| Square {
                    position,
                    room,
                    kind: if self.spawns.contains(&position) {
                        SquareKind::Spawn
                    } else {
                        SquareKind::Tile
                    },
                    edges: Direction::ALL.map(|direction| self.edge_between(position, room, direction)),
                });
                squares.push(square);
            }
        }

        Ok(GameMap {
            dimensions: self.dimensions,
            squares,
        })
    }

    fn edge_between(&self, position: PlayerPosition, room: RoomColor, direction: Direction) -> Edge {
        let next = position.step(direction);
        match self.room_at(next) {
            None => Edge::Wall,
            Some(other) if other == room => Edge::Square,
            Some(_) => {
                let is_door = self
                    .doors
                    .iter()
                    .any(|&(a, b)| (a == position && b == next) || (a == next && b == position));
                if is_door { Edge::Door } else { Edge::Wall }
            }
        }
    }
}
