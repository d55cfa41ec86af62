//! Map data loader.
//!
//! A map file lists one layout string per row (one room code per square, `.`
//! for a hole), the three spawn squares and the doors. Walls and open sides
//! are derived from the rooms.

use std::path::Path;

use adrenaline_core::{GameMap, PlayerPosition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFile {
    pub layout: Vec<String>,
    pub spawns: Vec<(i32, i32)>, // (row, column)
    pub doors: Vec<((i32, i32), (i32, i32))>,
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a map from a RON file.
    pub fn load(path: &Path) -> LoadResult<GameMap> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a map from RON text.
    pub fn parse(content: &str) -> LoadResult<GameMap> {
        let data: MapFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("invalid map data: {}", e))?;
        Self::build(&data)
    }

    pub fn build(data: &MapFile) -> LoadResult<GameMap> {
        let rows = u32::try_from(data.layout.len())?;
        let columns = data
            .layout
            .first()
            .map_or(0, |row| row.chars().count());
        let columns = u32::try_from(columns)?;

        let layout: Vec<&str> = data.layout.iter().map(String::as_str).collect();
        let mut builder = GameMap::builder(rows, columns).layout(&layout)?;
        for &(row, column) in &data.spawns {
            builder = builder.spawn(PlayerPosition::new(row, column));
        }
        for &((a_row, a_column), (b_row, b_column)) in &data.doors {
            builder = builder.door(
                PlayerPosition::new(a_row, a_column),
                PlayerPosition::new(b_row, b_column),
            );
        }
        Ok(builder.build()?)
    }
}

/// The four standard boards.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::EnumIter, strum::EnumString, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum MapKind {
    /// Best for three or four players.
    #[default]
    Small,
    MediumA,
    MediumB,
    /// Best for five players.
    Large,
}

impl MapKind {
    pub fn source(self) -> &'static str {
        match self {
            Self::Small => include_str!("../../data/maps/small.ron"),
            Self::MediumA => include_str!("../../data/maps/medium_a.ron"),
            Self::MediumB => include_str!("../../data/maps/medium_b.ron"),
            Self::Large => include_str!("../../data/maps/large.ron"),
        }
    }

    pub fn load(self) -> LoadResult<GameMap> {
        MapLoader::parse(self.source())
            .map_err(|e| anyhow::anyhow!("{} map: {}", self, e))
    }
}
