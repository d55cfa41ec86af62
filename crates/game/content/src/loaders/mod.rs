//! Loaders for data-driven content.
//!
//! Only board layouts live in data files; cards are built in code by
//! [`crate::weapons`] and [`crate::decks`].

pub mod map;

pub use map::{MapFile, MapKind, MapLoader};

use std::path::Path;

pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))
}
