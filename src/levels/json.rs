//! Level set loaded from a JSON document
//!
//! The document is a top-level array of level descriptors; level `n` is the
//! `n`-th entry. Every descriptor is validated up front so a bad file fails
//! at startup rather than mid-game.

use std::path::Path;

use super::{LevelDescriptor, LevelId, LevelProvider};
use crate::error::LevelLoadError;

#[derive(Debug, Clone)]
pub struct JsonLevels {
    levels: Vec<LevelDescriptor>,
}

impl JsonLevels {
    pub fn from_json(json: &str) -> Result<Self, LevelLoadError> {
        let levels: Vec<LevelDescriptor> = serde_json::from_str(json)?;
        if levels.is_empty() {
            return Err(LevelLoadError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            level.validate(index as LevelId + 1)?;
        }
        log::info!("loaded {} levels from JSON", levels.len());
        Ok(Self { levels })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl LevelProvider for JsonLevels {
    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn load_level(&self, id: LevelId) -> Result<LevelDescriptor, LevelLoadError> {
        id.checked_sub(1)
            .and_then(|index| self.levels.get(index as usize))
            .cloned()
            .ok_or(LevelLoadError::UnknownLevel { id })
    }
}
