//! Error types surfaced by the kernel
//!
//! Only level loading and tuning parsing can fail. Everything inside a tick
//! is guarded by construction instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::levels::LevelId;

/// A level could not be loaded; the world is left exactly as it was
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("level provider has no levels")]
    Empty,
    #[error("unknown level id: {id}")]
    UnknownLevel { id: LevelId },
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {level}: invalid geometry in {what}")]
    InvalidGeometry { level: LevelId, what: String },
    #[error("level {level}: solid #{index} has a runtime-only kind and cannot be authored")]
    AuthoredDynamicSolid { level: LevelId, index: usize },
    #[error("level {level}: breakable solid #{index} starts with zero health")]
    ZeroHealth { level: LevelId, index: usize },
    #[error("level {level}: switch refers to missing bridge {bridge}")]
    MissingBridge { level: LevelId, bridge: u32 },
    #[error("level {level}: hidden switch #{index} is not owned by the sky-tender and can never be revealed")]
    UnrevealableSwitch { level: LevelId, index: usize },
}

/// Tuning document rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
