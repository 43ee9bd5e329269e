use std::io;
use std::path::PathBuf;

use slide_deck_core::{DeckError, ExitCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error("failed to read asset directory {path}: {source}")]
    AssetDir { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to serialize embedded data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BundleError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Deck(err) => err.exit_code(),
            Self::AssetDir { .. } | Self::Write { .. } => ExitCode::Io,
            Self::Serialize(_) => ExitCode::InvalidContent,
        }
    }
}

pub type BundleResult<T> = Result<T, BundleError>;
