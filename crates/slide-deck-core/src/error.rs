use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    NotFound = 1,
    Io = 4,
    InvalidContent = 5,
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("slide {requested} is out of range (deck has {len} slides)")]
    SlideOutOfRange { requested: usize, len: usize },

    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    #[error("invalid deck manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid embedded data: {0}")]
    Embedded(String),
}

impl DeckError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::SlideOutOfRange { .. } => ExitCode::NotFound,
            Self::Io { .. } => ExitCode::Io,
            Self::Encoding { .. } | Self::Manifest { .. } | Self::Embedded(_) => {
                ExitCode::InvalidContent
            }
        }
    }
}

pub type DeckResult<T> = Result<T, DeckError>;
