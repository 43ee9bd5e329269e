use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DeckError, DeckResult};
use crate::manifest::DeckManifest;

/// Primary origin of deck content.
pub trait ContentSource {
    fn read_manifest(&self) -> DeckResult<DeckManifest>;

    fn read_slide(&self, file: &str) -> DeckResult<String>;
}

/// Reads the manifest and slide files from disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    manifest: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, manifest: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest: manifest.into(),
        }
    }
}

impl ContentSource for DirectorySource {
    fn read_manifest(&self) -> DeckResult<DeckManifest> {
        let text = read_text(&self.manifest)?;
        DeckManifest::from_json(&text).map_err(|source| DeckError::Manifest {
            path: self.manifest.clone(),
            source,
        })
    }

    fn read_slide(&self, file: &str) -> DeckResult<String> {
        read_text(&self.root.join(file))
    }
}

pub(crate) fn read_text(path: &Path) -> DeckResult<String> {
    let bytes = fs::read(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| DeckError::Encoding {
        path: path.to_path_buf(),
    })
}

/// A source with nothing in it, for running purely from embedded data.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl ContentSource for Unavailable {
    fn read_manifest(&self) -> DeckResult<DeckManifest> {
        Err(unavailable("deck manifest"))
    }

    fn read_slide(&self, file: &str) -> DeckResult<String> {
        Err(unavailable(file))
    }
}

fn unavailable(what: &str) -> DeckError {
    DeckError::Io {
        path: PathBuf::from(what),
        source: io::Error::new(io::ErrorKind::NotFound, "no primary content source"),
    }
}
