use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{BundleError, BundleResult};

/// Writes `content` next to `path` and renames it into place, creating
/// missing parent directories first.
pub fn write_atomic(path: &Path, content: &str) -> BundleResult<()> {
    let wrap = |source: io::Error| BundleError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let tmp_path = unique_tmp_path(path);
    {
        let mut file = File::create(&tmp_path).map_err(wrap)?;
        file.write_all(content.as_bytes()).map_err(wrap)?;
        file.sync_all().map_err(wrap)?;
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(wrap(err));
    }

    Ok(())
}

fn unique_tmp_path(path: &Path) -> PathBuf {
    let mut counter = 0u32;
    loop {
        let candidate = if counter == 0 {
            path.with_extension("tmp")
        } else {
            path.with_extension(format!("tmp{counter}"))
        };

        if !candidate.exists() {
            return candidate;
        }

        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_parents_and_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("docs/out/index.html");

        write_atomic(&file_path, "first").unwrap();
        write_atomic(&file_path, "second").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
        assert!(!file_path.with_extension("tmp").exists());
    }
}
