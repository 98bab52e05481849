//! Temp-file-then-rename writes.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{PersistError, Result};

/// Suffix of in-flight temp files; files carrying it are never listed.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Temp path next to `target`, hidden and unique per process.
pub fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}{TEMP_SUFFIX}", std::process::id()))
}

/// A fully written temp file waiting to be renamed onto its target.
///
/// Dropping a staged file without committing it removes the temp file.
#[derive(Debug)]
#[must_use = "a staged file is discarded unless committed"]
pub struct StagedFile {
    temp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Renames the temp file onto the target and returns the target path.
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.temp_path, &self.target).map_err(|e| PersistError::AtomicWriteFailed {
            temp_path: self.temp_path.clone(),
            target_path: self.target.clone(),
            source: e,
        })?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Writes a temp file next to `target` without touching `target`.
///
/// `write` receives the open temp file. On failure the temp file is
/// removed.
pub fn stage<F>(target: &Path, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut File, &Path) -> Result<()>,
{
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let staged = StagedFile {
        temp_path: temp_path_for(target),
        target: target.to_path_buf(),
        committed: false,
    };
    let mut file = File::create(&staged.temp_path).map_err(|e| PersistError::Io {
        operation: "create",
        path: staged.temp_path.clone(),
        source: e,
    })?;
    write(&mut file, &staged.temp_path)?;
    file.sync_all().map_err(|e| PersistError::Io {
        operation: "sync",
        path: staged.temp_path.clone(),
        source: e,
    })?;
    Ok(staged)
}

/// Commits staged files in order, all or nothing.
///
/// When a rename fails, targets already committed by this call are
/// removed and the remaining temp files are discarded.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    let mut committed = Vec::with_capacity(staged.len());
    for file in staged {
        match file.commit() {
            Ok(path) => committed.push(path),
            Err(err) => {
                for path in &committed {
                    let _ = fs::remove_file(path);
                }
                return Err(err);
            }
        }
    }
    Ok(committed)
}

/// Writes `target` through a temp file in the same directory.
///
/// On any failure the temp file is removed and `target` is left untouched.
pub fn write_atomic<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File, &Path) -> Result<()>,
{
    stage(target, write)?.commit().map(|_| ())
}

/// True for names produced by [`temp_path_for`].
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') || name.ends_with(TEMP_SUFFIX)
}
