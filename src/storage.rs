//! Artifact storage: the file-system collaborator the session delegates to.
//!
//! The session only talks to the [`ArtifactStore`] trait; [`FsStore`] is the
//! default adapter writing to a local output directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::source::ImageRef;

/// Storage collaborator for committed artifacts.
///
/// Artifact names are derived by the session (in exactly one place) and
/// passed here verbatim, so commit and undo always agree on what to write
/// and delete.
pub trait ArtifactStore {
    /// Write label text under the given artifact name.
    fn persist_label(
        &mut self,
        name: &str,
        text: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, StorageError>;

    /// Copy a source image into the output directory under a new name.
    fn copy_renamed(
        &mut self,
        src: &ImageRef,
        new_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, StorageError>;

    /// Delete a previously written artifact. A missing file is logged and
    /// treated as success; undo must not be blocked by it.
    fn delete_artifact(&mut self, name: &str, output_dir: &Path) -> Result<(), StorageError>;
}

/// File-system backed artifact store.
///
/// The output directory is created on demand, so a freshly configured
/// target path works without any setup step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    /// Create a new store.
    pub fn new() -> Self {
        Self
    }

    fn ensure_dir(output_dir: &Path) -> Result<(), StorageError> {
        if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }
        Ok(())
    }
}

impl ArtifactStore for FsStore {
    fn persist_label(
        &mut self,
        name: &str,
        text: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, StorageError> {
        Self::ensure_dir(output_dir)?;
        let path = output_dir.join(name);
        fs::write(&path, text)?;
        log::debug!("wrote label {:?}", path);
        Ok(path)
    }

    fn copy_renamed(
        &mut self,
        src: &ImageRef,
        new_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, StorageError> {
        if !src.path().exists() {
            return Err(StorageError::NotFound {
                path: src.path().to_path_buf(),
            });
        }
        Self::ensure_dir(output_dir)?;
        let path = output_dir.join(new_name);
        fs::copy(src.path(), &path)?;
        log::debug!("copied {:?} -> {:?}", src.path(), path);
        Ok(path)
    }

    fn delete_artifact(&mut self, name: &str, output_dir: &Path) -> Result<(), StorageError> {
        let path = output_dir.join(name);
        if !path.exists() {
            log::warn!("artifact {:?} already gone, nothing to delete", path);
            return Ok(());
        }
        fs::remove_file(&path)?;
        log::debug!("deleted artifact {:?}", path);
        Ok(())
    }
}
