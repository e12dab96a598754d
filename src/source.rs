//! Image sources: a single fixed image or an ordered folder of images.
//!
//! An [`ImageSource`] is one selectable unit on either side of a pairing
//! session. Sequence sources keep their items in natural sort order (see
//! [`crate::natural_sort`]); the sort is applied on every bulk load, before
//! positions acquire any meaning.

use std::path::{Path, PathBuf};

use crate::error::{SessionError, StorageError};
use crate::natural_sort::natural_cmp;

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check if a filename has a supported image extension.
/// Works with both full paths and bare filenames.
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// An opaque handle to one image: display name plus storage path.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    name: String,
    path: PathBuf,
}

impl ImageRef {
    /// Create a reference from a display name and storage path.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a reference from a path, using the file name as display name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self { name, path }
    }

    /// The display name used for ordering and messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The storage path used by the persistence collaborators.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file extension (without dot), if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }
}

/// Whether a source is one fixed image or an ordered folder of images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Exactly one image, reused for every pair.
    Single,
    /// An ordered sequence of images, stepped through in lockstep.
    Sequence,
}

/// One side of a pairing session: a single image or an ordered sequence.
///
/// Replaced wholesale on re-selection; never mutated in place. The source
/// holds no cursor of its own.
#[derive(Debug, Clone)]
pub struct ImageSource {
    mode: SourceMode,
    items: Vec<ImageRef>,
}

impl ImageSource {
    /// Create a single-image source.
    pub fn single(image: ImageRef) -> Self {
        Self {
            mode: SourceMode::Single,
            items: vec![image],
        }
    }

    /// Create a sequence source. Items are natural-sorted by display name.
    pub fn sequence(refs: Vec<ImageRef>) -> Self {
        let mut source = Self {
            mode: SourceMode::Sequence,
            items: refs,
        };
        source.sort_items();
        source
    }

    /// Create an empty sequence source (nothing selected yet).
    pub fn empty() -> Self {
        Self {
            mode: SourceMode::Sequence,
            items: Vec::new(),
        }
    }

    /// Discover image files in a folder, non-recursively, and build a
    /// natural-sorted sequence source from them.
    pub fn from_folder(folder: impl AsRef<Path>) -> Result<Self, StorageError> {
        let folder = folder.as_ref();
        let refs: Vec<ImageRef> = std::fs::read_dir(folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(is_image_filename)
            })
            .map(ImageRef::from_path)
            .collect();

        if refs.is_empty() {
            log::warn!("no image files found in {:?}", folder);
        } else {
            log::info!("loaded {} images from {:?}", refs.len(), folder);
        }

        Ok(Self::sequence(refs))
    }

    /// Replace the items wholesale.
    ///
    /// A Single source must receive exactly one image; a Sequence source
    /// accepts any number and re-sorts them.
    pub fn load(&mut self, refs: Vec<ImageRef>) -> Result<(), SessionError> {
        if self.mode == SourceMode::Single && refs.len() != 1 {
            return Err(SessionError::invalid_argument(format!(
                "single source takes exactly one image, got {}",
                refs.len()
            )));
        }
        self.items = refs;
        self.sort_items();
        Ok(())
    }

    fn sort_items(&mut self) {
        if self.mode == SourceMode::Sequence {
            self.items.sort_by(|a, b| natural_cmp(a.name(), b.name()));
        }
    }

    /// The source mode.
    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Whether this source is a single fixed image.
    pub fn is_single(&self) -> bool {
        self.mode == SourceMode::Single
    }

    /// Number of selectable positions: 1 for Single, item count otherwise.
    pub fn count(&self) -> usize {
        match self.mode {
            SourceMode::Single => 1,
            SourceMode::Sequence => self.items.len(),
        }
    }

    /// The image at a position. A Single source resolves every position to
    /// its one image; a Sequence source rejects indices past its length.
    pub fn at(&self, index: usize) -> Result<&ImageRef, SessionError> {
        match self.mode {
            SourceMode::Single => Ok(&self.items[0]),
            SourceMode::Sequence => self.items.get(index).ok_or(SessionError::OutOfRange {
                index,
                bound: self.items.len(),
            }),
        }
    }
}
