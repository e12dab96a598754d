//! pairlab - image-pair labeling sessions for training dataset assembly.
//!
//! Pairs images from one or two sources (a single fixed image or a
//! natural-sorted folder), attaches text labels, and persists numbered
//! `(image, label)` outputs through pluggable storage and compositing
//! collaborators. The [`LabelingSession`] state machine tracks the pairing
//! cursor, assigns monotonically increasing output ids, and supports undo
//! of the most recent commit.

pub mod composite;
pub mod config;
pub mod counter;
pub mod cursor;
pub mod error;
pub mod natural_sort;
pub mod progress;
pub mod session;
pub mod source;
pub mod storage;

pub use composite::{Compositor, ImageCompositor};
pub use config::{ConfigError, SessionConfig};
pub use counter::SequenceCounter;
pub use cursor::PairCursor;
pub use error::{CompositeError, SessionError, StorageError};
pub use progress::{ProgressReport, WorkItem, WorkStatus};
pub use session::{
    CommitRecord, Direction, LabelPersistence, LabelingSession, OutputBackend, SessionState,
};
pub use source::{ImageRef, ImageSource, SourceMode};
pub use storage::{ArtifactStore, FsStore};
