//! The labeling session state machine.
//!
//! A [`LabelingSession`] ties together a pair of [`ImageSource`]s, a
//! [`PairCursor`], a [`SequenceCounter`], the mutable label text, and a
//! commit history for undo. On each commit it delegates persistence to the
//! storage/compositing collaborators under the counter's current value,
//! then advances; undo deletes the last commit's artifacts best-effort and
//! rewinds cursor, counter, and label.
//!
//! # State machine
//!
//! `Idle` (no usable sources) → `Ready` → `Committing` (transient, during
//! collaborator calls) → `Ready` on success or failure → `Complete` once
//! the last pair was committed. Undo transitions `Complete` back to
//! `Ready`. While a commit is in flight the driver must not issue another
//! commit or undo on the same session; `Committing` makes that exclusion
//! explicit.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::composite::Compositor;
use crate::config::SessionConfig;
use crate::counter::SequenceCounter;
use crate::cursor::PairCursor;
use crate::error::SessionError;
use crate::source::{ImageRef, ImageSource};
use crate::storage::ArtifactStore;

/// Lifecycle state of a labeling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No usable sources loaded (bound is 0)
    Idle,
    /// Sources loaded, cursor valid, accepting commits
    Ready,
    /// Persistence calls in flight
    Committing,
    /// The last pair was committed; only undo or navigation leave this state
    Complete,
}

/// Whether the label text survives advancing to the next pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPersistence {
    /// Label stays unchanged across advances
    Fixed,
    /// Label is cleared whenever the cursor moves
    #[default]
    ClearOnAdvance,
}

/// Manual browsing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the previous pair
    Back,
    /// Towards the next pair
    Forward,
}

/// Record of one successful commit, kept for undo.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// The output id this commit was assigned
    pub output_id: u64,
    /// Cursor position before advancing
    pub cursor_index: usize,
    /// The exact label text persisted
    pub label: String,
    /// The storage-layer names written, needed to reverse the commit
    pub artifacts: Vec<String>,
}

/// How committed pairs are turned into artifacts.
///
/// The three original tool flavors collapse into these backends: the
/// stitching flow merges each pair into one side-by-side image, the rename
/// flow copies both originals under numbered names, and the copy flow
/// numbers a single sequence image by image.
pub enum OutputBackend {
    /// Composite left and right into `{id}.png` plus `{id}.txt`
    Stitch(Box<dyn Compositor>),
    /// Copy left to `{id}_R.{ext}`, right to `{id}_T.{ext}`, plus `{id}.txt`
    Rename,
    /// Copy the current image alone to `{id}.{ext}` plus `{id}.txt`
    Copy,
}

impl std::fmt::Debug for OutputBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stitch(_) => write!(f, "Stitch"),
            Self::Rename => write!(f, "Rename"),
            Self::Copy => write!(f, "Copy"),
        }
    }
}

/// Sequential image-pair labeling session.
pub struct LabelingSession {
    left: ImageSource,
    right: ImageSource,
    cursor: PairCursor,
    counter: SequenceCounter,
    label: String,
    persistence: LabelPersistence,
    output_dir: PathBuf,
    backend: OutputBackend,
    store: Box<dyn ArtifactStore>,
    history: Vec<CommitRecord>,
    state: SessionState,
}

impl LabelingSession {
    /// Create a session that stitches each pair into one composite image.
    pub fn stitching(
        left: ImageSource,
        right: ImageSource,
        store: Box<dyn ArtifactStore>,
        compositor: Box<dyn Compositor>,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        Self::with_backend(left, right, store, OutputBackend::Stitch(compositor), config)
    }

    /// Create a session that copies both originals under numbered names.
    pub fn renaming(
        left: ImageSource,
        right: ImageSource,
        store: Box<dyn ArtifactStore>,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        Self::with_backend(left, right, store, OutputBackend::Rename, config)
    }

    /// Create a session that numbers a single image sequence: each commit
    /// copies the current image to `{id}.{ext}` next to its `{id}.txt`
    /// label. Both sides of every pair resolve to the same source.
    pub fn copying(
        images: ImageSource,
        store: Box<dyn ArtifactStore>,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let left = images.clone();
        Self::with_backend(left, images, store, OutputBackend::Copy, config)
    }

    fn with_backend(
        left: ImageSource,
        right: ImageSource,
        store: Box<dyn ArtifactStore>,
        backend: OutputBackend,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let counter = SequenceCounter::starting_at(config.counter_start)?;
        let mut session = Self {
            left,
            right,
            cursor: PairCursor::new(),
            counter,
            label: String::new(),
            persistence: config.label_persistence,
            output_dir: config.output_dir.clone(),
            backend,
            store,
            history: Vec::new(),
            state: SessionState::Idle,
        };
        session.refresh_state();
        log::info!(
            "session created ({:?}, bound {}, output {:?})",
            session.backend,
            session.bound(),
            session.output_dir
        );
        Ok(session)
    }

    fn refresh_state(&mut self) {
        self.state = if self.bound() > 0 {
            SessionState::Ready
        } else {
            SessionState::Idle
        };
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current cursor position.
    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    /// Current iteration bound, recomputed from the live sources.
    pub fn bound(&self) -> usize {
        PairCursor::bound(&self.left, &self.right)
    }

    /// The images the cursor currently points at, where resolvable.
    pub fn current_pair(&self) -> (Option<&ImageRef>, Option<&ImageRef>) {
        let index = self.cursor.index();
        (self.left.at(index).ok(), self.right.at(index).ok())
    }

    /// Current label text.
    pub fn label_text(&self) -> &str {
        &self.label
    }

    /// Replace the label text.
    pub fn set_label_text(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Current label persistence mode.
    pub fn label_persistence(&self) -> LabelPersistence {
        self.persistence
    }

    /// Switch between fixed and cleared-on-advance labels.
    pub fn set_label_persistence(&mut self, mode: LabelPersistence) {
        self.persistence = mode;
    }

    /// Number of commits available to undo.
    pub fn commit_history_depth(&self) -> usize {
        self.history.len()
    }

    /// The most recent commit, if any.
    pub fn last_commit(&self) -> Option<&CommitRecord> {
        self.history.last()
    }

    /// The output id the next successful commit will use.
    pub fn counter_value(&self) -> u64 {
        self.counter.peek()
    }

    /// Directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Change the output directory for subsequent commits.
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = dir.into();
        log::info!("output path set to {:?}", self.output_dir);
    }

    /// Percentage of the sequence covered by the current position.
    pub fn progress_percent(&self) -> u8 {
        let bound = self.bound();
        if bound == 0 {
            return 0;
        }
        ((self.cursor.index() + 1) as f64 / bound as f64 * 100.0).round() as u8
    }

    /// Replace the left source. The cursor resets to the first pair.
    pub fn load_left(&mut self, source: ImageSource) {
        self.left = source;
        self.after_source_reload();
    }

    /// Replace the right source. The cursor resets to the first pair.
    pub fn load_right(&mut self, source: ImageSource) {
        self.right = source;
        self.after_source_reload();
    }

    fn after_source_reload(&mut self) {
        self.cursor.reset();
        self.refresh_state();
        log::info!("sources reloaded, bound {}", self.bound());
    }

    /// Reset the output id counter to a new starting number.
    pub fn reset_counter(&mut self, new_start: u64) -> Result<(), SessionError> {
        self.counter.reset(new_start)
    }

    /// Commit the current pair under the next output id.
    ///
    /// Validates the pair and label, persists through the collaborators,
    /// records the commit for undo, confirms the counter, and advances.
    /// On any failure nothing changes and no id is consumed. Returns the
    /// output id that was assigned.
    pub fn commit(&mut self) -> Result<u64, SessionError> {
        if self.state == SessionState::Complete {
            return Err(SessionError::SequenceComplete);
        }

        let index = self.cursor.index();
        let mut missing = Vec::new();
        if self.left.at(index).is_err() {
            missing.push("left image");
        }
        if self.right.at(index).is_err() {
            missing.push("right image");
        }
        if self.label.trim().is_empty() {
            missing.push("label");
        }
        if !missing.is_empty() {
            return Err(SessionError::validation(&missing));
        }

        let output_id = self.counter.peek();
        self.state = SessionState::Committing;
        let artifacts = match self.persist_current(output_id) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                self.state = SessionState::Ready;
                log::warn!("commit of pair {} failed: {}", index + 1, e);
                return Err(e);
            }
        };

        let label = self.label.trim().to_string();
        log::debug!(
            "committed pair {} as output {} ({:?})",
            index + 1,
            output_id,
            artifacts
        );
        self.history.push(CommitRecord {
            output_id,
            cursor_index: index,
            label,
            artifacts,
        });
        self.counter.confirm();

        if self.persistence == LabelPersistence::ClearOnAdvance {
            self.label.clear();
        }

        if self.cursor.advance(self.bound()) {
            self.state = SessionState::Ready;
        } else {
            self.state = SessionState::Complete;
            log::info!("all {} pairs committed, sequence complete", self.bound());
        }
        Ok(output_id)
    }

    /// Persist the current pair through the collaborators and return the
    /// artifact names written. Artifact naming lives here and nowhere else.
    fn persist_current(&mut self, output_id: u64) -> Result<Vec<String>, SessionError> {
        let index = self.cursor.index();
        let left = self.left.at(index)?.clone();
        let right = self.right.at(index)?.clone();
        let label = self.label.trim().to_string();
        let label_name = format!("{}.txt", output_id);

        match &mut self.backend {
            OutputBackend::Stitch(compositor) => {
                let image_name = format!("{}.png", output_id);
                compositor.composite(&left, &right, &image_name, &self.output_dir)?;
                self.store
                    .persist_label(&label_name, &label, &self.output_dir)?;
                Ok(vec![image_name, label_name])
            }
            OutputBackend::Rename => {
                let left_name = renamed_artifact(&left, output_id, "_R");
                let right_name = renamed_artifact(&right, output_id, "_T");
                self.store
                    .copy_renamed(&left, &left_name, &self.output_dir)?;
                self.store
                    .copy_renamed(&right, &right_name, &self.output_dir)?;
                self.store
                    .persist_label(&label_name, &label, &self.output_dir)?;
                Ok(vec![left_name, right_name, label_name])
            }
            OutputBackend::Copy => {
                let image_name = renamed_artifact(&right, output_id, "");
                self.store
                    .copy_renamed(&right, &image_name, &self.output_dir)?;
                self.store
                    .persist_label(&label_name, &label, &self.output_dir)?;
                Ok(vec![image_name, label_name])
            }
        }
    }

    /// Undo the most recent commit.
    ///
    /// Deletes the recorded artifacts (failures are logged, not fatal),
    /// rolls the counter back to the undone id, rewinds the cursor, and
    /// restores the label text that was persisted. Returns the output id
    /// that was undone.
    pub fn undo_last(&mut self) -> Result<u64, SessionError> {
        let record = self.history.pop().ok_or(SessionError::NothingToUndo)?;

        for name in &record.artifacts {
            if let Err(e) = self.store.delete_artifact(name, &self.output_dir) {
                log::warn!("failed to delete artifact {}: {}", name, e);
            }
        }

        self.counter.rollback(record.output_id);
        let bound = self.bound();
        if self.cursor.jump_to(record.cursor_index, bound).is_err() {
            // Sources shrank since this commit; land on the last valid pair
            log::warn!(
                "recorded index {} no longer valid (bound {}), clamping",
                record.cursor_index,
                bound
            );
            self.cursor.clamp_to(bound);
        }
        self.label = record.label.clone();
        self.state = if bound > 0 {
            SessionState::Ready
        } else {
            SessionState::Idle
        };
        log::debug!("undid commit {}", record.output_id);
        Ok(record.output_id)
    }

    /// Browse one pair back or forward without touching the counter or the
    /// commit history. Saturating no-op at either boundary; returns whether
    /// the cursor moved.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let moved = match direction {
            Direction::Back => self.cursor.retreat(),
            Direction::Forward => self.cursor.advance(self.bound()),
        };
        if moved {
            if self.persistence == LabelPersistence::ClearOnAdvance {
                self.label.clear();
            }
            if self.state == SessionState::Complete {
                self.state = SessionState::Ready;
            }
        }
        moved
    }
}

impl std::fmt::Debug for LabelingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelingSession")
            .field("state", &self.state)
            .field("index", &self.cursor.index())
            .field("bound", &self.bound())
            .field("counter", &self.counter.peek())
            .field("history_depth", &self.history.len())
            .finish()
    }
}

/// Numbered copy name for a renamed original: `{id}{suffix}.{ext}`.
fn renamed_artifact(image: &ImageRef, output_id: u64, suffix: &str) -> String {
    match image.extension() {
        Some(ext) => format!("{}{}.{}", output_id, suffix, ext),
        None => format!("{}{}", output_id, suffix),
    }
}
