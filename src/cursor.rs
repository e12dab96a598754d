//! Pair cursor: the position stepped through two image sources in lockstep.

use crate::error::SessionError;
use crate::source::{ImageSource, SourceMode};

/// Tracks the current pairing index across two sources of potentially
/// different effective lengths.
///
/// The cursor stores only the index; the iteration bound depends on the
/// live sources and is recomputed on every call rather than cached, so a
/// source reload is picked up immediately.
#[derive(Debug, Clone, Default)]
pub struct PairCursor {
    index: usize,
}

impl PairCursor {
    /// Create a cursor at position 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zero-based position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The exclusive iteration bound for a pair of sources:
    /// - two Sequences: the shorter count
    /// - one Single: the other source's count
    /// - two Singles: 1
    pub fn bound(left: &ImageSource, right: &ImageSource) -> usize {
        match (left.mode(), right.mode()) {
            (SourceMode::Sequence, SourceMode::Sequence) => left.count().min(right.count()),
            (SourceMode::Single, SourceMode::Sequence) => right.count(),
            (SourceMode::Sequence, SourceMode::Single) => left.count(),
            (SourceMode::Single, SourceMode::Single) => 1,
        }
    }

    /// Move forward one position. Returns false (index unchanged) when the
    /// next position would leave the bound; the caller treats that as the
    /// sequence-complete signal.
    pub fn advance(&mut self, bound: usize) -> bool {
        if self.index + 1 < bound {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move back one position. No-op at the first index.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to an absolute position, rejecting anything outside the bound.
    pub fn jump_to(&mut self, index: usize, bound: usize) -> Result<(), SessionError> {
        if index >= bound {
            return Err(SessionError::OutOfRange { index, bound });
        }
        self.index = index;
        Ok(())
    }

    /// Pull the index back into range after a source shrank under it.
    pub fn clamp_to(&mut self, bound: usize) {
        if bound == 0 {
            self.index = 0;
        } else if self.index >= bound {
            log::debug!("clamping cursor {} to bound {}", self.index, bound);
            self.index = bound - 1;
        }
    }

    /// Reset to position 0 (used when a source is replaced wholesale).
    pub fn reset(&mut self) {
        self.index = 0;
    }
}
