//! Output id counter with two-phase commit semantics.

use crate::error::SessionError;

/// Monotonically increasing counter assigning output identifiers.
///
/// Ids are handed out in two phases: [`peek`](Self::peek) reads the value
/// that a commit will use, and [`confirm`](Self::confirm) advances it only
/// after persistence succeeded. A failed commit therefore never burns an id.
#[derive(Debug, Clone)]
pub struct SequenceCounter {
    value: u64,
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self { value: 1 }
    }
}

impl SequenceCounter {
    /// Create a counter starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter starting at an arbitrary positive value.
    pub fn starting_at(start: u64) -> Result<Self, SessionError> {
        let mut counter = Self::new();
        counter.reset(start)?;
        Ok(counter)
    }

    /// The id the next successful commit will be assigned.
    pub fn peek(&self) -> u64 {
        self.value
    }

    /// Advance after the caller confirmed a successful commit.
    pub fn confirm(&mut self) {
        self.value += 1;
    }

    /// Reset to a user-chosen starting number. Rejects values below 1.
    pub fn reset(&mut self, new_start: u64) -> Result<(), SessionError> {
        if new_start < 1 {
            return Err(SessionError::invalid_argument(format!(
                "counter start must be at least 1, got {}",
                new_start
            )));
        }
        log::debug!("counter reset: {} -> {}", self.value, new_start);
        self.value = new_start;
        Ok(())
    }

    /// Restore a prior value. Used exclusively by undo.
    pub fn rollback(&mut self, prior: u64) {
        log::debug!("counter rollback: {} -> {}", self.value, prior);
        self.value = prior;
    }
}
