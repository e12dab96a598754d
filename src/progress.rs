//! Completion and time-efficiency metrics over labeled work items.
//!
//! Pure functions: deterministic, no side effects. Used after the fact on
//! persisted task records, independent of any live session.

use serde::{Deserialize, Serialize};

/// Lifecycle state of one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkStatus {
    /// Not started
    Todo,
    /// Started, not finished
    InProgress,
    /// Finished
    Completed,
}

/// One labeled work item with its estimate and recorded time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Current status
    pub status: WorkStatus,
    /// Estimated effort in hours (non-negative)
    #[serde(default)]
    pub estimated_hours: f64,
    /// Wall-clock time actually spent, in seconds (non-negative)
    #[serde(default)]
    pub time_spent_seconds: f64,
}

/// Derived progress metrics for a collection of work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProgressReport {
    /// Total number of items
    pub total: usize,
    /// Items with status Completed
    pub completed: usize,
    /// Items with status InProgress
    pub in_progress: usize,
    /// Items with status Todo
    pub todo: usize,
    /// Percentage of completed items, 0 when there are no items
    pub completion_rate: f64,
    /// Estimated vs. spent hours as a percentage. Above 100 means work went
    /// faster than estimated. 0 when effectively no time was recorded.
    pub time_efficiency: f64,
}

/// Compute progress metrics over a collection of work items.
pub fn compute(items: &[WorkItem]) -> ProgressReport {
    let total = items.len();
    let completed = items
        .iter()
        .filter(|item| item.status == WorkStatus::Completed)
        .count();
    let in_progress = items
        .iter()
        .filter(|item| item.status == WorkStatus::InProgress)
        .count();
    let todo = total - completed - in_progress;

    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let estimated_hours: f64 = items.iter().map(|item| item.estimated_hours.max(0.0)).sum();
    let spent_hours: f64 = items
        .iter()
        .map(|item| item.time_spent_seconds.max(0.0) / 3600.0)
        .sum();

    // Below roughly half a minute of recorded time the ratio is noise
    let raw_efficiency = if spent_hours > 0.01 {
        estimated_hours / spent_hours * 100.0
    } else {
        0.0
    };
    let time_efficiency = if raw_efficiency.is_finite() {
        raw_efficiency
    } else {
        0.0
    };

    ProgressReport {
        total,
        completed,
        in_progress,
        todo,
        completion_rate,
        time_efficiency,
    }
}
