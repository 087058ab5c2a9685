//! Row color derived from a task's done flag, due date and priority.

use chrono::{DateTime, Utc};

use crate::task::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowColor {
    Gray,
    Purple,
    Red,
    Orange,
    Default,
}

/// Done wins over everything, overdue wins over priority.
pub fn derived_color(task: &Task, now: DateTime<Utc>) -> RowColor {
    if task.done {
        return RowColor::Gray;
    }
    if task.is_overdue(now) {
        // Overdue rows look the same whatever their priority.
        return RowColor::Purple;
    }
    match task.priority {
        Priority::High => RowColor::Red,
        Priority::Medium => RowColor::Orange,
        _ => RowColor::Default,
    }
}
