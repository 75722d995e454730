//! Task status transition guard.
//!
//! | from          | allowed next          |
//! |---------------|-----------------------|
//! | `todo`        | `in_progress`, `done` |
//! | `in_progress` | `done`                |
//! | `done`        | (none)                |
//!
//! `todo -> done` is additionally flagged as *fast-tracked*. The flag only
//! drives an audit record; it never changes whether the move is allowed.

use crate::models::TaskStatus;

/// Whether a task in `from` may move to `to`.
pub fn can_transition(from: TaskStatus, to: TaskStatus) -> bool {
    use crate::models::TaskStatus::*;

    matches!((from, to), (Todo, InProgress) | (Todo, Done) | (InProgress, Done))
}

/// Whether moving from `from` to `to` skips the in-progress stage.
pub fn is_fast_tracked(from: TaskStatus, to: TaskStatus) -> bool {
    from == TaskStatus::Todo && to == TaskStatus::Done
}
