//! Task orderings shared by the store and the dependency queries.
//!
//! Both orderings end with the task id as a tiebreaker so results are
//! deterministic across repeated calls.

use crate::domain::Task;
use std::cmp::Ordering;

/// Board order: column position, then oldest first.
pub(crate) fn board_order(a: &Task, b: &Task) -> Ordering {
    a.position
        .cmp(&b.position)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

/// Creation order: oldest first.
pub(crate) fn creation_order(a: &Task, b: &Task) -> Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}
