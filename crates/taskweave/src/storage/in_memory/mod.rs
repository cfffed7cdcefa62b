//! In-memory task store.
//!
//! All tasks live in a `HashMap<TaskId, Task>` behind `Arc<Mutex<_>>`, so the
//! store is cheap to share and every operation is serialized. Data is lost
//! when the process exits unless written out with [`save_to_jsonl`].
//!
//! Scoping is enforced on every lookup: a task stored under another
//! user/project is invisible.
//!
//! Creation timestamps are strictly increasing within one store, which
//! makes "creation order" a total order even for tasks created in the same
//! clock tick.

mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::TaskStore;
use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) use inner::InMemoryStoreInner;
pub(crate) use jsonl::read_jsonl;
pub use jsonl::{load_from_jsonl, save_to_jsonl, LoadWarning};

/// Thread-safe in-memory store; implements [`TaskStore`] in `trait_impl.rs`.
pub(crate) type InMemoryStore = Arc<Mutex<InMemoryStoreInner>>;

/// Create a new empty in-memory task store.
///
/// # Example
///
/// ```
/// use taskweave::storage::in_memory::new_in_memory_store;
///
/// let store = new_in_memory_store();
/// ```
pub fn new_in_memory_store() -> Box<dyn TaskStore> {
    Box::new(Arc::new(Mutex::new(InMemoryStoreInner::new())))
}
