//! # timetable-store
//!
//! Memory layer for the daily class schedule.
//!
//! This crate provides:
//! - `Subject`, `Teacher`, `Classroom` and `ScheduleEntry` records
//! - JSONL read/write (portable persistence)
//! - `MemoryStore` (canonical in-memory state with natural-key indexes)
//! - lock-scoped atomic mutation over a store file
//!
//! Scheduling rules (load caps, visibility, ordinals) live in
//! `timetable-engine`.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one line per record)
//!     ↕  load / save under <store>.lock
//! MemoryStore (deterministic in-memory projection)
//! ```

pub mod atomic_store;
pub mod entity;
pub mod entry;
pub mod jsonl;
pub mod memory;

pub use atomic_store::{
    AtomicStoreMutationError, DEFAULT_LOCK_ATTEMPTS, DEFAULT_LOCK_RETRY_DELAY, LockPolicy,
    StoreLockError, mutate_store_jsonl, store_lock_path,
};
pub use entity::{Classroom, ClassroomSeed, Subject, Teacher};
pub use entry::ScheduleEntry;
pub use jsonl::{JsonlError, Record};
pub use memory::{MemoryStore, MemoryStoreError};
