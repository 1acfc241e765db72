//! Entity records: subjects, teachers and classrooms.

use serde::{Deserialize, Serialize};

/// A taught subject. Keyed by `name`, which is unique across subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    pub name: String,
}

/// A teacher, looked up by display name.
///
/// Names are not a storage-level key: several records may carry the same
/// name, and lookups resolve to the lowest id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: u64,
    pub name: String,
}

/// A classroom. Keyed by room `number`, which is unique across classrooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: u64,
    pub number: u32,
    pub capacity: u32,
}

/// Seed description of a classroom, before it has a record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomSeed {
    pub number: u32,
    pub capacity: u32,
}

impl ClassroomSeed {
    pub const fn new(number: u32, capacity: u32) -> Self {
        Self { number, capacity }
    }
}
