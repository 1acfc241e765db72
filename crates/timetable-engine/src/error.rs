//! Error types for schedule operations.

use serde::Serialize;
use std::fmt::Display;
use timetable_store::{AtomicStoreMutationError, MemoryStoreError};

/// Coarse classification every operation outcome maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    CapacityExceeded,
    InvalidInput,
    StorageFailure,
}

/// A rejected schedule operation. Every variant is recoverable at the
/// request boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("classroom {number} not found")]
    ClassroomNotFound { number: u32 },

    #[error("teacher {teacher} cannot teach more than {cap} lessons per day")]
    TeacherLoadExceeded { teacher: String, cap: usize },

    #[error("invalid lesson number {ordinal}: {visible} lesson(s) listed")]
    InvalidOrdinal { ordinal: i64, visible: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{operation} failed: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClassroomNotFound { .. } => ErrorKind::NotFound,
            Self::TeacherLoadExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::InvalidOrdinal { .. } | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Storage { .. } => ErrorKind::StorageFailure,
        }
    }

    pub(crate) fn storage(operation: &'static str, message: impl Display) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }

    /// Map a memory-store error raised inside `operation`.
    pub(crate) fn from_store(operation: &'static str) -> impl Fn(MemoryStoreError) -> Self {
        move |err| match err {
            MemoryStoreError::EmptyName { kind } => {
                Self::InvalidInput(format!("{kind} name must not be empty"))
            }
            other => Self::storage(operation, other),
        }
    }

    /// Unwrap a lock-scoped mutation failure. Errors raised by the mutator
    /// pass through; lock and store failures become `Storage`.
    pub(crate) fn from_atomic(
        operation: &'static str,
    ) -> impl Fn(AtomicStoreMutationError<ScheduleError>) -> Self {
        move |err| match err {
            AtomicStoreMutationError::Mutation(inner) => inner,
            other => Self::storage(operation, other),
        }
    }
}
