//! The visible-day listing and ordinal resolution.
//!
//! Ordinals are positions, not identifiers: they are recomputed from the
//! store on every call and shift down after a hide.

use crate::error::ScheduleError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use timetable_store::MemoryStore;

/// One line of the day's listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleEntry {
    pub ordinal: usize,
    pub entry_id: u64,
    pub subject: String,
    pub teacher: String,
    pub classroom: u32,
}

impl Display for VisibleEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} / {} / {}",
            self.ordinal, self.subject, self.teacher, self.classroom
        )
    }
}

/// Non-hidden entries of `date` in creation order, numbered from 1.
pub fn visible_entries(store: &MemoryStore, date: NaiveDate) -> Vec<VisibleEntry> {
    // References are checked on load and on append.
    store
        .entries()
        .filter(|entry| entry.is_visible_on(date))
        .filter_map(|entry| {
            let subject = store.subject(entry.subject_id)?;
            let teacher = store.teacher(entry.teacher_id)?;
            let classroom = store.classroom(entry.classroom_id)?;
            Some((entry.id, subject, teacher, classroom))
        })
        .enumerate()
        .map(|(index, (entry_id, subject, teacher, classroom))| VisibleEntry {
            ordinal: index + 1,
            entry_id,
            subject: subject.name.clone(),
            teacher: teacher.name.clone(),
            classroom: classroom.number,
        })
        .collect()
}

/// Resolve a 1-based ordinal against a listing.
pub fn resolve_ordinal(listing: &[VisibleEntry], ordinal: i64) -> Result<&VisibleEntry, ScheduleError> {
    usize::try_from(ordinal)
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| listing.get(index))
        .ok_or(ScheduleError::InvalidOrdinal {
            ordinal,
            visible: listing.len(),
        })
}
