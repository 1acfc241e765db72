//! Schedule entries: the ledger's only mutable record kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scheduled lesson.
///
/// References its subject, teacher and classroom by record id. The only
/// mutation after creation is [`ScheduleEntry::hide`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: u64,
    pub subject_id: u64,
    pub teacher_id: u64,
    pub classroom_id: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub hidden: bool,
}

impl ScheduleEntry {
    /// Mark the entry hidden. Returns `false` if it already was.
    pub fn hide(&mut self) -> bool {
        let changed = !self.hidden;
        self.hidden = true;
        changed
    }

    pub fn is_visible_on(&self, date: NaiveDate) -> bool {
        !self.hidden && self.date == date
    }
}
