//! Operator-facing replies: exactly one message per command, success or not.

use crate::command::{ADD_FORMAT, parse_add_args, parse_ordinal};
use crate::error::{ErrorKind, ScheduleError};
use crate::ledger::Timetable;
use chrono::NaiveDate;
use serde::Serialize;

pub const EMPTY_DAY: &str = "No lessons today.";
pub const DAY_HEADER: &str = "Today's schedule:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl Reply {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            kind: None,
            message: message.into(),
        }
    }

    pub fn rejected(err: &ScheduleError) -> Self {
        Self {
            ok: false,
            kind: Some(err.kind()),
            message: rejection_message(err),
        }
    }
}

impl From<Result<String, ScheduleError>> for Reply {
    fn from(result: Result<String, ScheduleError>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(err) => Self::rejected(&err),
        }
    }
}

pub fn rejection_message(err: &ScheduleError) -> String {
    match err {
        ScheduleError::ClassroomNotFound { number } => format!("Classroom {number} not found."),
        ScheduleError::TeacherLoadExceeded { teacher, cap } => {
            format!("Teacher {teacher} cannot teach more than {cap} lessons per day.")
        }
        ScheduleError::InvalidOrdinal { .. } => "Invalid lesson number.".to_string(),
        ScheduleError::InvalidInput(message) => sentence(message),
        ScheduleError::Storage { .. } => format!("Error: {err}"),
    }
}

/// Capitalized, with a closing period unless one is already there.
fn sentence(message: &str) -> String {
    let mut chars = message.chars();
    let mut text: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::new(),
    };
    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    text
}

/// `add Subject : Teachers : Classroom`
pub fn add_lesson(timetable: &Timetable, args: &str, date: NaiveDate) -> Reply {
    parse_add_args(args)
        .and_then(|request| timetable.add_entry(&request, date))
        .map(|outcome| {
            if outcome.unrecorded_teachers.is_empty() {
                "Lesson added to the schedule.".to_string()
            } else {
                format!(
                    "Lesson added to the schedule. Recorded teacher: {} (also listed: {}).",
                    outcome.teacher,
                    outcome.unrecorded_teachers.join(", ")
                )
            }
        })
        .into()
}

/// `schedule`
pub fn schedule(timetable: &Timetable, date: NaiveDate) -> Reply {
    timetable
        .list_day(date)
        .map(|listing| {
            if listing.is_empty() {
                return EMPTY_DAY.to_string();
            }
            let mut message = DAY_HEADER.to_string();
            for line in &listing {
                message.push('\n');
                message.push_str(&line.to_string());
            }
            message
        })
        .into()
}

/// `hide N`
pub fn hide_lesson(timetable: &Timetable, args: &str, date: NaiveDate) -> Reply {
    parse_ordinal(args)
        .and_then(|ordinal| timetable.hide_by_ordinal(ordinal, date))
        .map(|_| "Lesson hidden from the schedule.".to_string())
        .into()
}

pub fn help() -> Reply {
    Reply::success(format!(
        "Commands:\n\
         add {ADD_FORMAT} - add a lesson to today's schedule (teachers separated by \", \")\n\
         schedule - show today's schedule\n\
         hide <number> - hide a lesson by its number in the schedule"
    ))
}
