//! Operator argument grammar.
//!
//! `add` takes `Subject : Teacher1, Teacher2 : Classroom`; `hide` takes a
//! bare lesson number.

use crate::error::ScheduleError;
use crate::ledger::AddRequest;

pub const FIELD_DELIMITER: &str = " : ";
pub const TEACHER_DELIMITER: &str = ", ";
pub const ADD_FORMAT: &str = "Subject : Teachers : Classroom";

/// Parse `Subject : Teachers : Classroom` into an add request.
pub fn parse_add_args(args: &str) -> Result<AddRequest, ScheduleError> {
    let fields: Vec<&str> = args.trim().split(FIELD_DELIMITER).collect();
    let [subject, teachers, classroom] = fields.as_slice() else {
        return Err(ScheduleError::InvalidInput(format!(
            "format must be: {ADD_FORMAT}"
        )));
    };
    AddRequest::new(*subject, teachers, parse_classroom(classroom)?)
}

/// Parse a classroom number.
pub fn parse_classroom(raw: &str) -> Result<u32, ScheduleError> {
    let raw = raw.trim();
    raw.parse::<u32>().map_err(|_| {
        ScheduleError::InvalidInput(format!("classroom must be a number (got {raw:?})"))
    })
}

/// Split a raw teacher list on `", "`. Order and duplicates are kept.
pub fn split_teacher_names(raw: &str) -> Result<Vec<String>, ScheduleError> {
    raw.split(TEACHER_DELIMITER)
        .map(str::trim)
        .map(|name| {
            if name.is_empty() {
                Err(ScheduleError::InvalidInput(
                    "teacher name must not be empty".to_string(),
                ))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

/// Parse a lesson number. Range checks happen against the live listing.
pub fn parse_ordinal(args: &str) -> Result<i64, ScheduleError> {
    args.trim()
        .parse::<i64>()
        .map_err(|_| ScheduleError::InvalidInput("please specify a lesson number".to_string()))
}
