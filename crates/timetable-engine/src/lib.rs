//! # timetable-engine
//!
//! The scheduling entry engine over a `timetable-store` file.
//!
//! - `constraint`: admission rules (classroom exists, teacher daily load cap)
//! - `visibility`: the numbered listing of a day's non-hidden entries
//! - `ledger`: `Timetable`, the add/list/hide/initialize operations
//! - `command` and `reply`: the operator argument grammar and reply text
//! - `config`: TOML configuration

pub mod command;
pub mod config;
pub mod constraint;
pub mod error;
pub mod ledger;
pub mod reply;
pub mod visibility;

pub use command::{parse_add_args, parse_ordinal};
pub use config::{ConfigError, DEFAULT_DAILY_LOAD_CAP, DEFAULT_STORE_PATH, TimetableConfig};
pub use constraint::{Admission, ConstraintChecker};
pub use error::{ErrorKind, ScheduleError};
pub use ledger::{AddOutcome, AddRequest, SeedOutcome, Timetable};
pub use reply::Reply;
pub use visibility::{VisibleEntry, resolve_ordinal, visible_entries};
