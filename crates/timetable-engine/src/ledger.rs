//! Schedule operations over one store file.
//!
//! Each mutating operation runs as a single lock-scoped transaction: the
//! store is loaded, checked, mutated and saved while `<store>.lock` is held,
//! and nothing is written when the operation fails with a storage error.

use crate::command::split_teacher_names;
use crate::config::TimetableConfig;
use crate::constraint::ConstraintChecker;
use crate::error::{ErrorKind, ScheduleError};
use crate::visibility::{VisibleEntry, resolve_ordinal, visible_entries};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use timetable_store::{Classroom, ClassroomSeed, LockPolicy, MemoryStore, mutate_store_jsonl};

/// A parsed add-entry request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub subject: String,
    /// Teacher names in listed order. Duplicates are kept.
    pub teachers: Vec<String>,
    pub classroom: u32,
}

impl AddRequest {
    /// Build a request from a subject, a `", "`-separated teacher list and a
    /// room number.
    pub fn new(subject: &str, teachers_raw: &str, classroom: u32) -> Result<Self, ScheduleError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ScheduleError::InvalidInput(
                "subject name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            subject: subject.to_string(),
            teachers: split_teacher_names(teachers_raw)?,
            classroom,
        })
    }
}

/// Result of a successful add.
///
/// An entry records a single teacher: the last one listed. Every listed
/// teacher passed the load check, but only `teacher` is counted against
/// later adds; `unrecorded_teachers` names the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOutcome {
    pub entry_id: u64,
    pub date: NaiveDate,
    pub subject: String,
    pub teacher: String,
    pub classroom: u32,
    pub unrecorded_teachers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedOutcome {
    pub created: Vec<Classroom>,
    pub classrooms: usize,
    pub created_store: bool,
}

/// Handle over one schedule store file.
#[derive(Debug, Clone)]
pub struct Timetable {
    store_path: PathBuf,
    checker: ConstraintChecker,
    lock: LockPolicy,
    classrooms: Vec<ClassroomSeed>,
}

impl Timetable {
    pub fn from_config(config: &TimetableConfig) -> Self {
        Self {
            store_path: config.store_path.clone(),
            checker: ConstraintChecker::new(config.daily_load_cap),
            lock: config.lock_policy(),
            classrooms: config.classrooms.clone(),
        }
    }

    /// Default rules and seed classrooms over `store_path`.
    pub fn open(store_path: impl Into<PathBuf>) -> Self {
        Self::from_config(&TimetableConfig {
            store_path: store_path.into(),
            ..TimetableConfig::default()
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn daily_load_cap(&self) -> usize {
        self.checker.daily_load_cap()
    }

    /// Seed missing classrooms and create the store file if needed.
    ///
    /// Safe on every start: existing classrooms are never modified.
    pub fn initialize(&self) -> Result<SeedOutcome, ScheduleError> {
        let created_store = !self.store_path.exists();
        let outcome = mutate_store_jsonl(&self.store_path, self.lock, |store| {
            let created = store.seed_classrooms(&self.classrooms);
            let outcome = SeedOutcome {
                classrooms: store.classrooms().count(),
                created_store,
                created,
            };
            let changed = created_store || !outcome.created.is_empty();
            Ok::<_, ScheduleError>((outcome, changed))
        })
        .map_err(ScheduleError::from_atomic("initialize"))?;

        tracing::info!(
            store = %self.store_path.display(),
            seeded = outcome.created.len(),
            classrooms = outcome.classrooms,
            "schedule store initialized"
        );
        Ok(outcome)
    }

    /// Add one entry on `date`.
    ///
    /// The subject is resolved first, then the candidate is validated. A
    /// rejected candidate still persists subjects and teachers created on the
    /// way; a storage failure persists nothing.
    pub fn add_entry(
        &self,
        request: &AddRequest,
        date: NaiveDate,
    ) -> Result<AddOutcome, ScheduleError> {
        let result = mutate_store_jsonl(&self.store_path, self.lock, |store| {
            let revision = store.revision();
            let verdict = self.admit(store, request, date);
            match verdict {
                Err(err) if err.kind() == ErrorKind::StorageFailure => Err(err),
                verdict => Ok((verdict, store.revision() != revision)),
            }
        })
        .map_err(ScheduleError::from_atomic("add"))?;

        match &result {
            Ok(outcome) => tracing::info!(
                entry = outcome.entry_id,
                subject = %outcome.subject,
                teacher = %outcome.teacher,
                classroom = outcome.classroom,
                %date,
                "lesson added"
            ),
            Err(err) => tracing::warn!(%err, subject = %request.subject, "lesson rejected"),
        }
        result
    }

    fn admit(
        &self,
        store: &mut MemoryStore,
        request: &AddRequest,
        date: NaiveDate,
    ) -> Result<AddOutcome, ScheduleError> {
        let (subject, _) = store
            .get_or_create_subject(&request.subject)
            .map_err(ScheduleError::from_store("add"))?;
        let mut admission =
            self.checker
                .validate(store, request.classroom, &request.teachers, date)?;

        let Some(teacher) = admission.teachers.pop() else {
            return Err(ScheduleError::InvalidInput(
                "at least one teacher is required".to_string(),
            ));
        };
        let entry_id = store
            .append_entry(subject.id, teacher.id, admission.classroom.id, date)
            .map_err(ScheduleError::from_store("add"))?
            .id;

        Ok(AddOutcome {
            entry_id,
            date,
            subject: subject.name,
            teacher: teacher.name,
            classroom: admission.classroom.number,
            unrecorded_teachers: admission
                .teachers
                .into_iter()
                .map(|teacher| teacher.name)
                .collect(),
        })
    }

    /// The visible listing for `date`.
    ///
    /// Reads a committed snapshot without taking the lock.
    pub fn list_day(&self, date: NaiveDate) -> Result<Vec<VisibleEntry>, ScheduleError> {
        let store = MemoryStore::load_jsonl_or_default(&self.store_path)
            .map_err(|err| ScheduleError::storage("list", err))?;
        Ok(visible_entries(&store, date))
    }

    /// Hide the entry at `ordinal` in the listing for `date`.
    ///
    /// The listing is recomputed under the store lock, so the ordinal refers
    /// to the state this call observes. Returns the hidden line as it was
    /// numbered before the hide.
    pub fn hide_by_ordinal(
        &self,
        ordinal: i64,
        date: NaiveDate,
    ) -> Result<VisibleEntry, ScheduleError> {
        let hidden = mutate_store_jsonl(&self.store_path, self.lock, |store| {
            let listing = visible_entries(store, date);
            let target = resolve_ordinal(&listing, ordinal)?.clone();
            let changed = store
                .hide_entry(target.entry_id)
                .map_err(ScheduleError::from_store("hide"))?;
            Ok((target, changed))
        })
        .map_err(ScheduleError::from_atomic("hide"));

        match &hidden {
            Ok(entry) => tracing::info!(ordinal, entry = entry.entry_id, %date, "lesson hidden"),
            Err(err) => tracing::warn!(%err, ordinal, "hide rejected"),
        }
        hidden
    }
}
