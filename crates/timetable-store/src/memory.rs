//! Canonical in-memory representation of the schedule store.
//!
//! This is the memory boundary for `timetable-store`:
//! - load/store JSONL
//! - natural-key indexes that act as the storage-level uniqueness constraints
//! - deterministic entity and entry queries (ascending record id)

use crate::entity::{Classroom, ClassroomSeed, Subject, Teacher};
use crate::entry::ScheduleEntry;
use crate::jsonl::{JsonlError, Record, read_records_from_path, write_records_to_path};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

/// Errors raised while loading, querying or mutating the memory store.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("subject already exists: {0}")]
    DuplicateSubject(String),

    #[error("classroom already exists: {0}")]
    DuplicateClassroom(u32),

    #[error("entry {entry_id} references missing {kind} {id}")]
    DanglingReference {
        entry_id: u64,
        kind: &'static str,
        id: u64,
    },

    #[error("entry not found: {0}")]
    EntryNotFound(u64),
}

/// Canonical in-memory state for entities and schedule entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    subjects: BTreeMap<u64, Subject>,
    teachers: BTreeMap<u64, Teacher>,
    classrooms: BTreeMap<u64, Classroom>,
    entries: BTreeMap<u64, ScheduleEntry>,
    subject_by_name: BTreeMap<String, u64>,
    teacher_by_name: BTreeMap<String, u64>,
    classroom_by_number: BTreeMap<u32, u64>,
    revision: u64,
}

impl MemoryStore {
    /// Build a store from fully-materialized records.
    ///
    /// Records sharing a kind and id resolve last-write-wins. Duplicate
    /// subject names, duplicate classroom numbers and entries pointing at
    /// missing entities are rejected.
    pub fn from_records(records: Vec<Record>) -> Result<Self, MemoryStoreError> {
        let mut store = Self::default();
        for record in records {
            match record {
                Record::Subject(subject) => {
                    store.subjects.insert(subject.id, subject);
                }
                Record::Teacher(teacher) => {
                    store.teachers.insert(teacher.id, teacher);
                }
                Record::Classroom(classroom) => {
                    store.classrooms.insert(classroom.id, classroom);
                }
                Record::Entry(entry) => {
                    store.entries.insert(entry.id, entry);
                }
            }
        }

        for subject in store.subjects.values() {
            match store.subject_by_name.entry(subject.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(subject.id);
                }
                Entry::Occupied(_) => {
                    return Err(MemoryStoreError::DuplicateSubject(subject.name.clone()));
                }
            }
        }
        for classroom in store.classrooms.values() {
            match store.classroom_by_number.entry(classroom.number) {
                Entry::Vacant(slot) => {
                    slot.insert(classroom.id);
                }
                Entry::Occupied(_) => {
                    return Err(MemoryStoreError::DuplicateClassroom(classroom.number));
                }
            }
        }
        for teacher in store.teachers.values() {
            store
                .teacher_by_name
                .entry(teacher.name.clone())
                .or_insert(teacher.id);
        }
        for entry in store.entries.values() {
            store.check_references(entry)?;
        }

        Ok(store)
    }

    /// Load store state from a JSONL file.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, MemoryStoreError> {
        let records = read_records_from_path(path)?;
        Self::from_records(records)
    }

    /// Load store state, treating a missing file as an empty store.
    pub fn load_jsonl_or_default(path: impl AsRef<Path>) -> Result<Self, MemoryStoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_jsonl(path)
    }

    /// Persist store state to a JSONL file.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), MemoryStoreError> {
        write_records_to_path(path, &self.to_records())?;
        Ok(())
    }

    /// All records in persisted order: classrooms, subjects, teachers, entries.
    pub fn to_records(&self) -> Vec<Record> {
        self.classrooms
            .values()
            .cloned()
            .map(Record::Classroom)
            .chain(self.subjects.values().cloned().map(Record::Subject))
            .chain(self.teachers.values().cloned().map(Record::Teacher))
            .chain(self.entries.values().cloned().map(Record::Entry))
            .collect()
    }

    /// Counter bumped by every mutation since load. Not persisted.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subject(&self, id: u64) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    pub fn teacher(&self, id: u64) -> Option<&Teacher> {
        self.teachers.get(&id)
    }

    pub fn classroom(&self, id: u64) -> Option<&Classroom> {
        self.classrooms.get(&id)
    }

    pub fn entry(&self, id: u64) -> Option<&ScheduleEntry> {
        self.entries.get(&id)
    }

    pub fn find_subject(&self, name: &str) -> Option<&Subject> {
        self.subject_by_name
            .get(name)
            .and_then(|id| self.subjects.get(id))
    }

    /// Lowest-id teacher carrying `name`.
    pub fn find_teacher(&self, name: &str) -> Option<&Teacher> {
        self.teacher_by_name
            .get(name)
            .and_then(|id| self.teachers.get(id))
    }

    pub fn find_classroom(&self, number: u32) -> Option<&Classroom> {
        self.classroom_by_number
            .get(&number)
            .and_then(|id| self.classrooms.get(id))
    }

    /// Iterate subjects in id order.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    /// Iterate teachers in id order.
    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.values()
    }

    /// Iterate classrooms in id order.
    pub fn classrooms(&self) -> impl Iterator<Item = &Classroom> {
        self.classrooms.values()
    }

    /// Iterate entries in creation (id) order.
    pub fn entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.values()
    }

    /// Insert a new subject. Fails if the name is already taken.
    pub fn insert_subject(&mut self, name: &str) -> Result<&Subject, MemoryStoreError> {
        if name.trim().is_empty() {
            return Err(MemoryStoreError::EmptyName { kind: "subject" });
        }
        let id = next_id(&self.subjects);
        match self.subject_by_name.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(MemoryStoreError::DuplicateSubject(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        self.revision += 1;
        let subject = Subject {
            id,
            name: name.to_string(),
        };
        self.subjects.insert(id, subject);
        Ok(&self.subjects[&id])
    }

    /// Insert a new teacher record. Names may repeat across records.
    pub fn insert_teacher(&mut self, name: &str) -> Result<&Teacher, MemoryStoreError> {
        if name.trim().is_empty() {
            return Err(MemoryStoreError::EmptyName { kind: "teacher" });
        }
        let id = next_id(&self.teachers);
        self.teacher_by_name.entry(name.to_string()).or_insert(id);
        self.revision += 1;
        let teacher = Teacher {
            id,
            name: name.to_string(),
        };
        self.teachers.insert(id, teacher);
        Ok(&self.teachers[&id])
    }

    /// Insert a new classroom. Fails if the room number is already taken.
    pub fn insert_classroom(&mut self, seed: ClassroomSeed) -> Result<&Classroom, MemoryStoreError> {
        let id = next_id(&self.classrooms);
        match self.classroom_by_number.entry(seed.number) {
            Entry::Occupied(_) => return Err(MemoryStoreError::DuplicateClassroom(seed.number)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        self.revision += 1;
        let classroom = Classroom {
            id,
            number: seed.number,
            capacity: seed.capacity,
        };
        self.classrooms.insert(id, classroom);
        Ok(&self.classrooms[&id])
    }

    /// Return the subject named `name`, creating it on first use.
    ///
    /// The boolean is `true` when a record was created.
    pub fn get_or_create_subject(&mut self, name: &str) -> Result<(Subject, bool), MemoryStoreError> {
        if let Some(subject) = self.find_subject(name) {
            return Ok((subject.clone(), false));
        }
        let subject = self.insert_subject(name)?.clone();
        Ok((subject, true))
    }

    /// Return the teacher named `name`, creating it on first use.
    ///
    /// The boolean is `true` when a record was created.
    pub fn get_or_create_teacher(&mut self, name: &str) -> Result<(Teacher, bool), MemoryStoreError> {
        if let Some(teacher) = self.find_teacher(name) {
            return Ok((teacher.clone(), false));
        }
        let teacher = self.insert_teacher(name)?.clone();
        Ok((teacher, true))
    }

    /// Add every seed whose room number is missing. Existing rows are untouched.
    ///
    /// Returns the classrooms that were created.
    pub fn seed_classrooms(&mut self, seeds: &[ClassroomSeed]) -> Vec<Classroom> {
        let mut created = Vec::new();
        for seed in seeds {
            if self.find_classroom(seed.number).is_some() {
                continue;
            }
            if let Ok(classroom) = self.insert_classroom(*seed) {
                created.push(classroom.clone());
            }
        }
        created
    }

    /// Number of entries (hidden or not) for `teacher_id` on `date`.
    pub fn count_entries_for(&self, teacher_id: u64, date: NaiveDate) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.teacher_id == teacher_id && entry.date == date)
            .count()
    }

    /// Append a visible entry. All referenced records must exist.
    pub fn append_entry(
        &mut self,
        subject_id: u64,
        teacher_id: u64,
        classroom_id: u64,
        date: NaiveDate,
    ) -> Result<&ScheduleEntry, MemoryStoreError> {
        let entry = ScheduleEntry {
            id: next_id(&self.entries),
            subject_id,
            teacher_id,
            classroom_id,
            date,
            hidden: false,
        };
        self.check_references(&entry)?;
        self.revision += 1;
        let id = entry.id;
        self.entries.insert(id, entry);
        Ok(&self.entries[&id])
    }

    /// Hide one entry. Returns `false` if it was already hidden.
    pub fn hide_entry(&mut self, id: u64) -> Result<bool, MemoryStoreError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(MemoryStoreError::EntryNotFound(id))?;
        let changed = entry.hide();
        if changed {
            self.revision += 1;
        }
        Ok(changed)
    }

    fn check_references(&self, entry: &ScheduleEntry) -> Result<(), MemoryStoreError> {
        let dangling = |kind, id| MemoryStoreError::DanglingReference {
            entry_id: entry.id,
            kind,
            id,
        };
        if !self.subjects.contains_key(&entry.subject_id) {
            return Err(dangling("subject", entry.subject_id));
        }
        if !self.teachers.contains_key(&entry.teacher_id) {
            return Err(dangling("teacher", entry.teacher_id));
        }
        if !self.classrooms.contains_key(&entry.classroom_id) {
            return Err(dangling("classroom", entry.classroom_id));
        }
        Ok(())
    }
}

fn next_id<T>(map: &BTreeMap<u64, T>) -> u64 {
    map.keys().next_back().map_or(1, |id| id + 1)
}
