//! Admission rules for a candidate entry.
//!
//! Rules run in order and stop at the first failure:
//! 1. the classroom must exist;
//! 2. each listed teacher (resolved or created on the way) must have fewer
//!    than `daily_load_cap` entries on the date, hidden ones included.
//!
//! Teachers are created as they are visited, so a rejected candidate can
//! still leave new teacher records in the store.

use crate::error::ScheduleError;
use chrono::NaiveDate;
use timetable_store::{Classroom, MemoryStore, Teacher};

/// A candidate that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub classroom: Classroom,
    /// Resolved teachers in input order.
    pub teachers: Vec<Teacher>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintChecker {
    daily_load_cap: usize,
}

impl ConstraintChecker {
    pub fn new(daily_load_cap: usize) -> Self {
        Self { daily_load_cap }
    }

    pub fn daily_load_cap(&self) -> usize {
        self.daily_load_cap
    }

    pub fn validate(
        &self,
        store: &mut MemoryStore,
        classroom_number: u32,
        teacher_names: &[String],
        date: NaiveDate,
    ) -> Result<Admission, ScheduleError> {
        let classroom = store
            .find_classroom(classroom_number)
            .cloned()
            .ok_or(ScheduleError::ClassroomNotFound {
                number: classroom_number,
            })?;

        let mut teachers = Vec::with_capacity(teacher_names.len());
        for name in teacher_names {
            let (teacher, created) = store
                .get_or_create_teacher(name)
                .map_err(ScheduleError::from_store("add"))?;
            if created {
                tracing::debug!(teacher = %teacher.name, id = teacher.id, "teacher created");
            }

            let load = store.count_entries_for(teacher.id, date);
            if load >= self.daily_load_cap {
                return Err(ScheduleError::TeacherLoadExceeded {
                    teacher: teacher.name,
                    cap: self.daily_load_cap,
                });
            }
            teachers.push(teacher);
        }

        if teachers.is_empty() {
            return Err(ScheduleError::InvalidInput(
                "at least one teacher is required".to_string(),
            ));
        }

        Ok(Admission {
            classroom,
            teachers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use timetable_store::ClassroomSeed;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.seed_classrooms(&[ClassroomSeed::new(101, 30)]);
        store
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    fn fill(store: &mut MemoryStore, teacher: &str, count: usize) {
        let (subject, _) = store.get_or_create_subject("Math").expect("subject");
        let (teacher, _) = store.get_or_create_teacher(teacher).expect("teacher");
        let room = store.find_classroom(101).expect("room").id;
        for _ in 0..count {
            store
                .append_entry(subject.id, teacher.id, room, day())
                .expect("entry");
        }
    }

    #[test]
    fn missing_classroom_is_checked_before_teachers() {
        let mut store = store();
        let err = ConstraintChecker::new(5)
            .validate(&mut store, 999, &names(&["Jones"]), day())
            .expect_err("missing room must fail");
        assert_eq!(err, ScheduleError::ClassroomNotFound { number: 999 });
        assert!(store.find_teacher("Jones").is_none());
    }

    #[test]
    fn admission_keeps_teacher_order() {
        let mut store = store();
        let admission = ConstraintChecker::new(5)
            .validate(&mut store, 101, &names(&["Kim", "Lee"]), day())
            .expect("candidate should pass");
        let order: Vec<&str> = admission
            .teachers
            .iter()
            .map(|teacher| teacher.name.as_str())
            .collect();
        assert_eq!(order, vec!["Kim", "Lee"]);
        assert_eq!(admission.classroom.number, 101);
    }

    #[test]
    fn teacher_at_cap_is_rejected_by_name() {
        let mut store = store();
        fill(&mut store, "Lee", 5);
        let err = ConstraintChecker::new(5)
            .validate(&mut store, 101, &names(&["Lee"]), day())
            .expect_err("sixth lesson must fail");
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(
            err,
            ScheduleError::TeacherLoadExceeded {
                teacher: "Lee".to_string(),
                cap: 5
            }
        );
    }

    #[test]
    fn teachers_created_before_rejection_remain() {
        let mut store = store();
        fill(&mut store, "Lee", 5);
        let err = ConstraintChecker::new(5)
            .validate(&mut store, 101, &names(&["Kim", "Lee", "Park"]), day())
            .expect_err("Lee is at cap");
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert!(store.find_teacher("Kim").is_some());
        assert!(store.find_teacher("Park").is_none());
    }

    #[test]
    fn load_on_other_dates_does_not_count() {
        let mut store = store();
        fill(&mut store, "Lee", 5);
        let tomorrow = day().succ_opt().expect("next day");
        ConstraintChecker::new(5)
            .validate(&mut store, 101, &names(&["Lee"]), tomorrow)
            .expect("other day has no load");
    }
}
