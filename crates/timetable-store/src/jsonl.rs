//! JSONL storage: one line per record.
//!
//! Every record is a single JSON object tagged with its `kind`. The file is
//! always rewritten whole through a temp file and an atomic rename.

use crate::entity::{Classroom, Subject, Teacher};
use crate::entry::ScheduleEntry;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One persisted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Classroom(Classroom),
    Subject(Subject),
    Teacher(Teacher),
    Entry(ScheduleEntry),
}

/// Read records from a JSONL reader.
pub fn read_records(reader: impl BufRead) -> Result<Vec<Record>, JsonlError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: Record = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

/// Write records to a JSONL writer.
pub fn write_records(writer: &mut impl Write, records: &[Record]) -> Result<(), JsonlError> {
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Read records from a JSONL file path.
///
/// The whole file is checked before any line is parsed: a NUL byte or a
/// non-UTF-8 sequence means the store is corrupt, not merely malformed.
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<Record>, JsonlError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(io_error(path))?;
    let text = decode_store_text(path, &bytes)?;
    read_records(text.as_bytes())
}

/// Write records to a JSONL file path, replacing it atomically.
pub fn write_records_to_path(path: impl AsRef<Path>, records: &[Record]) -> Result<(), JsonlError> {
    let path = path.as_ref();
    let mut staged = StagedSnapshot::create(path)?;
    write_records(&mut staged.writer, records)?;
    staged.commit()?;

    let counts = KindCounts::of(records);
    tracing::debug!(
        path = %path.display(),
        classrooms = counts.classrooms,
        subjects = counts.subjects,
        teachers = counts.teachers,
        entries = counts.entries,
        "store snapshot written"
    );
    Ok(())
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> JsonlError + '_ {
    move |e| JsonlError::Io(0, format!("{}: {e}", path.display()))
}

fn decode_store_text<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a str, JsonlError> {
    let text = std::str::from_utf8(bytes).map_err(|_| {
        JsonlError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        ))
    })?;
    if text.contains('\0') {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    Ok(text)
}

/// A snapshot being written next to its target. Dropping it without
/// `commit` removes the staged file and leaves the target untouched.
struct StagedSnapshot {
    target: PathBuf,
    staged: PathBuf,
    writer: BufWriter<File>,
    committed: bool,
}

impl StagedSnapshot {
    fn create(target: &Path) -> Result<Self, JsonlError> {
        let dir = parent_dir(target);
        if let Some(dir) = dir {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut staged: OsString = target.as_os_str().to_os_string();
        staged.push(format!(".staged-{}-{nanos}", std::process::id()));
        let staged = PathBuf::from(staged);

        let file = File::create(&staged).map_err(io_error(&staged))?;
        Ok(Self {
            target: target.to_path_buf(),
            writer: BufWriter::new(file),
            staged,
            committed: false,
        })
    }

    /// Flush and fsync the staged file, rename it over the target, then
    /// fsync the directory so the rename itself is durable.
    fn commit(mut self) -> Result<(), JsonlError> {
        self.writer.flush().map_err(io_error(&self.staged))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(io_error(&self.staged))?;
        fs::rename(&self.staged, &self.target).map_err(|e| {
            JsonlError::Io(
                0,
                format!("{} -> {}: {e}", self.staged.display(), self.target.display()),
            )
        })?;
        self.committed = true;

        if let Some(dir) = parent_dir(&self.target) {
            File::open(dir)
                .and_then(|handle| handle.sync_all())
                .map_err(io_error(dir))?;
        }
        Ok(())
    }
}

impl Drop for StagedSnapshot {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.staged);
        }
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

#[derive(Default)]
struct KindCounts {
    classrooms: usize,
    subjects: usize,
    teachers: usize,
    entries: usize,
}

impl KindCounts {
    fn of(records: &[Record]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            match record {
                Record::Classroom(_) => counts.classrooms += 1,
                Record::Subject(_) => counts.subjects += 1,
                Record::Teacher(_) => counts.teachers += 1,
                Record::Entry(_) => counts.entries += 1,
            }
            counts
        })
    }
}

/// Errors from JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted store: {0}")]
    Corrupt(String),
}
