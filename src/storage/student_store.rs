//! The authoritative in-memory set of students, synchronized with a JSON file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info, warn};

use super::json_file::{FileContents, JsonFile};
use crate::domain::{Attendance, AttendanceStatus, StudentRecord};
use crate::error::{Result, RollcallError};

/// What happened when the data file was loaded.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of students now held in memory
    pub loaded: usize,
    /// Set when the whole file was unreadable and the store started empty
    pub corrupt: Option<RollcallError>,
    /// Entries that were dropped (missing fields, bad values, duplicate IDs)
    pub skipped: Vec<RollcallError>,
    /// Where the unreadable file was copied to, once the first save has replaced it
    pub backup: Option<PathBuf>,
    /// The unreadable file will be copied aside before the next save overwrites it
    pub backup_pending: bool,
}

impl LoadReport {
    /// True when the file was absent or read without losing anything
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_none() && self.skipped.is_empty()
    }

    /// Human-readable warnings, one per problem, for display at startup
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(err) = &self.corrupt {
            out.push(format!("{}. Attendance data may be lost.", err));
        }
        for err in &self.skipped {
            out.push(format!("Skipped entry: {}", err));
        }
        if let Some(path) = &self.backup {
            out.push(format!("Unreadable data was backed up to {}", path.display()));
        } else if self.backup_pending {
            out.push("Unreadable data will be backed up before the file is next written".to_string());
        }
        out
    }
}

/// Students keyed by ID, persisted in full after every change.
///
/// The only way to get a `StudentStore` is through `open`, which loads the
/// file immediately, so every instance is ready to use.
#[derive(Debug)]
pub struct StudentStore {
    file: JsonFile,
    records: HashMap<String, StudentRecord>,
    report: LoadReport,
}

impl StudentStore {
    /// Open the store backed by `path`, loading whatever is there.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(JsonFile::new(path))
    }

    /// Open the store backed by an already configured `JsonFile`.
    ///
    /// A missing or corrupt file yields an empty store; see `load_report`.
    /// Only I/O failures reading an existing file are returned as errors.
    pub fn open_with(file: JsonFile) -> Result<Self> {
        let mut store = Self {
            file,
            records: HashMap::new(),
            report: LoadReport::default(),
        };
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory state with the contents of the data file.
    pub fn load(&mut self) -> Result<&LoadReport> {
        let mut report = LoadReport::default();
        let mut records = HashMap::new();

        match self.file.read()? {
            FileContents::Missing => {
                debug!("No data file at {}, starting empty", self.file.path().display());
            }
            FileContents::Corrupt(reason) => {
                warn!(
                    "Corrupt data file {}: {}. Attendance data may be lost.",
                    self.file.path().display(),
                    reason
                );
                report.corrupt = Some(RollcallError::CorruptStore(reason));
                report.backup_pending = self.file.backup_corrupt();
            }
            FileContents::Entries(entries) => {
                for (index, entry) in entries.into_iter().enumerate() {
                    match StudentRecord::from_value(entry) {
                        Ok(record) => {
                            let id = record.id().to_string();
                            if records.insert(id.clone(), record).is_some() {
                                warn!("Duplicate student_id {} in data file, keeping the later entry", id);
                                report
                                    .skipped
                                    .push(RollcallError::MalformedRecord(format!("duplicate student_id {}", id)));
                            }
                        }
                        Err(e) => {
                            warn!("Skipping entry {} in {}: {}", index, self.file.path().display(), e);
                            report.skipped.push(e);
                        }
                    }
                }
                report.backup_pending = !report.skipped.is_empty() && self.file.backup_corrupt();
            }
        }

        report.loaded = records.len();
        info!("Loaded {} students from {}", report.loaded, self.file.path().display());

        self.records = records;
        self.report = report;
        Ok(&self.report)
    }

    /// Copy the unreadable file aside, once, before it is first overwritten.
    fn backup_unreadable(&mut self) -> Result<()> {
        if !self.report.backup_pending {
            return Ok(());
        }
        let path = self.file.backup()?;
        warn!("Backed up unreadable data file to {}", path.display());
        self.report.backup = Some(path);
        self.report.backup_pending = false;
        Ok(())
    }

    /// Write every student to the data file, ordered by ID.
    ///
    /// If the file held data that could not be loaded, it is backed up first;
    /// a failed backup aborts the save and leaves the file untouched.
    pub fn save(&mut self) -> Result<()> {
        self.backup_unreadable()?;

        let mut records: Vec<&StudentRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));

        let entries = records
            .iter()
            .map(|record| record.to_value())
            .collect::<Result<Vec<_>>>()?;

        self.file.write(&entries)?;
        debug!("Saved {} students to {}", entries.len(), self.file.path().display());
        Ok(())
    }

    /// Add a new student. Fails with `DuplicateId` and changes nothing if the ID is taken.
    pub fn add(&mut self, record: StudentRecord) -> Result<()> {
        if self.records.contains_key(record.id()) {
            return Err(RollcallError::DuplicateId(record.id().to_string()));
        }

        info!("Adding student {}", record.id());
        self.records.insert(record.id().to_string(), record);
        self.save()
    }

    /// Remove a student and return it. Fails with `NotFound` and changes nothing if absent.
    pub fn remove(&mut self, id: &str) -> Result<StudentRecord> {
        let record = self
            .records
            .remove(id)
            .ok_or_else(|| RollcallError::NotFound(id.to_string()))?;

        info!("Removed student {}", id);
        self.save()?;
        Ok(record)
    }

    /// Mark attendance for a student on a date, replacing any earlier mark.
    pub fn mark_attendance(&mut self, id: &str, date: NaiveDate, status: AttendanceStatus) -> Result<()> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| RollcallError::NotFound(id.to_string()))?;

        record.mark(date, status);
        info!("Marked {} {} on {}", id, status, date);
        self.save()
    }

    /// Attendance history for a student.
    pub fn get_attendance(&self, id: &str) -> Result<&Attendance> {
        self.records
            .get(id)
            .map(StudentRecord::attendance)
            .ok_or_else(|| RollcallError::NotFound(id.to_string()))
    }

    /// Look up a single student by ID.
    pub fn get(&self, id: &str) -> Option<&StudentRecord> {
        self.records.get(id)
    }

    /// All students, in no particular order.
    pub fn list_all(&self) -> Vec<&StudentRecord> {
        self.records.values().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path of the backing data file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Outcome of the most recent load
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }
}
