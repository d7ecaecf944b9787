//! Student record and attendance history
//!
//! A `StudentRecord` holds one student's identity and the per-date attendance
//! marks recorded against them. The record knows nothing about persistence;
//! `StudentStore` owns saving.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};

use super::status::AttendanceStatus;
use crate::error::{Result, RollcallError};

/// Attendance history keyed by calendar date
pub type Attendance = BTreeMap<NaiveDate, AttendanceStatus>;

/// On-disk form of an attendance date key
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One student and their attendance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    //=== Identity ===
    /// Unique identifier, stored as `student_id`. Never changes after creation.
    #[serde(rename = "student_id")]
    id: String,

    name: String,

    course: String,

    //=== History ===
    /// One status per date; later marks overwrite earlier ones
    #[serde(default, deserialize_with = "deserialize_attendance")]
    attendance: Attendance,
}

impl StudentRecord {
    /// Create a record with an empty attendance history
    pub fn new(id: impl Into<String>, name: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            course: course.into(),
            attendance: Attendance::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    /// Record `status` for `date`, replacing any earlier mark for that date.
    pub fn mark(&mut self, date: NaiveDate, status: AttendanceStatus) {
        self.attendance.insert(date, status);
    }

    /// Full attendance history, ordered by date
    pub fn attendance(&self) -> &Attendance {
        &self.attendance
    }

    /// Status recorded for a single date, if any
    pub fn status_on(&self, date: NaiveDate) -> Option<AttendanceStatus> {
        self.attendance.get(&date).copied()
    }

    /// Structural form: `{student_id, name, course, attendance}`
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a record from its structural form.
    ///
    /// Fails with `MalformedRecord` when `student_id`, `name` or `course` is
    /// missing, or when any field has the wrong shape (including attendance
    /// dates that are not `YYYY-MM-DD` and statuses other than present/absent).
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| RollcallError::MalformedRecord(e.to_string()))
    }
}

/// Accept only zero-padded `YYYY-MM-DD` keys. chrono alone also parses
/// `2024-1-5`, which would silently fold into `2024-01-05`.
fn deserialize_attendance<'de, D>(deserializer: D) -> std::result::Result<Attendance, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, AttendanceStatus>::deserialize(deserializer)?;
    let mut attendance = Attendance::new();
    for (key, status) in raw {
        let date = NaiveDate::parse_from_str(&key, DATE_FORMAT)
            .ok()
            .filter(|d| d.format(DATE_FORMAT).to_string() == key)
            .ok_or_else(|| de::Error::custom(format!("invalid attendance date `{}`, expected YYYY-MM-DD", key)))?;
        attendance.insert(date, status);
    }
    Ok(attendance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_new_has_empty_attendance() {
        let record = StudentRecord::new("S1", "Ada", "CS");
        assert_eq!(record.id(), "S1");
        assert_eq!(record.name(), "Ada");
        assert_eq!(record.course(), "CS");
        assert!(record.attendance().is_empty());
    }

    #[test]
    fn test_mark_overwrites_same_date() {
        let mut record = StudentRecord::new("S1", "Ada", "CS");
        record.mark(date("2024-01-10"), AttendanceStatus::Present);
        record.mark(date("2024-01-10"), AttendanceStatus::Absent);

        assert_eq!(record.attendance().len(), 1);
        assert_eq!(record.status_on(date("2024-01-10")), Some(AttendanceStatus::Absent));
    }

    #[test]
    fn test_attendance_is_ordered_by_date() {
        let mut record = StudentRecord::new("S1", "Ada", "CS");
        record.mark(date("2024-03-01"), AttendanceStatus::Present);
        record.mark(date("2024-01-15"), AttendanceStatus::Absent);
        record.mark(date("2024-02-20"), AttendanceStatus::Present);

        let dates: Vec<String> = record.attendance().keys().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-02-20", "2024-03-01"]);
    }

    #[test]
    fn test_status_on_unmarked_date() {
        let record = StudentRecord::new("S1", "Ada", "CS");
        assert_eq!(record.status_on(date("2024-01-10")), None);
    }

    #[test]
    fn test_to_value_shape() {
        let mut record = StudentRecord::new("S1", "Ada", "CS");
        record.mark(date("2024-01-10"), AttendanceStatus::Present);

        let value = record.to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "student_id": "S1",
                "name": "Ada",
                "course": "CS",
                "attendance": { "2024-01-10": "present" }
            })
        );
    }

    #[test]
    fn test_from_value_reads_stored_shape() {
        let value = json!({
            "student_id": "S2",
            "name": "Grace",
            "course": "Math",
            "attendance": { "2024-01-10": "absent", "2024-01-11": "present" }
        });

        let record = StudentRecord::from_value(value).unwrap();
        assert_eq!(record.id(), "S2");
        assert_eq!(record.status_on(date("2024-01-10")), Some(AttendanceStatus::Absent));
        assert_eq!(record.status_on(date("2024-01-11")), Some(AttendanceStatus::Present));
    }

    #[test]
    fn test_from_value_missing_attendance_is_empty() {
        let value = json!({ "student_id": "S3", "name": "Alan", "course": "CS" });
        let record = StudentRecord::from_value(value).unwrap();
        assert!(record.attendance().is_empty());
    }

    #[test]
    fn test_from_value_missing_required_field() {
        let value = json!({ "student_id": "S3", "course": "CS", "attendance": {} });
        let err = StudentRecord::from_value(value).unwrap_err();
        match err {
            RollcallError::MalformedRecord(msg) => assert!(msg.contains("name")),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_from_value_rejects_bad_status() {
        let value = json!({
            "student_id": "S4",
            "name": "Edsger",
            "course": "CS",
            "attendance": { "2024-01-10": "late" }
        });
        assert!(matches!(
            StudentRecord::from_value(value),
            Err(RollcallError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_from_value_rejects_bad_date() {
        let value = json!({
            "student_id": "S5",
            "name": "Barbara",
            "course": "CS",
            "attendance": { "10/01/2024": "present" }
        });
        assert!(matches!(
            StudentRecord::from_value(value),
            Err(RollcallError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_from_value_rejects_unpadded_date() {
        let value = json!({
            "student_id": "S6",
            "name": "Donald",
            "course": "CS",
            "attendance": { "2024-1-5": "present" }
        });
        match StudentRecord::from_value(value) {
            Err(RollcallError::MalformedRecord(msg)) => assert!(msg.contains("2024-1-5")),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_from_value_does_not_merge_equivalent_dates() {
        let value = json!({
            "student_id": "S6",
            "name": "Donald",
            "course": "CS",
            "attendance": { "2024-1-5": "present", "2024-01-05": "absent" }
        });
        assert!(matches!(
            StudentRecord::from_value(value),
            Err(RollcallError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(matches!(
            StudentRecord::from_value(json!("S1")),
            Err(RollcallError::MalformedRecord(_))
        ));
    }
}
