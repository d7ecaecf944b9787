//! Domain types for Rollcall
//!
//! - StudentRecord: one student's identity plus attendance history
//! - AttendanceStatus: the closed set of statuses a date can carry

pub mod status;
pub mod student;

pub use status::AttendanceStatus;
pub use student::{Attendance, DATE_FORMAT, StudentRecord};
