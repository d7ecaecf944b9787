//! Rollcall - student attendance tracking
//!
//! Keeps students and their per-date attendance in memory and mirrors every
//! change to a flat JSON file.

pub mod domain;
pub mod error;
pub mod storage;

pub use domain::{Attendance, AttendanceStatus, DATE_FORMAT, StudentRecord};
pub use error::{Result, RollcallError};
pub use storage::{JsonFile, LoadReport, StudentStore};
