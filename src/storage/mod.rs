//! Storage layer for Rollcall - a single JSON file holding every student.
//!
//! `JsonFile` knows how to read, atomically rewrite and back up the file;
//! `StudentStore` owns the in-memory map and rewrites the file after every
//! change.

mod json_file;
mod student_store;

pub use json_file::{FileContents, JsonFile};
pub use student_store::{LoadReport, StudentStore};
