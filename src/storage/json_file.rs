//! Whole-file JSON array persistence.
//!
//! The data file is a single JSON array written with four-space indentation.
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! so a crash mid-write leaves the previous file intact. The replacement takes
//! the permissions of the file it replaces, and when the data path is a
//! symlink the link is kept and its target is the file rewritten.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;

const INDENT: &[u8] = b"    ";

/// What was found at the data file path.
#[derive(Debug)]
pub enum FileContents {
    /// No file yet (first run)
    Missing,
    /// The file parsed as a JSON array; entries are not yet validated
    Entries(Vec<serde_json::Value>),
    /// The file exists but is not a JSON array; holds the parse failure
    Corrupt(String),
}

/// A JSON array file on disk.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    backup_corrupt: bool,
}

impl JsonFile {
    /// Create a handle for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backup_corrupt: true,
        }
    }

    /// Whether unreadable files should be copied aside before being replaced.
    pub fn with_backup_corrupt(mut self, enabled: bool) -> Self {
        self.backup_corrupt = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_corrupt(&self) -> bool {
        self.backup_corrupt
    }

    /// Read and parse the whole file.
    ///
    /// A missing file and an unparsable file are both reported through
    /// `FileContents`; only genuine I/O failures (permissions, a directory in
    /// the way) are returned as errors.
    pub fn read(&self) -> Result<FileContents> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileContents::Missing),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, serde_json::Value>(reader) {
            Ok(serde_json::Value::Array(entries)) => Ok(FileContents::Entries(entries)),
            Ok(other) => Ok(FileContents::Corrupt(format!(
                "expected a JSON array, found {}",
                value_kind(&other)
            ))),
            Err(e) if e.is_io() => Err(std::io::Error::from(e).into()),
            Err(e) => Ok(FileContents::Corrupt(e.to_string())),
        }
    }

    /// Replace the file with `entries`, atomically via rename.
    pub fn write(&self, entries: &[serde_json::Value]) -> Result<()> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        entries.serialize(&mut ser)?;
        buf.push(b'\n');

        let target = self.write_target()?;
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let permissions = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let tmp = sibling(&target, ".tmp");
        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(&buf)?;
            if let Some(permissions) = permissions {
                file.set_permissions(permissions)?;
            }
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, &target)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!("Wrote {} entries to {}", entries.len(), target.display());
        Ok(())
    }

    /// The file a write replaces: the data path itself, or what it links to.
    fn write_target(&self) -> Result<PathBuf> {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = fs::read_link(&self.path)?;
                let target = match self.path.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
                debug!("{} links to {}", self.path.display(), target.display());
                Ok(target)
            }
            Ok(_) => Ok(self.path.clone()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy the current file to `<name>.corrupt-<timestamp>` and return the copy's path.
    pub fn backup(&self) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let mut target = sibling(&self.path, &format!(".corrupt-{}", stamp));
        let mut n = 1;
        while target.exists() {
            target = sibling(&self.path, &format!(".corrupt-{}-{}", stamp, n));
            n += 1;
        }
        fs::copy(&self.path, &target)?;
        Ok(target)
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("data"));
    name.push(suffix);
    path.with_file_name(name)
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
