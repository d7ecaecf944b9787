//! Interactive menu over a `StudentStore`.
//!
//! Input and output are generic so the whole dialogue can be scripted in
//! tests. Everything typed by the user is validated here (non-empty fields,
//! `YYYY-MM-DD` dates, present/absent statuses) before the store is called.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use colored::*;
use log::debug;
use rollcall::{AttendanceStatus, DATE_FORMAT, StudentRecord, StudentStore};

/// Parse a `YYYY-MM-DD` date as typed by the user
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub struct Shell<'a, R, W> {
    store: &'a mut StudentStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(store: &'a mut StudentStore, input: R, output: W) -> Self {
        Self { store, input, output }
    }

    /// Run the menu until the user picks Exit or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.print_load_warnings()?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };
            debug!("Menu choice: {:?}", choice);

            match choice.as_str() {
                "1" => self.add_student()?,
                "2" => self.remove_student()?,
                "3" => self.mark_attendance()?,
                "4" => self.view_attendance()?,
                "5" => self.view_all()?,
                "6" => break,
                _ => self.error("Invalid choice. Please try again.")?,
            }
        }

        Ok(())
    }

    fn print_load_warnings(&mut self) -> io::Result<()> {
        for warning in self.store.load_report().warnings() {
            writeln!(self.output, "{} {}", "Warning:".yellow(), warning)?;
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "Student Attendance Management System".bold())?;
        writeln!(self.output, "1. Add Student")?;
        writeln!(self.output, "2. Remove Student")?;
        writeln!(self.output, "3. Mark Attendance")?;
        writeln!(self.output, "4. View Student Attendance")?;
        writeln!(self.output, "5. View All Students")?;
        writeln!(self.output, "6. Exit")
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `prompt`, but rejects empty answers with a message.
    fn prompt_required(&mut self, label: &str, field: &str) -> io::Result<Option<String>> {
        match self.prompt(label)? {
            Some(value) if value.is_empty() => {
                self.error(&format!("{} cannot be empty.", field))?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.green())
    }

    fn add_student(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_required("Enter Student ID: ", "Student ID")? else {
            return Ok(());
        };
        let Some(name) = self.prompt_required("Enter Student Name: ", "Student name")? else {
            return Ok(());
        };
        let Some(course) = self.prompt_required("Enter Student Course: ", "Student course")? else {
            return Ok(());
        };

        match self.store.add(StudentRecord::new(id.clone(), name, course)) {
            Ok(()) => self.success(&format!("Student {} added.", id)),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn remove_student(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_required("Enter Student ID to remove: ", "Student ID")? else {
            return Ok(());
        };

        match self.store.remove(&id) {
            Ok(record) => self.success(&format!("Student {} ({}) removed.", record.id(), record.name())),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn mark_attendance(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_required("Enter Student ID: ", "Student ID")? else {
            return Ok(());
        };
        let Some(date_input) = self.prompt("Enter date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let Some(date) = parse_date(&date_input) else {
            return self.error("Invalid date format. Please use YYYY-MM-DD.");
        };
        let choices: Vec<&str> = AttendanceStatus::all().iter().map(|s| s.as_str()).collect();
        let Some(status_input) = self.prompt(&format!("Enter attendance status ({}): ", choices.join("/")))? else {
            return Ok(());
        };
        let Ok(status) = status_input.parse::<AttendanceStatus>() else {
            return self.error("Invalid attendance status.");
        };

        match self.store.mark_attendance(&id, date, status) {
            Ok(()) => self.success(&format!("Marked {} {} on {}.", id, status, date)),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn view_attendance(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_required("Enter Student ID to view attendance: ", "Student ID")? else {
            return Ok(());
        };

        let lines: Vec<String> = match self.store.get_attendance(&id) {
            Ok(attendance) if attendance.is_empty() => {
                return writeln!(self.output, "No attendance recorded for {}.", id);
            }
            Ok(attendance) => attendance
                .iter()
                .map(|(date, status)| format!("{}: {}", date, status))
                .collect(),
            Err(e) => return self.error(&e.to_string()),
        };

        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn view_all(&mut self) -> io::Result<()> {
        let mut students = self.store.list_all();
        if students.is_empty() {
            return writeln!(self.output, "No students found.");
        }

        students.sort_by(|a, b| a.id().cmp(b.id()));
        let lines: Vec<String> = students
            .iter()
            .map(|s| format!("ID: {}, Name: {}, Course: {}", s.id(), s.name(), s.course()))
            .collect();

        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }
}
