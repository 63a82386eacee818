use crate::domain::{RosterError, RosterResult, Student};
use std::path::Path;

pub const CSV_HEADER: [&str; 4] = ["ID", "Name", "Age", "Grade"];

pub struct CsvExporter;

impl CsvExporter {
    /// Writes `students` to `path` as CSV, calling `progress` with the
    /// cumulative percentage after every row.
    ///
    /// Nothing is created when `students` is empty. Returns the number of
    /// data rows written.
    pub fn export_students<F>(students: &[Student], path: &Path, mut progress: F) -> RosterResult<usize>
    where
        F: FnMut(f64),
    {
        if students.is_empty() {
            return Err(RosterError::EmptyCollection);
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CSV_HEADER)?;

        let total = students.len();
        for (i, student) in students.iter().enumerate() {
            let age = student.age.to_string();
            writer.write_record([
                student.id.as_str(),
                student.name.as_str(),
                age.as_str(),
                student.grade.as_str(),
            ])?;
            progress((i + 1) as f64 / total as f64 * 100.0);
        }

        writer.flush()?;
        Ok(total)
    }
}
