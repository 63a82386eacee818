use crate::domain::{RosterError, RosterResult, Student, StudentValidator};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct FileRepository;

impl FileRepository {
    /// Overwrites `path` with the whole collection as a pretty-printed JSON array.
    pub fn save_students(students: &[Student], path: &Path) -> RosterResult<()> {
        let json = serde_json::to_string_pretty(students).map_err(std::io::Error::from)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads the collection stored at `path`.
    ///
    /// A missing file is an empty collection. Unparsable content, or content
    /// that breaks a record invariant, is reported as `CorruptedStore`.
    pub fn load_students(path: &Path) -> RosterResult<Vec<Student>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let students: Vec<Student> = serde_json::from_str(&content)
            .map_err(|e| RosterError::CorruptedStore(format!("Invalid file format - {}", e)))?;
        StudentValidator::check_collection(&students)
            .map_err(|e| RosterError::CorruptedStore(e.to_string()))?;
        Ok(students)
    }
}
