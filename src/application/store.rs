//! The student record store.
//!
//! [`StudentStore`] owns the authoritative in-memory collection, validates
//! every change before applying it, and rewrites the backing file after each
//! successful mutation.

use crate::domain::{
    RosterError, RosterResult, SortKey, Student, StudentPatch, StudentValidator, search_students,
    sort_students,
};
use crate::infrastructure::{CsvExporter, FileRepository};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default backing file name used when none is configured.
pub const DEFAULT_STORE_FILE: &str = "students.json";

/// In-memory student collection backed by a JSON file.
///
/// # Examples
///
/// ```no_run
/// use roster::application::StudentStore;
/// use roster::domain::SortKey;
///
/// let (mut store, load_error) = StudentStore::open("students.json");
/// assert!(load_error.is_none());
/// store.add("s1", "Alice", "20", "A").unwrap();
/// assert_eq!(store.view(Some(SortKey::Name)).len(), 1);
/// ```
#[derive(Debug)]
pub struct StudentStore {
    path: PathBuf,
    students: Vec<Student>,
    sort_key: Option<SortKey>,
}

impl StudentStore {
    /// Loads the collection from `path`.
    ///
    /// The store is always returned. When the file exists but cannot be read
    /// or parsed, the collection starts empty and the problem is handed back
    /// alongside the store so the caller can report it once.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<RosterError>) {
        let path = path.into();
        let (students, load_error) = match FileRepository::load_students(&path) {
            Ok(students) => (students, None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "starting with an empty collection");
                (Vec::new(), Some(e))
            }
        };
        debug!(path = %path.display(), count = students.len(), "loaded students");

        let store = Self {
            path,
            students,
            sort_key: None,
        };
        (store, load_error)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// The last key the collection was sorted by, if any.
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Writes the whole collection to the backing file.
    ///
    /// A failed save leaves the in-memory collection as it is.
    pub fn save(&self) -> RosterResult<()> {
        FileRepository::save_students(&self.students, &self.path)?;
        debug!(path = %self.path.display(), count = self.students.len(), "saved students");
        Ok(())
    }

    /// Validates and appends a new record, then saves.
    pub fn add(&mut self, id: &str, name: &str, age: &str, grade: &str) -> RosterResult<()> {
        let student = StudentValidator::new_student(&self.students, id, name, age, grade)?;
        self.students.push(student);
        info!(id, "added student");
        self.save()
    }

    /// Returns the collection, sorting it in place first when `sort_key` is given.
    pub fn view(&mut self, sort_key: Option<SortKey>) -> &[Student] {
        if let Some(key) = sort_key {
            sort_students(&mut self.students, key);
            self.sort_key = Some(key);
        }
        &self.students
    }

    /// Records whose id or name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Student> {
        let results = search_students(&self.students, query);
        debug!(query, matches = results.len(), "searched students");
        results
    }

    /// Overwrites the supplied non-empty fields of the record with `id`.
    ///
    /// All fields are validated before any is applied, so a bad age leaves
    /// name and grade untouched as well.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<&str>,
        age: Option<&str>,
        grade: Option<&str>,
    ) -> RosterResult<()> {
        let index = self.position(id)?;
        let patch = StudentPatch::parse(name, age, grade)?;
        if patch.is_empty() {
            debug!(id, "update supplied no fields");
        }
        patch.apply(&mut self.students[index]);
        info!(id, "updated student");
        self.save()
    }

    /// Removes the first record with `id` and returns it.
    pub fn delete(&mut self, id: &str) -> RosterResult<Student> {
        let index = self.position(id)?;
        let removed = self.students.remove(index);
        info!(id, "deleted student");
        self.save()?;
        Ok(removed)
    }

    /// Empties the collection when `confirmed` is true.
    ///
    /// Returns whether anything was cleared.
    pub fn clear_all(&mut self, confirmed: bool) -> RosterResult<bool> {
        if !confirmed {
            return Ok(false);
        }
        let count = self.students.len();
        self.students.clear();
        info!(count, "cleared all students");
        self.save()?;
        Ok(true)
    }

    /// Exports the collection in its current order to a CSV file at `path`.
    pub fn export_to_csv<F>(&self, path: impl AsRef<Path>, progress: F) -> RosterResult<usize>
    where
        F: FnMut(f64),
    {
        let path = path.as_ref();
        let rows = CsvExporter::export_students(&self.students, path, progress)?;
        info!(path = %path.display(), rows, "exported students to CSV");
        Ok(rows)
    }

    fn position(&self, id: &str) -> RosterResult<usize> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))
    }
}
