//! Validation, ordering and filtering rules for student records.
//!
//! These functions hold the business rules of the roster and know nothing
//! about files or terminals. The store in the application layer calls them
//! before touching its collection.

use crate::domain::{RosterError, RosterResult, SortKey, Student};

/// Validation rules applied to user-supplied field text.
pub struct StudentValidator;

impl StudentValidator {
    /// Rejects an empty field, naming it in the error.
    pub fn require(field: &str, value: &str) -> RosterResult<()> {
        if value.is_empty() {
            return Err(RosterError::Validation(format!("{} is required", field)));
        }
        Ok(())
    }

    /// Parses age text into a strictly positive integer.
    ///
    /// Surrounding whitespace is ignored. Non-numeric, negative and zero
    /// values are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster::domain::StudentValidator;
    ///
    /// assert_eq!(StudentValidator::parse_age("7").unwrap(), 7);
    /// assert!(StudentValidator::parse_age("0").is_err());
    /// assert!(StudentValidator::parse_age("abc").is_err());
    /// ```
    pub fn parse_age(text: &str) -> RosterResult<u32> {
        match text.trim().parse::<u32>() {
            Ok(age) if age > 0 => Ok(age),
            _ => Err(RosterError::Validation(
                "Age must be a positive integer".to_string(),
            )),
        }
    }

    /// Builds a new record from raw field text, checking every field and the
    /// uniqueness of the id against `existing`.
    pub fn new_student(
        existing: &[Student],
        id: &str,
        name: &str,
        age: &str,
        grade: &str,
    ) -> RosterResult<Student> {
        Self::require("ID", id)?;
        Self::require("Name", name)?;
        Self::require("Grade", grade)?;
        if existing.iter().any(|s| s.id == id) {
            return Err(RosterError::Validation(format!(
                "Student ID already exists: {}",
                id
            )));
        }
        let age = Self::parse_age(age)?;
        Ok(Student::new(id, name, age, grade))
    }

    /// Checks that a loaded collection satisfies every record invariant.
    pub fn check_collection(students: &[Student]) -> RosterResult<()> {
        let mut seen = std::collections::HashSet::new();
        for student in students {
            Self::require("ID", &student.id)?;
            Self::require("Name", &student.name)?;
            Self::require("Grade", &student.grade)?;
            if student.age == 0 {
                return Err(RosterError::Validation(format!(
                    "Student {} has age 0",
                    student.id
                )));
            }
            if !seen.insert(student.id.as_str()) {
                return Err(RosterError::Validation(format!(
                    "Duplicate student ID: {}",
                    student.id
                )));
            }
        }
        Ok(())
    }
}

/// A validated partial update; `None` fields keep their current value.
#[derive(Debug, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub grade: Option<String>,
}

impl StudentPatch {
    /// Validates every supplied field up front so that nothing is applied
    /// unless everything is valid. Empty strings count as omitted.
    pub fn parse(name: Option<&str>, age: Option<&str>, grade: Option<&str>) -> RosterResult<Self> {
        fn supplied(field: Option<&str>) -> Option<&str> {
            field.filter(|v| !v.is_empty())
        }

        Ok(Self {
            name: supplied(name).map(str::to_string),
            age: supplied(age).map(StudentValidator::parse_age).transpose()?,
            grade: supplied(grade).map(str::to_string),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.grade.is_none()
    }

    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(grade) = self.grade {
            student.grade = grade;
        }
    }
}

/// Stable in-place sort of the collection by `key`.
pub fn sort_students(students: &mut [Student], key: SortKey) {
    match key {
        SortKey::Id => students.sort_by(|a, b| a.id.cmp(&b.id)),
        SortKey::Name => students.sort_by_key(|s| s.name.to_lowercase()),
        SortKey::Age => students.sort_by_key(|s| s.age),
        SortKey::Grade => students.sort_by_key(|s| s.grade.to_lowercase()),
    }
}

/// Case-insensitive substring match against id or name.
pub fn search_students(students: &[Student], query: &str) -> Vec<Student> {
    let query = query.to_lowercase();
    students
        .iter()
        .filter(|s| s.id.to_lowercase().contains(&query) || s.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
