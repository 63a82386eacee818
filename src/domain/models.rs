use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single student record as stored in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub grade: String,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: u32, grade: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            grade: grade.into(),
        }
    }

    /// Whether the grade counts as an honours grade (A or B) for display.
    pub fn is_honours(&self) -> bool {
        matches!(self.grade.to_uppercase().as_str(), "A" | "B")
    }
}

/// Column used to reorder the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Age,
    Grade,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Id, SortKey::Name, SortKey::Age, SortKey::Grade];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Age => "age",
            SortKey::Grade => "grade",
        }
    }

    /// Returns the key after this one, wrapping from `grade` back to `id`.
    pub fn next(self) -> Self {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name => SortKey::Age,
            SortKey::Age => SortKey::Grade,
            SortKey::Grade => SortKey::Id,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == lowered)
            .ok_or_else(|| format!("Unknown sort key: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("age".parse::<SortKey>(), Ok(SortKey::Age));
        assert_eq!("Name".parse::<SortKey>(), Ok(SortKey::Name));
        assert_eq!(" grade ".parse::<SortKey>(), Ok(SortKey::Grade));
        assert!("height".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_key_cycle() {
        let mut key = SortKey::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(key);
            key = key.next();
        }
        assert_eq!(seen, SortKey::ALL.to_vec());
        assert_eq!(key, SortKey::Id);
    }

    #[test]
    fn test_honours_grade() {
        assert!(Student::new("1", "Ann", 10, "a").is_honours());
        assert!(Student::new("2", "Ben", 11, "B").is_honours());
        assert!(!Student::new("3", "Cy", 12, "C").is_honours());
        assert!(!Student::new("4", "Di", 12, "A+").is_honours());
    }

    #[test]
    fn test_student_json_shape() {
        let student = Student::new("s1", "Alice", 7, "A");
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json, serde_json::json!({"id": "s1", "name": "Alice", "age": 7, "grade": "A"}));
    }
}
