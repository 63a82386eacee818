use thiserror::Error;

/// Errors produced by roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A required field was empty, the id is taken, or the age is not a positive integer.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No record carries the requested id.
    #[error("Student not found: {0}")]
    NotFound(String),

    /// The backing file could not be parsed; the collection was reset to empty.
    #[error("Corrupted data file: {0}")]
    CorruptedStore(String),

    /// Export was requested for an empty collection.
    #[error("No students to export")]
    EmptyCollection,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type RosterResult<T> = Result<T, RosterError>;
