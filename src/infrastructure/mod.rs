//! Infrastructure layer providing file-system integrations.
//!
//! This module contains the JSON backing-file repository and the CSV
//! exporter used by the student store.

pub mod persistence;
pub mod csv_export;

pub use persistence::*;
pub use csv_export::*;
