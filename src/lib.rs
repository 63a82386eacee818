//! roster - Terminal Student Records Library
//!
//! A validated student record store persisted to JSON, with search, sort and
//! CSV export, plus the terminal interface built on top of it.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
