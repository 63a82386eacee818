//! Application layer managing the record store and interactive state.
//!
//! This module owns the student collection through [`StudentStore`] and
//! coordinates user workflows through [`App`].

pub mod store;
pub mod state;

pub use store::*;
pub use state::*;
