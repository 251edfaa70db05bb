//! The database entities of the esports community website.
//!
//! Each module of the crate root represents a table. The [`types`] module contains the types
//! of the enum-like columns.

mod entities;
pub use entities::*;

pub mod types;
