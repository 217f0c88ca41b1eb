//! Core data model for documents
//!
//! Pure data structures: no terminal access, and file access only through
//! the persistence service when a buffer is opened.

pub mod buffer;
pub mod edit;
pub mod journal;
pub mod line_store;
pub mod registry;
