//! Pure domain logic for the GenWise content manager.
//!
//! Nothing in this crate performs I/O. The `db` crate feeds it raw rows and
//! the `api` crate serves its derived view models.

pub mod clip_import;
pub mod content;
pub mod error;
pub mod publishing;
pub mod search;
pub mod tags;
pub mod types;
