//! I/O module
//!
//! Handles dataset directory CSV parsing and output.
//!
//! # Components
//!
//! - `dataset` - Dataset directory loading, validation and persistence

pub mod dataset;

pub use dataset::{save, write_jobs_csv, write_profiles_csv, Dataset};
