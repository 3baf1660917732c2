//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection, provides strongly-typed
//! operations, handles query construction and parameter binding, and returns
//! records from [`crate::db::models`].
//!
//! # Available Repositories
//!
//! - [`Analyses`]: campaign analysis records (create + bounded history reads)

pub mod analyses;

pub use analyses::{Analyses, AnalysisHistoryFilter};
