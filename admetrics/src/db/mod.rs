//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: API handlers talk to a repository
//! ([`handlers::Analyses`]), the repository runs queries and returns records
//! from [`models`], and failures are categorized into [`errors::DbError`].
//!
//! Analysis records are immutable once written: the repository exposes
//! create and read operations only.
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/`
//! directory. The [`crate::migrator`] function provides access to the
//! migrator and is run automatically at startup.

pub mod errors;
pub mod handlers;
pub mod models;
