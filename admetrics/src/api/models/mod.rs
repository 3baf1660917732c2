//! API request and response data models.
//!
//! These structures define the public API contract. They are distinct from
//! the database models in [`crate::db::models`] so that the wire format
//! (camelCase, formatted metric strings) can evolve independently of the
//! storage representation. All models are annotated with `utoipa` for the
//! generated API docs.

pub mod analyses;
