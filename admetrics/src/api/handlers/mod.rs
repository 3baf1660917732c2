//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for request validation and deserialization,
//! business logic execution via the database repositories, and response
//! serialization. Authentication and rate limiting run as middleware before
//! any handler is reached.
//!
//! Handlers return [`crate::errors::Error`] which converts to the
//! appropriate HTTP status code and JSON error body.

pub mod analyses;
