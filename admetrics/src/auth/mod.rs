//! Access control for the analysis endpoints.
//!
//! Authentication is a static shared secret compared against the
//! `x-api-key` request header — deliberately not an identity or session
//! system. The check is optional: with no key configured the endpoints are
//! open, matching the service's minimal deployment mode.

pub mod middleware;

pub use middleware::require_api_key;
