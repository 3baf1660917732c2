//! Database record structures matching table schemas.
//!
//! DB models are distinct from the API models in [`crate::api::models`]:
//! these mirror the `analyses` table, the API layer shapes its own wire
//! representation from them.

pub mod analyses;
