//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: request/response structures (the wire contract)
//!
//! # Endpoints
//!
//! - `POST /analyze` — compute ROI/CPA, persist, return suggestion + history
//! - `GET /history` — ten most-recent records, optionally scoped by `userId`
//!
//! Both are gated by the shared-secret middleware when an API key is
//! configured. OpenAPI documentation is served at `/docs`.

pub mod handlers;
pub mod models;
