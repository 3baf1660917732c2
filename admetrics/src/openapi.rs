//! OpenAPI documentation configuration.
//!
//! Interactive docs are served at `/docs` when the server is running.

use crate::api::{handlers, models};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::analyses::analyze, handlers::analyses::history),
    components(schemas(
        models::analyses::AnalyzeRequest,
        models::analyses::AnalyzeResponse,
        models::analyses::AnalysisRecordResponse,
    )),
    modifiers(&ApiKeySecurity),
    tags(
        (name = "analyses", description = "Campaign analysis submission and history")
    ),
    info(
        title = "admetrics",
        description = "Campaign spend analytics: ROI, cost-per-acquisition, and spend recommendations"
    )
)]
pub struct ApiDoc;

/// Registers the optional `x-api-key` scheme referenced by the endpoints.
struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "ApiKeyAuth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(crate::auth::middleware::API_KEY_HEADER))),
            );
        }
    }
}
