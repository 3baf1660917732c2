//! HTTP handlers for the analysis endpoints.

use crate::{
    AppState,
    api::models::analyses::{AnalyzeRequest, AnalyzeResponse, AnalysisRecordResponse, HistoryQuery},
    db::{
        handlers::{Analyses, AnalysisHistoryFilter},
        models::analyses::AnalysisCreateDBRequest,
    },
    errors::{Error, Result},
    metrics::{self, NO_CONVERSION_DATA, Suggestion},
};
use axum::{
    extract::{Query, State},
    response::Json,
};

/// Number of prior records embedded in an analyze response.
const EMBEDDED_HISTORY_LIMIT: i64 = 5;
/// Number of records returned by the history endpoint.
const HISTORY_LIMIT: i64 = 10;

/// Submit campaign figures for analysis
#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analyses",
    summary = "Analyze campaign figures",
    description = "Validates the submitted spend/revenue figures, computes ROI and cost-per-acquisition, persists the record, and returns a qualitative suggestion together with recent history for the same scope",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Metrics computed and record persisted", body = AnalyzeResponse),
        (status = 400, description = "Missing or non-positive required field"),
        (status = 403, description = "Missing or invalid API key"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Storage failure"),
    ),
    security(("ApiKeyAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn analyze(State(state): State<AppState>, Json(payload): Json<AnalyzeRequest>) -> Result<Json<AnalyzeResponse>> {
    // Single validation pass; nothing below runs for a rejected payload.
    let input = payload.validate()?;

    let roi = metrics::roi(input.ad_spend, input.revenue);
    let cpa = metrics::cpa(input.ad_spend, input.conversions);
    let suggestion = Suggestion::for_roi(roi);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Analyses::new(&mut conn);

    let record = repo
        .create(&AnalysisCreateDBRequest {
            ad_spend: input.ad_spend,
            revenue: input.revenue,
            conversions: input.conversions,
            roi,
            cpa,
            user_id: input.user_id.clone(),
        })
        .await?;

    // Prior records only: the row we just wrote is excluded from its own
    // embedded history.
    let history = repo
        .list_recent(&AnalysisHistoryFilter {
            user_id: input.user_id,
            exclude: Some(record.id),
            limit: EMBEDDED_HISTORY_LIMIT,
        })
        .await?;

    Ok(Json(AnalyzeResponse {
        roi: metrics::format_percent(roi),
        cpa: cpa
            .map(|value| metrics::format_currency(value, &state.config.currency))
            .unwrap_or_else(|| NO_CONVERSION_DATA.to_string()),
        suggestion: suggestion.message().to_string(),
        analysis_id: record.id,
        history: history.into_iter().map(AnalysisRecordResponse::from).collect(),
    }))
}

/// Fetch recent analysis history
#[utoipa::path(
    get,
    path = "/history",
    tag = "analyses",
    summary = "List recent analyses",
    description = "Returns the ten most-recent analysis records, newest first. Scoped to one correlation key when `userId` is supplied, across all records otherwise.",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Recent records, newest first", body = Vec<AnalysisRecordResponse>),
        (status = 403, description = "Missing or invalid API key"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Storage failure"),
    ),
    security(("ApiKeyAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn history(State(state): State<AppState>, Query(query): Query<HistoryQuery>) -> Result<Json<Vec<AnalysisRecordResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Analyses::new(&mut conn);

    let records = repo
        .list_recent(&AnalysisHistoryFilter {
            user_id: query.user_id,
            exclude: None,
            limit: HISTORY_LIMIT,
        })
        .await?;

    Ok(Json(records.into_iter().map(AnalysisRecordResponse::from).collect()))
}
