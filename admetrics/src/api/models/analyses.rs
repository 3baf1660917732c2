//! Wire models for the analysis endpoints.
//!
//! The JSON contract uses camelCase field names (`adSpend`, `userId`,
//! `analysisId`); everything internal stays snake_case. Request payloads
//! declare required fields as `Option` so that a missing field surfaces as a
//! [`ValidationError`] with a 400, not a deserialization rejection.

use crate::db::models::analyses::AnalysisDBResponse;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Enumerated input validation failures for a submission.
///
/// Field names in messages are the wire names the caller sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be a positive number")]
    NotPositive(&'static str),

    #[error("conversions must be a non-negative integer")]
    NegativeConversions,
}

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Campaign spend; required, must be > 0
    #[schema(value_type = f64)]
    pub ad_spend: Option<Decimal>,
    /// Campaign revenue; required, must be > 0
    #[schema(value_type = f64)]
    pub revenue: Option<Decimal>,
    /// Conversion count; defaults to 0
    pub conversions: Option<i64>,
    /// Optional free-text correlation key, scopes the embedded history
    pub user_id: Option<String>,
}

/// A submission that passed validation. Construction goes through
/// [`AnalyzeRequest::validate`]; no computation runs on anything else.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub ad_spend: Decimal,
    pub revenue: Decimal,
    pub conversions: i64,
    pub user_id: Option<String>,
}

impl AnalyzeRequest {
    /// Single validation pass: produces a typed input or the first
    /// enumerated failure. Nothing is persisted for a rejected payload.
    pub fn validate(&self) -> Result<AnalysisInput, ValidationError> {
        let ad_spend = self.ad_spend.ok_or(ValidationError::MissingField("adSpend"))?;
        if ad_spend <= Decimal::ZERO {
            return Err(ValidationError::NotPositive("adSpend"));
        }

        let revenue = self.revenue.ok_or(ValidationError::MissingField("revenue"))?;
        if revenue <= Decimal::ZERO {
            return Err(ValidationError::NotPositive("revenue"));
        }

        let conversions = self.conversions.unwrap_or(0);
        if conversions < 0 {
            return Err(ValidationError::NegativeConversions);
        }

        Ok(AnalysisInput {
            ad_spend,
            revenue,
            conversions,
            user_id: self.user_id.clone(),
        })
    }
}

/// One persisted record as returned in history listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecordResponse {
    pub id: Uuid,
    #[schema(value_type = f64)]
    pub ad_spend: Decimal,
    #[schema(value_type = f64)]
    pub revenue: Decimal,
    pub conversions: i64,
    /// ROI percentage as computed at submission time
    #[schema(value_type = f64)]
    pub roi: Decimal,
    /// Absent for records submitted without conversions
    #[schema(value_type = Option<f64>)]
    pub cpa: Option<Decimal>,
    /// Record creation time
    #[serde(rename = "date")]
    pub date: DateTime<Utc>,
    pub user_id: Option<String>,
}

impl From<AnalysisDBResponse> for AnalysisRecordResponse {
    fn from(db: AnalysisDBResponse) -> Self {
        Self {
            id: db.id,
            ad_spend: db.ad_spend,
            revenue: db.revenue,
            conversions: db.conversions,
            roi: db.roi,
            cpa: db.cpa,
            date: db.created_at,
            user_id: db.user_id,
        }
    }
}

/// Response body for `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Formatted ROI, e.g. `"150.00%"`
    pub roi: String,
    /// Formatted CPA with currency suffix, or the literal
    /// `"no conversion data"` indicator
    pub cpa: String,
    /// Recommendation text for the selected tier
    pub suggestion: String,
    /// Identifier of the record this submission created
    pub analysis_id: Uuid,
    /// The five most-recent prior records for this scope, newest first
    pub history: Vec<AnalysisRecordResponse>,
}

/// Query parameters for `GET /history`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// Scope history to this correlation key; omit for all records
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn request(ad_spend: Option<&str>, revenue: Option<&str>, conversions: Option<i64>) -> AnalyzeRequest {
        AnalyzeRequest {
            ad_spend: ad_spend.map(dec),
            revenue: revenue.map(dec),
            conversions,
            user_id: None,
        }
    }

    #[test]
    fn validate_accepts_complete_payload() {
        let input = request(Some("1000"), Some("2500"), Some(5)).validate().unwrap();
        assert_eq!(input.ad_spend, dec("1000"));
        assert_eq!(input.revenue, dec("2500"));
        assert_eq!(input.conversions, 5);
    }

    #[test]
    fn validate_defaults_conversions_to_zero() {
        let input = request(Some("1000"), Some("1200"), None).validate().unwrap();
        assert_eq!(input.conversions, 0);
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        assert_eq!(
            request(None, Some("2500"), None).validate().unwrap_err(),
            ValidationError::MissingField("adSpend")
        );
        assert_eq!(
            request(Some("1000"), None, None).validate().unwrap_err(),
            ValidationError::MissingField("revenue")
        );
    }

    #[test]
    fn validate_rejects_non_positive_figures() {
        assert_eq!(
            request(Some("0"), Some("2500"), None).validate().unwrap_err(),
            ValidationError::NotPositive("adSpend")
        );
        assert_eq!(
            request(Some("-10"), Some("2500"), None).validate().unwrap_err(),
            ValidationError::NotPositive("adSpend")
        );
        assert_eq!(
            request(Some("1000"), Some("0"), None).validate().unwrap_err(),
            ValidationError::NotPositive("revenue")
        );
    }

    #[test]
    fn validate_rejects_negative_conversions() {
        assert_eq!(
            request(Some("1000"), Some("2500"), Some(-1)).validate().unwrap_err(),
            ValidationError::NegativeConversions
        );
    }

    #[test]
    fn analyze_request_uses_camel_case_wire_names() {
        let parsed: AnalyzeRequest =
            serde_json::from_str(r#"{"adSpend": 1000, "revenue": 2500, "conversions": 5, "userId": "u-1"}"#).unwrap();
        assert_eq!(parsed.ad_spend, Some(dec("1000")));
        assert_eq!(parsed.user_id.as_deref(), Some("u-1"));
    }
}
