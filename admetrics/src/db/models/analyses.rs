//! Database models for campaign analysis records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Database request for persisting a new analysis record.
///
/// `roi` and `cpa` are computed before the write; the database never derives
/// them itself.
#[derive(Debug, Clone)]
pub struct AnalysisCreateDBRequest {
    pub ad_spend: Decimal,
    pub revenue: Decimal,
    pub conversions: i64,
    pub roi: Decimal,
    /// None when the submission carried no conversions.
    pub cpa: Option<Decimal>,
    pub user_id: Option<String>,
}

/// Database response for an analysis record.
#[derive(Debug, Clone)]
pub struct AnalysisDBResponse {
    pub id: Uuid,
    pub ad_spend: Decimal,
    pub revenue: Decimal,
    pub conversions: i64,
    pub roi: Decimal,
    pub cpa: Option<Decimal>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
