//! Campaign metric computation.
//!
//! This module is the computational core of the service: given validated
//! spend/revenue/conversion figures it derives ROI and cost-per-acquisition,
//! selects a qualitative suggestion tier, and formats the values for the API
//! response. Everything here is pure; persistence and HTTP concerns live in
//! [`crate::db`] and [`crate::api`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response indicator used in place of a CPA value when a submission carries
/// no conversions. The API contract returns this literal string rather than
/// omitting the field.
pub const NO_CONVERSION_DATA: &str = "no conversion data";

/// Return on investment as a percentage: `(revenue - ad_spend) / ad_spend * 100`.
///
/// Callers must guarantee `ad_spend > 0`; validation happens before any
/// computation runs.
pub fn roi(ad_spend: Decimal, revenue: Decimal) -> Decimal {
    (revenue - ad_spend) / ad_spend * Decimal::ONE_HUNDRED
}

/// Cost per acquisition: spend divided by conversion count.
///
/// Undefined (None) when there are no conversions.
pub fn cpa(ad_spend: Decimal, conversions: i64) -> Option<Decimal> {
    if conversions > 0 {
        Some(ad_spend / Decimal::from(conversions))
    } else {
        None
    }
}

/// Qualitative recommendation tier derived from ROI.
///
/// The thresholds are a three-way split on the raw (unrounded) ROI value.
/// Both boundaries are strict: an ROI of exactly 100 lands in the middle
/// tier, exactly 50 in the bottom tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    /// ROI > 100: the campaign more than doubled its spend.
    IncreaseBudget,
    /// 50 < ROI <= 100: working, but with room to improve.
    OptimizeTargeting,
    /// ROI <= 50: the channel is underperforming.
    RethinkChannels,
}

impl Suggestion {
    /// Select the tier for a computed ROI percentage.
    pub fn for_roi(roi: Decimal) -> Self {
        if roi > Decimal::ONE_HUNDRED {
            Suggestion::IncreaseBudget
        } else if roi > Decimal::from(50) {
            Suggestion::OptimizeTargeting
        } else {
            Suggestion::RethinkChannels
        }
    }

    /// Human-readable recommendation text returned to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::IncreaseBudget => {
                "Campaign is highly effective. Consider increasing the budget or expanding to new channels."
            }
            Suggestion::OptimizeTargeting => {
                "Campaign is acceptable. Consider optimizing targeting or creative."
            }
            Suggestion::RethinkChannels => {
                "Low ROI. Consider A/B testing or switching advertising channels."
            }
        }
    }
}

/// Round to two decimal places, half away from zero.
///
/// Matches the fixed-point presentation of the wire contract; the unrounded
/// value is what gets persisted and fed to the suggestion thresholds.
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an ROI value for the response, e.g. `"150.00%"`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round2(value))
}

/// Format a CPA value with its currency suffix, e.g. `"200.00 VND"`.
pub fn format_currency(value: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", round2(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn roi_matches_definition() {
        // (2500 - 1000) / 1000 * 100 = 150
        assert_eq!(roi(dec("1000"), dec("2500")), dec("150"));
        // (1200 - 1000) / 1000 * 100 = 20
        assert_eq!(roi(dec("1000"), dec("1200")), dec("20"));
        // Loss-making campaigns go negative.
        assert_eq!(roi(dec("1000"), dec("500")), dec("-50"));
    }

    #[test]
    fn cpa_is_spend_over_conversions() {
        assert_eq!(cpa(dec("1000"), 5), Some(dec("200")));
        assert_eq!(cpa(dec("1000"), 3), Some(dec("1000") / dec("3")));
    }

    #[test]
    fn cpa_absent_without_conversions() {
        assert_eq!(cpa(dec("1000"), 0), None);
    }

    #[test]
    fn suggestion_tiers() {
        assert_eq!(Suggestion::for_roi(dec("150")), Suggestion::IncreaseBudget);
        assert_eq!(Suggestion::for_roi(dec("75")), Suggestion::OptimizeTargeting);
        assert_eq!(Suggestion::for_roi(dec("20")), Suggestion::RethinkChannels);
        assert_eq!(Suggestion::for_roi(dec("-50")), Suggestion::RethinkChannels);
    }

    #[test]
    fn suggestion_boundaries_are_strict() {
        // Exactly 100 stays in the middle tier; the smallest step above moves up.
        assert_eq!(Suggestion::for_roi(dec("100.00")), Suggestion::OptimizeTargeting);
        assert_eq!(Suggestion::for_roi(dec("100.01")), Suggestion::IncreaseBudget);
        // Same policy at the lower boundary.
        assert_eq!(Suggestion::for_roi(dec("50.00")), Suggestion::RethinkChannels);
        assert_eq!(Suggestion::for_roi(dec("50.01")), Suggestion::OptimizeTargeting);
    }

    #[test]
    fn percent_formatting_pads_two_decimals() {
        assert_eq!(format_percent(dec("150")), "150.00%");
        assert_eq!(format_percent(dec("20")), "20.00%");
        assert_eq!(format_percent(dec("33.333")), "33.33%");
        // Half-away-from-zero, not banker's rounding.
        assert_eq!(format_percent(dec("12.345")), "12.35%");
        assert_eq!(format_percent(dec("-12.345")), "-12.35%");
    }

    #[test]
    fn currency_formatting_appends_suffix() {
        assert_eq!(format_currency(dec("200"), "VND"), "200.00 VND");
        assert_eq!(format_currency(dec("1000") / dec("3"), "VND"), "333.33 VND");
        assert_eq!(format_currency(dec("19.999"), "USD"), "20.00 USD");
    }
}
