//! One-year roll-forward of an asset balance
//!
//! Order of operations within a year:
//! 1. lump sums whose age matches the owner's age
//! 2. every active period's indexed contribution or withdrawal
//! 3. growth at the effective rate, floored at zero
//!
//! When several active periods carry a `rate_of_return` override, the last
//! one in the asset's period list wins.

use serde::{Deserialize, Serialize};

use super::income::indexed_amount;
use crate::household::{Asset, AssetCategory};

/// Breakdown of one asset's year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetYear {
    pub opening_balance: f64,

    /// Net lump-sum flow (contributions minus withdrawals)
    pub lump_sum_flow: f64,

    /// Net flow from active periods
    pub period_flow: f64,

    /// Annual return applied, percent
    pub effective_rate: f64,

    pub closing_balance: f64,
}

/// Advance `asset` by one year from `opening_balance`.
///
/// With an unknown owner age no lump sum or period fires and the asset
/// simply grows at its default rate.
pub fn advance_asset(asset: &Asset, age: Option<i32>, opening_balance: f64) -> AssetYear {
    let mut lump_sum_flow = 0.0;
    let mut period_flow = 0.0;
    let mut rate_override = None;

    if let Some(age) = age {
        for lump_sum in asset.lump_sums.iter().filter(|ls| ls.age == age) {
            lump_sum_flow += lump_sum.kind.apply(lump_sum.amount);
        }

        for period in asset.periods.iter().filter(|p| p.is_active(age)) {
            let years_indexed = age.saturating_sub(period.start_age).max(0);
            let amount = indexed_amount(period.amount, period.indexation_rate, years_indexed);
            period_flow += period.amount_type.apply(amount);

            if let Some(rate) = period.rate_of_return {
                rate_override = Some(rate);
            }
        }
    }

    let effective_rate = rate_override.unwrap_or(asset.rate_of_return);
    let after_flows = opening_balance + lump_sum_flow + period_flow;
    let closing_balance = (after_flows * (1.0 + effective_rate / 100.0)).max(0.0);

    AssetYear {
        opening_balance,
        lump_sum_flow,
        period_flow,
        effective_rate,
        closing_balance,
    }
}

/// Reporting bucket for an asset.
///
/// An explicit `category` wins. Otherwise a name containing "home" or
/// "residence" (any case) marks the primary residence, then `is_registered`
/// separates registered from non-registered holdings.
pub fn categorize(asset: &Asset) -> AssetCategory {
    if let Some(category) = asset.category {
        return category;
    }

    let name = asset.name.to_lowercase();
    if name.contains("home") || name.contains("residence") {
        AssetCategory::PrimaryResidence
    } else if asset.is_registered {
        AssetCategory::Registered
    } else {
        AssetCategory::NonRegistered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{FlowType, LumpSum, Period};
    use approx::assert_abs_diff_eq;

    fn portfolio(initial_value: f64, rate_of_return: f64) -> Asset {
        Asset {
            id: "tfsa".into(),
            name: "TFSA".into(),
            initial_value,
            rate_of_return,
            ..Default::default()
        }
    }

    #[test]
    fn test_pure_compounding_ten_years() {
        let asset = portfolio(100_000.0, 6.0);
        let mut balance = asset.initial_value;
        for offset in 0..10 {
            balance = advance_asset(&asset, Some(50 + offset), balance).closing_balance;
        }
        assert_abs_diff_eq!(balance, 179_084.77, epsilon = 0.01);
    }

    #[test]
    fn test_lump_sum_fires_only_at_matching_age() {
        let mut asset = portfolio(10_000.0, 0.0);
        asset.lump_sums = vec![
            LumpSum { age: 60, kind: FlowType::Contribution, amount: 5_000.0 },
            LumpSum { age: 60, kind: FlowType::Withdrawal, amount: 1_000.0 },
        ];

        let at_59 = advance_asset(&asset, Some(59), 10_000.0);
        assert_eq!(at_59.closing_balance, 10_000.0);

        let at_60 = advance_asset(&asset, Some(60), 10_000.0);
        assert_eq!(at_60.lump_sum_flow, 4_000.0);
        assert_eq!(at_60.closing_balance, 14_000.0);
    }

    #[test]
    fn test_flows_applied_before_growth() {
        let mut asset = portfolio(10_000.0, 10.0);
        asset.periods = vec![Period {
            start_age: 40,
            end_age: 45,
            amount: 1_000.0,
            amount_type: FlowType::Contribution,
            indexation_rate: 5.0,
            rate_of_return: None,
        }];

        let year = advance_asset(&asset, Some(42), 10_000.0);
        let contribution = 1_000.0 * 1.05_f64.powi(2);
        assert_abs_diff_eq!(year.period_flow, contribution, epsilon = 1e-9);
        assert_abs_diff_eq!(year.closing_balance, (10_000.0 + contribution) * 1.10, epsilon = 1e-9);
    }

    #[test]
    fn test_last_active_override_wins() {
        let mut asset = portfolio(1_000.0, 5.0);
        let period = |start_age, end_age, rate| Period {
            start_age,
            end_age,
            amount: 0.0,
            rate_of_return: rate,
            ..Default::default()
        };
        asset.periods = vec![
            period(60, 70, Some(2.0)),
            period(60, 70, Some(8.0)),
            period(60, 70, None),
            period(80, 90, Some(1.0)),
        ];

        assert_eq!(advance_asset(&asset, Some(65), 1_000.0).effective_rate, 8.0);
        assert_eq!(advance_asset(&asset, Some(75), 1_000.0).effective_rate, 5.0);
    }

    #[test]
    fn test_overdrawn_asset_floors_at_zero() {
        let mut asset = portfolio(5_000.0, 5.0);
        asset.periods = vec![Period {
            start_age: 70,
            end_age: 90,
            amount: 8_000.0,
            amount_type: FlowType::Withdrawal,
            ..Default::default()
        }];

        let year = advance_asset(&asset, Some(70), 5_000.0);
        assert_eq!(year.closing_balance, 0.0);
    }

    #[test]
    fn test_unknown_age_only_grows() {
        let mut asset = portfolio(1_000.0, 10.0);
        asset.lump_sums = vec![LumpSum { age: 0, kind: FlowType::Withdrawal, amount: 500.0 }];
        let year = advance_asset(&asset, None, 1_000.0);
        assert_abs_diff_eq!(year.closing_balance, 1_100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extreme_period_ages_do_not_overflow() {
        let mut asset = portfolio(1_000.0, 0.0);
        asset.periods = vec![Period {
            start_age: i32::MIN,
            end_age: i32::MAX,
            amount: 100.0,
            amount_type: FlowType::Contribution,
            ..Default::default()
        }];

        let year = advance_asset(&asset, Some(i32::MAX), 1_000.0);
        assert_eq!(year.period_flow, 100.0);
        assert_eq!(year.closing_balance, 1_100.0);
    }

    #[test]
    fn test_categorize() {
        let named = |name: &str, is_registered| Asset {
            name: name.into(),
            is_registered,
            ..Default::default()
        };

        assert_eq!(categorize(&named("Principal RESIDENCE", true)), AssetCategory::PrimaryResidence);
        assert_eq!(categorize(&named("Family Home", false)), AssetCategory::PrimaryResidence);
        assert_eq!(categorize(&named("RRSP", true)), AssetCategory::Registered);
        assert_eq!(categorize(&named("Brokerage", false)), AssetCategory::NonRegistered);

        let explicit = Asset {
            category: Some(AssetCategory::NonRegistered),
            ..named("Home Depot shares", false)
        };
        assert_eq!(categorize(&explicit), AssetCategory::NonRegistered);
    }
}
