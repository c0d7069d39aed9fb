//! Income stream evaluation for a single projection year

use crate::household::IncomeStream;

/// Compound `amount` by `rate_pct` percent per year over `years` years
pub fn indexed_amount(amount: f64, rate_pct: f64, years: i32) -> f64 {
    amount * (1.0 + rate_pct / 100.0).powi(years)
}

/// Income produced by `stream` when its owner is `age`.
///
/// Indexation is anchored at the stream's `start_age`, so the first paying
/// year receives the nominal `annual_amount`. An unknown age never pays.
pub fn evaluate_income(stream: &IncomeStream, age: Option<i32>) -> f64 {
    match age {
        Some(age) if age >= stream.start_age && age <= stream.end_age => indexed_amount(
            stream.annual_amount,
            stream.indexing_rate,
            age.saturating_sub(stream.start_age),
        ),
        _ => 0.0,
    }
}
