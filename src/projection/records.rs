//! Projection output: one record per simulated year, plus summary metrics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    // Timing
    pub year: i32,
    pub year_index: u32,
    pub client1_age: Option<i32>,
    pub client2_age: Option<i32>,

    // Income
    pub total_income: f64,
    pub dynamic_incomes: BTreeMap<String, f64>,
    pub tax_estimate: f64,
    pub after_tax_income: f64,

    // Assets (closing balances)
    pub total_assets: f64,
    pub dynamic_assets: BTreeMap<String, f64>,
    pub registered_assets: f64,
    pub non_registered_assets: f64,
    pub primary_residence_value: f64,

    // Liabilities (closing balances)
    pub total_liabilities: f64,
    pub dynamic_liabilities: BTreeMap<String, f64>,

    pub net_worth: f64,

    // Estate
    pub gross_estate: f64,
    pub tax_on_registered_assets: f64,
    /// Probate, reported under its legacy name
    pub estate_tax: f64,
    pub probate_fee: f64,
    pub net_estate: f64,
    /// Registered-asset tax plus probate
    pub estate_tax_total: f64,
}

impl YearRecord {
    /// Create an empty record for the given year
    pub fn new(year: i32, year_index: u32) -> Self {
        Self {
            year,
            year_index,
            client1_age: None,
            client2_age: None,
            total_income: 0.0,
            dynamic_incomes: BTreeMap::new(),
            tax_estimate: 0.0,
            after_tax_income: 0.0,
            total_assets: 0.0,
            dynamic_assets: BTreeMap::new(),
            registered_assets: 0.0,
            non_registered_assets: 0.0,
            primary_residence_value: 0.0,
            total_liabilities: 0.0,
            dynamic_liabilities: BTreeMap::new(),
            net_worth: 0.0,
            gross_estate: 0.0,
            tax_on_registered_assets: 0.0,
            estate_tax: 0.0,
            probate_fee: 0.0,
            net_estate: 0.0,
            estate_tax_total: 0.0,
        }
    }
}

/// Complete projection result for one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Household identifier
    pub household_id: String,

    /// Calendar year of year 0
    pub start_year: i32,

    /// Yearly records, ordered by `year_index`
    pub records: Vec<YearRecord>,
}

impl ProjectionResult {
    pub fn new(household_id: impl Into<String>, start_year: i32) -> Self {
        Self {
            household_id: household_id.into(),
            start_year,
            records: Vec::new(),
        }
    }

    /// Add a year record
    pub fn add_record(&mut self, record: YearRecord) {
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        summarize(&self.records)
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: usize,
    pub peak_net_worth: f64,
    /// Calendar year of the first record reaching the peak
    pub peak_net_worth_year: Option<i32>,
    pub final_net_worth: f64,
    pub final_net_estate_value: f64,
    pub total_income: f64,
    pub total_tax: f64,
}

/// Reduce a record series to summary metrics; an empty series yields zeros
pub fn summarize(records: &[YearRecord]) -> ProjectionSummary {
    let peak = records.iter().fold(None::<&YearRecord>, |best, record| match best {
        Some(b) if b.net_worth >= record.net_worth => Some(b),
        _ => Some(record),
    });

    let last = records.last();

    ProjectionSummary {
        total_years: records.len(),
        peak_net_worth: peak.map(|r| r.net_worth).unwrap_or(0.0),
        peak_net_worth_year: peak.map(|r| r.year),
        final_net_worth: last.map(|r| r.net_worth).unwrap_or(0.0),
        final_net_estate_value: last.map(|r| r.net_estate).unwrap_or(0.0),
        total_income: records.iter().map(|r| r.total_income).sum(),
        total_tax: records.iter().map(|r| r.tax_estimate).sum(),
    }
}
