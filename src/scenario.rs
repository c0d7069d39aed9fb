//! Scenario runner for batch projections
//!
//! Every run is a full recomputation from year 0; nothing is cached between
//! runs, so results always reflect the household exactly as passed in.

use chrono::NaiveDate;
use log::info;
use rayon::prelude::*;

use crate::household::Household;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Runs households against a fixed valuation date
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(as_of);
///
/// // Compare tax-rate assumptions for one household
/// let base = runner.config_for(&household);
/// let configs: Vec<_> = [20.0, 30.0, 40.0]
///     .iter()
///     .map(|&rate| ProjectionConfig { average_tax_rate: rate, ..base.clone() })
///     .collect();
/// let results = runner.run_scenarios(&household, &configs);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Date that fixes starting ages and the first calendar year
    as_of: NaiveDate,
}

impl ScenarioRunner {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Configuration the household's own settings imply
    pub fn config_for(&self, household: &Household) -> ProjectionConfig {
        ProjectionConfig::for_household(household, self.as_of)
    }

    /// Run a household with its own settings
    pub fn run(&self, household: &Household) -> ProjectionResult {
        self.run_with(household, &self.config_for(household))
    }

    /// Run a household with an explicit configuration
    pub fn run_with(&self, household: &Household, config: &ProjectionConfig) -> ProjectionResult {
        ProjectionEngine::new(config.clone()).project_household(household)
    }

    /// Run multiple scenarios (different configs) for a single household
    pub fn run_scenarios(&self, household: &Household, configs: &[ProjectionConfig]) -> Vec<ProjectionResult> {
        configs
            .iter()
            .map(|config| self.run_with(household, config))
            .collect()
    }

    /// Run many households in parallel; output order matches input order
    pub fn run_batch(&self, households: &[Household]) -> Vec<ProjectionResult> {
        info!("Projecting {} households as of {}", households.len(), self.as_of);
        households.par_iter().map(|h| self.run(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Asset, Client, HouseholdSettings, IncomeStream};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn test_household(id: &str, initial_value: f64) -> Household {
        Household {
            id: id.into(),
            clients: vec![Client { id: "c1".into(), current_age: Some(55), ..Default::default() }],
            settings: HouseholdSettings { average_tax_rate: 30.0, projection_years: 20 },
            incomes: vec![IncomeStream {
                id: "salary".into(),
                start_age: 55,
                end_age: 64,
                annual_amount: 80_000.0,
                ..Default::default()
            }],
            assets: vec![Asset {
                id: "fund".into(),
                name: "Balanced fund".into(),
                initial_value,
                rate_of_return: 5.0,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_run_uses_household_settings() {
        let runner = ScenarioRunner::new(as_of());
        let result = runner.run(&test_household("a", 100_000.0));

        assert_eq!(result.household_id, "a");
        assert_eq!(result.start_year, 2025);
        assert_eq!(result.records.len(), 21);
        assert!((result.records[0].tax_estimate - 24_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenarios_vary_tax_rate() {
        let runner = ScenarioRunner::new(as_of());
        let household = test_household("a", 100_000.0);
        let base = runner.config_for(&household);

        let configs: Vec<_> = [20.0, 40.0]
            .iter()
            .map(|&rate| ProjectionConfig { average_tax_rate: rate, ..base.clone() })
            .collect();
        let results = runner.run_scenarios(&household, &configs);

        assert_eq!(results.len(), 2);
        assert!(results[0].summary().total_tax < results[1].summary().total_tax);
        // Tax does not feed back into balances
        assert_eq!(results[0].summary().peak_net_worth, results[1].summary().peak_net_worth);
    }

    #[test]
    fn test_batch_preserves_order_and_matches_serial() {
        let runner = ScenarioRunner::new(as_of());
        let households: Vec<_> = (0..8)
            .map(|i| test_household(&format!("hh-{}", i), 10_000.0 * (i + 1) as f64))
            .collect();

        let batch = runner.run_batch(&households);
        assert_eq!(batch.len(), households.len());
        for (household, result) in households.iter().zip(&batch) {
            assert_eq!(result.household_id, household.id);
            assert_eq!(result, &runner.run(household));
        }
    }
}
