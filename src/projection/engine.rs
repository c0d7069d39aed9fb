//! Core projection engine for yearly household projections

use chrono::{Datelike, NaiveDate};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::asset::{advance_asset, categorize};
use super::estate::EstateTaxCalculator;
use super::income::evaluate_income;
use super::liability::amortize;
use super::records::{ProjectionResult, YearRecord};
use super::state::{report_key, ProjectionState};
use crate::household::{is_unknown_client, AssetCategory, ClientAges, Household};

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Ids of the two projected clients; entities resolve their owner against these
    pub client_ids: [Option<String>; 2],

    /// Age of the first client in year 0 (None = unknown, never eligible)
    pub client1_current_age: Option<i32>,

    /// Age of the second client in year 0
    pub client2_current_age: Option<i32>,

    /// Flat tax rate applied to total income, percent
    pub average_tax_rate: f64,

    /// Number of years after year 0; zero or negative means no projection
    pub projection_years: i32,

    /// Calendar year of year 0
    pub start_year: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            client_ids: [None, None],
            client1_current_age: None,
            client2_current_age: None,
            average_tax_rate: 0.0,
            projection_years: 30,
            start_year: 2025,
        }
    }
}

impl ProjectionConfig {
    /// Derive the run configuration from a household's clients and settings.
    ///
    /// `as_of` fixes both the starting calendar year and the clients' current
    /// ages, so the same date always reproduces the same run.
    pub fn for_household(household: &Household, as_of: NaiveDate) -> Self {
        let age = |i: usize| household.clients.get(i).and_then(|c| c.age_on(as_of));

        Self {
            client_ids: household.client_ids(),
            client1_current_age: age(0),
            client2_current_age: age(1),
            average_tax_rate: household.settings.average_tax_rate,
            projection_years: household.settings.projection_years,
            start_year: as_of.year(),
        }
    }

    /// Number of records a run produces
    pub fn record_count(&self) -> usize {
        if self.projection_years > 0 {
            self.projection_years as usize + 1
        } else {
            0
        }
    }

    /// Both clients' simulated ages in the given year
    pub fn ages_at(&self, year_index: u32) -> ClientAges {
        ClientAges::at_offset(
            self.client1_current_age,
            self.client2_current_age,
            i32::try_from(year_index).unwrap_or(i32::MAX),
        )
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the full projection for a household, from year 0 through
    /// `projection_years` inclusive.
    pub fn project_household(&self, household: &Household) -> ProjectionResult {
        let mut result = ProjectionResult::new(household.id.clone(), self.config.start_year);

        if self.config.projection_years <= 0 {
            debug!(
                "Household {}: projection_years = {}, nothing to project",
                household.id, self.config.projection_years
            );
            return result;
        }

        self.warn_on_degraded_inputs(household);
        debug!(
            "Household {}: projecting {} years ({} incomes, {} assets, {} liabilities)",
            household.id,
            self.config.projection_years,
            household.incomes.len(),
            household.assets.len(),
            household.liabilities.len()
        );

        let estate = EstateTaxCalculator::from_parameters(&household.estate);
        let mut state = ProjectionState::initial();

        for _year in 0..self.config.record_count() {
            let (record, next) = self.step(household, &estate, &state);
            result.add_record(record);
            state = next;
        }

        result
    }

    /// Simulate the year `state.year_index` and return its record together
    /// with the state the following year opens from.
    pub fn step(
        &self,
        household: &Household,
        estate: &EstateTaxCalculator,
        state: &ProjectionState,
    ) -> (YearRecord, ProjectionState) {
        let year_index = state.year_index;
        let ages = self.config.ages_at(year_index);
        let client_ids = &self.config.client_ids;

        let calendar_year = self
            .config
            .start_year
            .saturating_add(i32::try_from(year_index).unwrap_or(i32::MAX));
        let mut record = YearRecord::new(calendar_year, year_index);
        record.client1_age = ages.first;
        record.client2_age = ages.second;

        let mut next = ProjectionState {
            year_index: year_index + 1,
            ..ProjectionState::default()
        };

        // Income
        for (index, stream) in household.incomes.iter().enumerate() {
            let age = ages.for_assignment(stream.assigned_client_id.as_deref(), client_ids);
            let value = evaluate_income(stream, age);
            record.total_income += value;
            *record.dynamic_incomes.entry(report_key(&stream.id, index)).or_insert(0.0) += value;
        }
        record.tax_estimate = record.total_income * self.config.average_tax_rate / 100.0;
        record.after_tax_income = record.total_income - record.tax_estimate;

        // Assets
        for (index, asset) in household.assets.iter().enumerate() {
            let age = ages.for_assignment(asset.assigned_client_id.as_deref(), client_ids);
            let year = advance_asset(asset, age, state.asset_opening(index, asset));
            let value = year.closing_balance;

            record.total_assets += value;
            *record.dynamic_assets.entry(report_key(&asset.id, index)).or_insert(0.0) += value;
            match categorize(asset) {
                AssetCategory::PrimaryResidence => record.primary_residence_value += value,
                AssetCategory::Registered => record.registered_assets += value,
                AssetCategory::NonRegistered => record.non_registered_assets += value,
            }
            next.asset_balances.insert(index, value);
        }

        // Liabilities
        for (index, liability) in household.liabilities.iter().enumerate() {
            let year = amortize(liability, state.liability_opening(index, liability));
            let value = year.closing_balance;

            record.total_liabilities += value;
            *record.dynamic_liabilities.entry(report_key(&liability.id, index)).or_insert(0.0) += value;
            next.liability_balances.insert(index, value);
        }

        record.net_worth = record.total_assets - record.total_liabilities;

        // Estate
        let settlement = estate.calculate(
            record.total_assets,
            record.total_liabilities,
            record.registered_assets,
        );
        record.gross_estate = settlement.gross_estate;
        record.tax_on_registered_assets = settlement.tax_on_registered_assets;
        record.probate_fee = settlement.probate_fee;
        record.estate_tax = settlement.probate_fee;
        record.net_estate = settlement.net_estate;
        record.estate_tax_total = settlement.total_settlement_cost();

        trace!(
            "Year {} (index {}): income={:.2} assets={:.2} liabilities={:.2} net_estate={:.2}",
            record.year,
            year_index,
            record.total_income,
            record.total_assets,
            record.total_liabilities,
            record.net_estate
        );

        (record, next)
    }

    /// Log inputs that the engine accepts but handles by fallback
    fn warn_on_degraded_inputs(&self, household: &Household) {
        let client_ids = &self.config.client_ids;

        if self.config.client1_current_age.is_none() {
            warn!(
                "Household {}: first client's age is unknown; entities owned by it never fire",
                household.id
            );
        }

        let assignments = household
            .incomes
            .iter()
            .map(|i| (i.id.as_str(), i.assigned_client_id.as_deref()))
            .chain(household.assets.iter().map(|a| (a.id.as_str(), a.assigned_client_id.as_deref())))
            .chain(
                household
                    .liabilities
                    .iter()
                    .map(|l| (l.id.as_str(), l.assigned_client_id.as_deref())),
            );
        for (id, assigned) in assignments {
            if is_unknown_client(assigned, client_ids) {
                warn!(
                    "Household {}: {} is assigned to unknown client {:?}, using first client",
                    household.id, id, assigned
                );
            }
        }

        let asset_ids = household.assets.iter().map(|a| a.id.as_str());
        let liability_ids = household.liabilities.iter().map(|l| l.id.as_str());
        for (kind, ids) in [("asset", duplicates(asset_ids)), ("liability", duplicates(liability_ids))] {
            for id in ids {
                warn!(
                    "Household {}: duplicate {} id {:?}; values are summed under one key",
                    household.id, kind, id
                );
            }
        }
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> BTreeSet<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(id, n)| !id.is_empty() && *n > 1)
        .map(|(id, _)| id)
        .collect()
}
