//! Estate settlement values for a projection year

use serde::{Deserialize, Serialize};

use crate::household::EstateParameters;

/// Estate values derived from one year's totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstateBreakdown {
    pub gross_estate: f64,
    pub tax_on_registered_assets: f64,
    pub probate_fee: f64,
    pub net_estate: f64,
}

impl EstateBreakdown {
    /// Registered-asset tax plus probate
    pub fn total_settlement_cost(&self) -> f64 {
        self.tax_on_registered_assets + self.probate_fee
    }
}

/// Applies the household's estate rates to yearly totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstateTaxCalculator {
    /// Percent of registered assets taxed at death
    pub tax_on_registered_rate: f64,

    /// Percent of gross assets charged as probate
    pub probate_rate: f64,
}

impl EstateTaxCalculator {
    pub fn new(tax_on_registered_rate: f64, probate_rate: f64) -> Self {
        Self {
            tax_on_registered_rate,
            probate_rate,
        }
    }

    /// Resolve the probate rate (explicit, then province schedule) once up front
    pub fn from_parameters(params: &EstateParameters) -> Self {
        Self::new(params.tax_on_registered_rate, params.effective_probate_rate())
    }

    /// Probate is levied on gross assets, not on the net estate
    pub fn calculate(
        &self,
        total_assets: f64,
        total_liabilities: f64,
        registered_assets: f64,
    ) -> EstateBreakdown {
        let tax_on_registered_assets = registered_assets * self.tax_on_registered_rate / 100.0;
        let probate_fee = total_assets * self.probate_rate / 100.0;
        let gross_estate = total_assets;
        let net_estate = gross_estate - total_liabilities - tax_on_registered_assets - probate_fee;

        EstateBreakdown {
            gross_estate,
            tax_on_registered_assets,
            probate_fee,
            net_estate,
        }
    }
}
