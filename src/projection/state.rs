//! Balances carried from one projection year to the next

use std::collections::BTreeMap;

use crate::household::{Asset, Liability};

/// Per-run carried state, keyed by the entity's position in the household.
///
/// Positions rather than ids key the balances, so entities with blank or
/// repeated ids still carry their own prior-year balance. An entity with no
/// entry yet opens at its initial value. The engine never mutates a state in
/// place: each year's step consumes the previous state and returns the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionState {
    /// Index of the next year to simulate
    pub year_index: u32,

    /// Closing asset balances of the last simulated year, by asset position
    pub asset_balances: BTreeMap<usize, f64>,

    /// Closing liability balances of the last simulated year, by liability position
    pub liability_balances: BTreeMap<usize, f64>,
}

impl ProjectionState {
    /// State before year 0
    pub fn initial() -> Self {
        Self::default()
    }

    /// Opening balance of the asset at `index` for the next year
    pub fn asset_opening(&self, index: usize, asset: &Asset) -> f64 {
        self.asset_balances
            .get(&index)
            .copied()
            .unwrap_or(asset.initial_value)
    }

    /// Opening balance of the liability at `index` for the next year
    pub fn liability_opening(&self, index: usize, liability: &Liability) -> f64 {
        self.liability_balances
            .get(&index)
            .copied()
            .unwrap_or(liability.initial_balance)
    }
}

/// Key an entity reports under in the per-year maps; blank ids get `#<index>`
pub fn report_key(id: &str, index: usize) -> String {
    if id.is_empty() {
        format!("#{}", index)
    } else {
        id.to_string()
    }
}
