//! Projection engine for yearly household projections

mod state;
mod engine;
mod records;
pub mod income;
pub mod asset;
pub mod liability;
pub mod estate;
pub mod export;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionConfig};
pub use records::{summarize, ProjectionResult, ProjectionSummary, YearRecord};
pub use income::evaluate_income;
pub use asset::{advance_asset, categorize, AssetYear};
pub use liability::{amortize, LiabilityYear};
pub use estate::{EstateBreakdown, EstateTaxCalculator};
