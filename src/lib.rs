//! Estate Projection - yearly financial projection engine for advisory households
//!
//! This library provides:
//! - Household input model with forgiving JSON loading
//! - Year-by-year projection of income, assets, liabilities and net worth
//! - Estate settlement values (registered-asset tax, probate, net estate) every year
//! - Summary metrics and CSV/JSON export
//! - Batch and multi-scenario runs

pub mod error;
pub mod household;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ExportError, LoadError};
pub use household::{Asset, EstateParameters, Household, IncomeStream, Liability};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary, YearRecord};
pub use scenario::ScenarioRunner;
