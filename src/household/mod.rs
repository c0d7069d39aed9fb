//! Household input model and loading

mod data;
mod clients;
pub mod lenient;
pub mod loader;

pub use data::{
    Asset, AssetCategory, Client, EstateParameters, FlowType, Household, HouseholdSettings,
    IncomeStream, Liability, LumpSum, Period, ProbateProvince,
};
pub use clients::{is_unknown_client, resolve_client, ClientAges, ClientSlot};
pub use loader::{load_household, load_household_from_reader, load_households_from_dir, parse_household};
