//! Household data structures supplied by the record-keeping side of the CRM

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::lenient;

/// Direction of a scheduled or one-time cash flow on an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    #[default]
    Contribution,
    Withdrawal,
}

impl FlowType {
    /// Signed effect of `amount` on a balance
    pub fn apply(&self, amount: f64) -> f64 {
        match self {
            FlowType::Contribution => amount,
            FlowType::Withdrawal => -amount,
        }
    }
}

impl FromStr for FlowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contribution" | "deposit" => Ok(FlowType::Contribution),
            "withdrawal" | "withdraw" => Ok(FlowType::Withdrawal),
            other => Err(format!("Unknown flow type: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for FlowType {
    /// Anything that is not recognisably a withdrawal counts as a contribution
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// Reporting bucket for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    PrimaryResidence,
    Registered,
    NonRegistered,
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "primary_residence" | "residence" | "home" => Ok(AssetCategory::PrimaryResidence),
            "registered" => Ok(AssetCategory::Registered),
            "non_registered" | "nonregistered" => Ok(AssetCategory::NonRegistered),
            other => Err(format!("Unknown asset category: {}", other)),
        }
    }
}

/// Province or territory whose probate schedule applies to the estate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbateProvince {
    AB,
    BC,
    MB,
    NB,
    NL,
    NS,
    NT,
    NU,
    ON,
    PE,
    QC,
    SK,
    YT,
}

impl ProbateProvince {
    /// Flat effective probate percentage used when no explicit rate is given.
    /// Jurisdictions that charge a capped flat fee (or none) map to 0.
    pub fn default_probate_rate(&self) -> f64 {
        match self {
            ProbateProvince::ON => 1.5,
            ProbateProvince::BC => 1.4,
            ProbateProvince::NS => 1.695,
            ProbateProvince::SK => 0.7,
            ProbateProvince::NL => 0.6,
            ProbateProvince::NB => 0.5,
            ProbateProvince::PE => 0.4,
            ProbateProvince::AB
            | ProbateProvince::MB
            | ProbateProvince::NT
            | ProbateProvince::NU
            | ProbateProvince::QC
            | ProbateProvince::YT => 0.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProbateProvince::AB => "AB",
            ProbateProvince::BC => "BC",
            ProbateProvince::MB => "MB",
            ProbateProvince::NB => "NB",
            ProbateProvince::NL => "NL",
            ProbateProvince::NS => "NS",
            ProbateProvince::NT => "NT",
            ProbateProvince::NU => "NU",
            ProbateProvince::ON => "ON",
            ProbateProvince::PE => "PE",
            ProbateProvince::QC => "QC",
            ProbateProvince::SK => "SK",
            ProbateProvince::YT => "YT",
        }
    }
}

impl fmt::Display for ProbateProvince {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProbateProvince {
    type Err = String;

    /// Accepts two-letter codes and full English names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let province = match s.trim().to_ascii_lowercase().as_str() {
            "ab" | "alberta" => ProbateProvince::AB,
            "bc" | "british columbia" => ProbateProvince::BC,
            "mb" | "manitoba" => ProbateProvince::MB,
            "nb" | "new brunswick" => ProbateProvince::NB,
            "nl" | "newfoundland" | "newfoundland and labrador" => ProbateProvince::NL,
            "ns" | "nova scotia" => ProbateProvince::NS,
            "nt" | "northwest territories" => ProbateProvince::NT,
            "nu" | "nunavut" => ProbateProvince::NU,
            "on" | "ontario" => ProbateProvince::ON,
            "pe" | "pei" | "prince edward island" => ProbateProvince::PE,
            "qc" | "quebec" | "québec" => ProbateProvince::QC,
            "sk" | "saskatchewan" => ProbateProvince::SK,
            "yt" | "yukon" => ProbateProvince::YT,
            other => return Err(format!("Unknown province: {}", other)),
        };
        Ok(province)
    }
}

/// A member of the household (at most two are projected)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date_of_birth: Option<NaiveDate>,

    /// Explicit age; takes precedence over the date of birth
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub current_age: Option<i32>,
}

impl Client {
    /// Age in completed years on `as_of`
    pub fn age_on(&self, as_of: NaiveDate) -> Option<i32> {
        if self.current_age.is_some() {
            return self.current_age;
        }
        let dob = self.date_of_birth?;
        let mut age = as_of.year() - dob.year();
        if (as_of.month(), as_of.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }
}

/// Recurring income (salary, pension, annuity...) gated by the owner's age
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeStream {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_identifier")]
    pub assigned_client_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub start_age: i32,

    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub end_age: i32,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub annual_amount: f64,

    /// Annual indexation, percent
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub indexing_rate: f64,
}

/// Age-bounded recurring contribution or withdrawal on an asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub start_age: i32,

    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub end_age: i32,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,

    #[serde(default)]
    pub amount_type: FlowType,

    /// Annual indexation of `amount`, percent
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub indexation_rate: f64,

    /// Replaces the asset's default return while this period is active
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rate_of_return: Option<f64>,
}

impl Period {
    pub fn is_active(&self, age: i32) -> bool {
        age >= self.start_age && age <= self.end_age
    }
}

/// One-time contribution or withdrawal at a given client age
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LumpSum {
    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub age: i32,

    #[serde(rename = "type", alias = "kind", default)]
    pub kind: FlowType,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub initial_value: f64,

    /// Default annual return, percent
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate_of_return: f64,

    #[serde(default, deserialize_with = "lenient::bool_or_false")]
    pub is_registered: bool,

    /// Explicit reporting bucket; falls back to the name heuristic when unset
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub category: Option<AssetCategory>,

    #[serde(default, deserialize_with = "lenient::opt_identifier")]
    pub assigned_client_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub periods: Vec<Period>,

    #[serde(default, alias = "lumpSums", deserialize_with = "lenient::null_as_default")]
    pub lump_sums: Vec<LumpSum>,
}

/// Debt amortized by a fixed monthly payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Liability {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub initial_balance: f64,

    /// Annual interest, percent
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub interest_rate: f64,

    /// Monthly payment
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub payment: f64,

    #[serde(default, deserialize_with = "lenient::opt_identifier")]
    pub assigned_client_id: Option<String>,
}

/// Household-wide estate settlement parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstateParameters {
    /// Tax on registered assets at death, percent
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub tax_on_registered_rate: f64,

    /// Probate fee on gross assets, percent
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub probate_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub probate_province: Option<ProbateProvince>,
}

impl EstateParameters {
    /// Explicit rate first, then the province schedule, then 0
    pub fn effective_probate_rate(&self) -> f64 {
        self.probate_rate
            .or_else(|| self.probate_province.map(|p| p.default_probate_rate()))
            .unwrap_or(0.0)
    }
}

/// Household-level projection settings stored alongside the records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseholdSettings {
    /// Flat average tax rate on income, percent
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub average_tax_rate: f64,

    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub projection_years: i32,
}

/// Everything the engine needs for one household
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Household {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub clients: Vec<Client>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub settings: HouseholdSettings,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub estate: EstateParameters,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub incomes: Vec<IncomeStream>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub assets: Vec<Asset>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub liabilities: Vec<Liability>,
}

impl Household {
    /// Ids of the first two clients, in household order
    pub fn client_ids(&self) -> [Option<String>; 2] {
        let id_at = |i: usize| {
            self.clients
                .get(i)
                .map(|c| c.id.clone())
                .filter(|id| !id.is_empty())
        };
        [id_at(0), id_at(1)]
    }

    /// Display label: name, then id
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
