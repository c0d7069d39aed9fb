//! Load households from JSON documents

use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::Household;
use crate::error::LoadError;

/// Parse a household from a JSON string
pub fn parse_household(json: &str) -> Result<Household, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a household from any reader (e.g., string buffer, request body)
pub fn load_household_from_reader<R: Read>(reader: R) -> Result<Household, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a household from a JSON file.
///
/// A household without an id takes the file stem as its id.
pub fn load_household<P: AsRef<Path>>(path: P) -> Result<Household, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut household: Household =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if household.id.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            household.id = stem.to_string();
        }
    }

    Ok(household)
}

/// Load every `*.json` household in a directory, sorted by file name.
///
/// Files that fail to parse are skipped with a warning so one bad record does
/// not block the rest of the book.
pub fn load_households_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<(PathBuf, Household)>, LoadError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut households = Vec::with_capacity(paths.len());
    for path in paths {
        match load_household(&path) {
            Ok(household) => households.push((path, household)),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    info!("Loaded {} households from {}", households.len(), dir.display());
    Ok(households)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{AssetCategory, FlowType, ProbateProvince};

    const SAMPLE: &str = r#"{
        "id": "hh-1",
        "name": "Tremblay",
        "clients": [
            {"id": "c1", "first_name": "Marie", "date_of_birth": "1962-09-01"},
            {"id": "c2", "first_name": "Luc", "current_age": "61"}
        ],
        "settings": {"average_tax_rate": "30", "projection_years": 25},
        "estate": {"tax_on_registered_rate": 40, "probate_province": "ON"},
        "incomes": [
            {"id": "cpp", "assigned_client_id": "c2", "start_age": 65, "end_age": 95,
             "annual_amount": 12000, "indexing_rate": 2}
        ],
        "assets": [
            {"id": "rrsp", "name": "RRSP", "initial_value": 250000, "rate_of_return": 5,
             "is_registered": true, "assigned_client_id": "c1",
             "periods": [{"start_age": 71, "end_age": 95, "amount": 15000,
                          "amount_type": "withdrawal", "indexation_rate": 2}],
             "lumpSums": [{"age": 65, "type": "contribution", "amount": 20000}]},
            {"id": "house", "name": "Family Home", "initial_value": "800000", "rate_of_return": 3},
            {"id": "cottage", "name": "Cottage", "category": "non-registered", "initial_value": 300000}
        ],
        "liabilities": [
            {"id": "mortgage", "initial_balance": 300000, "interest_rate": 4, "payment": 1500}
        ]
    }"#;

    #[test]
    fn test_parse_sample_household() {
        let household = parse_household(SAMPLE).unwrap();

        assert_eq!(household.id, "hh-1");
        assert_eq!(household.clients.len(), 2);
        assert_eq!(household.clients[1].current_age, Some(61));
        assert_eq!(household.settings.average_tax_rate, 30.0);
        assert_eq!(household.settings.projection_years, 25);
        assert_eq!(household.estate.probate_province, Some(ProbateProvince::ON));
        assert_eq!(household.estate.probate_rate, None);

        let rrsp = &household.assets[0];
        assert!(rrsp.is_registered);
        assert_eq!(rrsp.periods[0].amount_type, FlowType::Withdrawal);
        assert_eq!(rrsp.lump_sums.len(), 1);
        assert_eq!(household.assets[1].initial_value, 800000.0);
        assert_eq!(household.assets[2].category, Some(AssetCategory::NonRegistered));
        assert_eq!(household.liabilities[0].payment, 1500.0);
    }

    #[test]
    fn test_reader_and_empty_document() {
        let household = load_household_from_reader("{}".as_bytes()).unwrap();
        assert!(household.clients.is_empty());
        assert_eq!(household.settings.projection_years, 0);
    }

    #[test]
    fn test_explicit_nulls_are_tolerated() {
        let household = parse_household(
            r#"{
                "id": "hh-null",
                "name": null,
                "clients": null,
                "settings": null,
                "estate": null,
                "incomes": null,
                "liabilities": null,
                "assets": [
                    {"id": "cash", "name": null, "initial_value": 100,
                     "periods": null, "lumpSums": null}
                ]
            }"#,
        )
        .unwrap();

        assert!(household.clients.is_empty());
        assert!(household.incomes.is_empty());
        assert!(household.liabilities.is_empty());
        assert_eq!(household.settings.projection_years, 0);
        assert_eq!(household.estate.probate_rate, None);

        let cash = &household.assets[0];
        assert_eq!(cash.name, "");
        assert!(cash.periods.is_empty());
        assert!(cash.lump_sums.is_empty());
        assert_eq!(cash.initial_value, 100.0);
    }

    #[test]
    fn test_structurally_invalid_json_is_an_error() {
        assert!(parse_household("[1, 2").is_err());
        assert!(matches!(parse_household(r#"{"assets": 5}"#), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_household("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
