//! CSV and JSON export of projection results
//!
//! CSV output has one row per year: the fixed record columns followed by one
//! column per entity (`income:<id>`, `asset:<id>`, `liability:<id>`).

use log::info;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::records::{ProjectionResult, ProjectionSummary, YearRecord};
use crate::error::ExportError;

const FIXED_COLUMNS: [&str; 21] = [
    "Year",
    "YearIndex",
    "Client1Age",
    "Client2Age",
    "TotalIncome",
    "TaxEstimate",
    "AfterTaxIncome",
    "TotalAssets",
    "RegisteredAssets",
    "NonRegisteredAssets",
    "PrimaryResidence",
    "TotalLiabilities",
    "NetWorth",
    "GrossEstate",
    "TaxOnRegistered",
    "ProbateFee",
    "EstateTax",
    "EstateTaxTotal",
    "NetEstate",
    "PeakToDate",
    "NetEstateChange",
];

/// JSON report: the series plus its summary
#[derive(Debug, Serialize)]
pub struct ProjectionReport<'a> {
    pub result: &'a ProjectionResult,
    pub summary: ProjectionSummary,
}

impl<'a> ProjectionReport<'a> {
    pub fn new(result: &'a ProjectionResult) -> Self {
        Self {
            result,
            summary: result.summary(),
        }
    }
}

/// Write the series as CSV to any writer
pub fn write_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), ExportError> {
    let income_ids = entity_ids(&result.records, |r| r.dynamic_incomes.keys());
    let asset_ids = entity_ids(&result.records, |r| r.dynamic_assets.keys());
    let liability_ids = entity_ids(&result.records, |r| r.dynamic_liabilities.keys());

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(income_ids.iter().map(|id| format!("income:{}", id)));
    header.extend(asset_ids.iter().map(|id| format!("asset:{}", id)));
    header.extend(liability_ids.iter().map(|id| format!("liability:{}", id)));
    csv_writer.write_record(&header)?;

    let mut peak = f64::NEG_INFINITY;
    let mut prior_net_estate = None;
    for r in &result.records {
        peak = peak.max(r.net_worth);
        let net_estate_change = prior_net_estate.map(|prior| r.net_estate - prior).unwrap_or(0.0);
        prior_net_estate = Some(r.net_estate);

        let mut row = vec![
            r.year.to_string(),
            r.year_index.to_string(),
            optional_age(r.client1_age),
            optional_age(r.client2_age),
            money(r.total_income),
            money(r.tax_estimate),
            money(r.after_tax_income),
            money(r.total_assets),
            money(r.registered_assets),
            money(r.non_registered_assets),
            money(r.primary_residence_value),
            money(r.total_liabilities),
            money(r.net_worth),
            money(r.gross_estate),
            money(r.tax_on_registered_assets),
            money(r.probate_fee),
            money(r.estate_tax),
            money(r.estate_tax_total),
            money(r.net_estate),
            money(peak),
            money(net_estate_change),
        ];
        row.extend(income_ids.iter().map(|id| money(r.dynamic_incomes.get(*id).copied().unwrap_or(0.0))));
        row.extend(asset_ids.iter().map(|id| money(r.dynamic_assets.get(*id).copied().unwrap_or(0.0))));
        row.extend(
            liability_ids
                .iter()
                .map(|id| money(r.dynamic_liabilities.get(*id).copied().unwrap_or(0.0))),
        );
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the series as CSV to a file
pub fn write_csv_file<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(result, BufWriter::new(file))?;
    info!("Wrote {} years to {}", result.records.len(), path.display());
    Ok(())
}

/// Write the series and summary as pretty JSON to any writer
pub fn write_json<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &ProjectionReport::new(result))?;
    Ok(())
}

/// Write the series and summary as pretty JSON to a file
pub fn write_json_file<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_json(result, &mut writer)?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote JSON report to {}", path.display());
    Ok(())
}

fn entity_ids<'a, F, I>(records: &'a [YearRecord], keys: F) -> BTreeSet<&'a str>
where
    F: Fn(&'a YearRecord) -> I,
    I: Iterator<Item = &'a String>,
{
    records.iter().flat_map(keys).map(String::as_str).collect()
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn optional_age(age: Option<i32>) -> String {
    age.map(|a| a.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ProjectionResult {
        let mut result = ProjectionResult::new("hh", 2025);
        for index in 0..3u32 {
            let mut record = YearRecord::new(2025 + index as i32, index);
            record.client1_age = Some(60 + index as i32);
            record.total_assets = 1_000.0 * (index + 1) as f64;
            record.net_worth = record.total_assets;
            record.net_estate = record.total_assets * 0.9;
            record.dynamic_assets.insert("tfsa".into(), record.total_assets);
            record.dynamic_incomes.insert("cpp".into(), 500.0);
            result.add_record(record);
        }
        result
    }

    #[test]
    fn test_csv_layout() {
        let mut buffer = Vec::new();
        write_csv(&sample_result(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Year,YearIndex,Client1Age,Client2Age,TotalIncome"));
        assert!(lines[0].ends_with("income:cpp,asset:tfsa"));
        assert!(lines[1].starts_with("2025,0,60,,0.00"));
        assert!(lines[3].ends_with("500.00,3000.00"));
    }

    #[test]
    fn test_csv_running_columns() {
        let mut buffer = Vec::new();
        write_csv(&sample_result(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        // PeakToDate and NetEstateChange sit at columns 19 and 20
        assert_eq!(&rows[2][19], "3000.00");
        assert_eq!(&rows[0][20], "0.00");
        assert_eq!(&rows[1][20], "900.00");
    }

    #[test]
    fn test_json_report_includes_summary() {
        let mut buffer = Vec::new();
        write_json(&sample_result(), &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["summary"]["total_years"], 3);
        assert_eq!(value["summary"]["peak_net_worth"], 3000.0);
        assert_eq!(value["result"]["records"].as_array().unwrap().len(), 3);
    }
}
