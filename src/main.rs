//! Estate Projection CLI
//!
//! Command-line interface for running household projections

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use estate_projection::household::{lenient, load_household, load_households_from_dir};
use estate_projection::projection::export::{write_csv_file, write_json_file};
use estate_projection::{Household, ProjectionResult, ScenarioRunner};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "estate-projection", version, about = "Yearly income, net worth and estate projections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project a single household file
    Project {
        /// Household JSON file
        file: PathBuf,

        /// Valuation date (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,

        /// Override the household's projection years
        #[arg(long)]
        years: Option<i32>,

        /// Override the household's average tax rate (percent)
        #[arg(long)]
        tax_rate: Option<f64>,

        /// Write the yearly series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the series and summary to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Project every household JSON file in a directory
    Batch {
        /// Directory of household JSON files
        dir: PathBuf,

        /// Valuation date (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,

        /// Write one CSV per household into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_as_of(raw: &str) -> Result<NaiveDate, String> {
    lenient::parse_date(raw).ok_or_else(|| format!("expected YYYY-MM-DD, got {:?}", raw))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Project { file, as_of, years, tax_rate, csv, json } => {
            let household = load_household(&file)
                .with_context(|| format!("loading household {}", file.display()))?;
            let runner = ScenarioRunner::new(as_of.unwrap_or_else(today));

            let mut config = runner.config_for(&household);
            if let Some(years) = years {
                config.projection_years = years;
            }
            if let Some(rate) = tax_rate {
                config.average_tax_rate = rate;
            }

            let result = runner.run_with(&household, &config);
            print_series(&household, &result);

            if let Some(path) = csv {
                write_csv_file(&result, &path).with_context(|| format!("writing {}", path.display()))?;
                println!("\nYearly series written to: {}", path.display());
            }
            if let Some(path) = json {
                write_json_file(&result, &path).with_context(|| format!("writing {}", path.display()))?;
                println!("Report written to: {}", path.display());
            }
        }
        Command::Batch { dir, as_of, out } => {
            let loaded = load_households_from_dir(&dir)
                .with_context(|| format!("reading households from {}", dir.display()))?;
            if loaded.is_empty() {
                bail!("no household files found in {}", dir.display());
            }

            let households: Vec<Household> = loaded.into_iter().map(|(_, h)| h).collect();
            let runner = ScenarioRunner::new(as_of.unwrap_or_else(today));
            let results = runner.run_batch(&households);

            if let Some(out_dir) = &out {
                fs::create_dir_all(out_dir)
                    .with_context(|| format!("creating {}", out_dir.display()))?;
            }

            println!("{:<24} {:>6} {:>16} {:>6} {:>16}", "Household", "Years", "Peak NW", "Year", "Final Estate");
            println!("{}", "-".repeat(72));
            for (household, result) in households.iter().zip(&results) {
                let summary = result.summary();
                println!(
                    "{:<24} {:>6} {:>16.2} {:>6} {:>16.2}",
                    household.label(),
                    summary.total_years,
                    summary.peak_net_worth,
                    summary.peak_net_worth_year.map(|y| y.to_string()).unwrap_or_default(),
                    summary.final_net_estate_value,
                );

                if let Some(out_dir) = &out {
                    let path = out_dir.join(format!("{}.csv", result.household_id));
                    write_csv_file(result, &path).with_context(|| format!("writing {}", path.display()))?;
                }
            }
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_series(household: &Household, result: &ProjectionResult) {
    println!("Household: {} ({} years from {})", household.label(), result.records.len(), result.start_year);
    if result.is_empty() {
        println!("Nothing to project: projection_years must be positive.");
        return;
    }

    println!(
        "{:>5} {:>4} {:>4} {:>12} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Age1", "Age2", "Income", "Assets", "Liabilities", "Net Worth", "Net Estate"
    );
    println!("{}", "-".repeat(90));

    let age = |a: Option<i32>| a.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    for r in &result.records {
        println!(
            "{:>5} {:>4} {:>4} {:>12.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            r.year,
            age(r.client1_age),
            age(r.client2_age),
            r.total_income,
            r.total_assets,
            r.total_liabilities,
            r.net_worth,
            r.net_estate,
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Peak Net Worth: ${:.2}", summary.peak_net_worth);
    if let Some(year) = summary.peak_net_worth_year {
        println!("  Peak Year: {}", year);
    }
    println!("  Final Net Worth: ${:.2}", summary.final_net_worth);
    println!("  Final Net Estate: ${:.2}", summary.final_net_estate_value);
    println!("  Total Income: ${:.2}", summary.total_income);
    println!("  Total Tax Estimate: ${:.2}", summary.total_tax);
}
