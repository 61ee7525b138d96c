//! Lifetime Cost CLI
//!
//! Command-line interface for valuing and comparing products

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lifetime_cost::comparison::{ComparisonEngine, ComparisonEntry, ComparisonReport};
use lifetime_cost::product::{load_inputs_json, load_products, load_vehicles, ProductInput};
use lifetime_cost::scenario::{SensitivityAxis, SensitivityRunner};
use lifetime_cost::valuation::{current_year, ValuationEngine, ValuationResult};
use lifetime_cost::Preferences;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lifetime_cost",
    version,
    about = "Total cost of ownership for products and vehicles"
)]
struct Cli {
    /// Preferences JSON file (built-in defaults when omitted)
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    /// Override the annual discount rate
    #[arg(long, global = true)]
    discount_rate: Option<f64>,

    /// Override the electricity rate per kWh
    #[arg(long, global = true)]
    electricity_rate: Option<f64>,

    /// Year used for vehicle age (defaults to the current year)
    #[arg(long, global = true)]
    valuation_year: Option<i32>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Value every product in a JSON file
    Value { input: PathBuf },

    /// Rank the products in a JSON file and find break-even points
    Compare { input: PathBuf },

    /// Value a CSV of products (or vehicles) in parallel
    Batch {
        input: PathBuf,

        /// Treat the CSV as vehicle listings
        #[arg(long)]
        vehicles: bool,

        /// Write results (CSV, or JSON with --json) to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Re-value products across a list of rates
    Sensitivity {
        input: PathBuf,

        /// Comma-separated discount rates
        #[arg(long, value_delimiter = ',', conflicts_with = "electricity_rates")]
        discount_rates: Vec<f64>,

        /// Comma-separated electricity rates
        #[arg(long, value_delimiter = ',')]
        electricity_rates: Vec<f64>,
    },
}

fn load_preferences(cli: &Cli) -> Result<Preferences> {
    let mut prefs = match &cli.preferences {
        Some(path) => Preferences::from_json_path(path)
            .with_context(|| format!("reading preferences from {}", path.display()))?,
        None => Preferences::default(),
    };

    if let Some(rate) = cli.discount_rate {
        prefs.discount_rate = rate;
    }
    if let Some(rate) = cli.electricity_rate {
        prefs.electricity_rate = rate;
    }

    Ok(prefs)
}

fn load_inputs(path: &PathBuf) -> Result<Vec<ProductInput>> {
    load_inputs_json(path).with_context(|| format!("reading products from {}", path.display()))
}

fn print_result(result: &ValuationResult) {
    println!("{} ({:?})", result.label, result.kind);
    println!("  Purchase price: {:>12.2}", result.purchase_price);
    for (category, amount) in &result.components {
        println!("  {:<14}  {:>12.2}", category.as_str(), amount);
    }
    println!("  Total cost:     {:>12.2} over {} years", result.total_cost, result.horizon_years);
    println!("  Per year:       {:>12.2}", result.annualized_cost());
    if let Some(monthly) = result.monthly_cost {
        println!("  Per month:      {:>12.2}", monthly);
    }

    if let Some(breakdown) = &result.yearly_breakdown {
        println!(
            "  {:>4} {:>8} {:>12} {:>12} {:>12}",
            "Year", "DF", "Nominal", "Discounted", "Cumulative"
        );
        let running = breakdown.cumulative_discounted();
        for (row, (_, cumulative)) in breakdown.rows().iter().zip(running) {
            println!(
                "  {:>4} {:>8.4} {:>12.2} {:>12.2} {:>12.2}",
                row.year, row.discount_factor, row.nominal_total, row.discounted_total, cumulative
            );
        }
    }

    for note in &result.fallbacks {
        println!("  note: {}", note);
    }
    println!();
}

fn print_report(report: &ComparisonReport) {
    println!("{:<4} {:<32} {:>12} {:>12} {:>9}", "Rank", "Product", "Total", "Savings", "Savings%");
    println!("{}", "-".repeat(73));
    for (rank, entry) in report.ranked.iter().enumerate() {
        println!(
            "{:<4} {:<32} {:>12.2} {:>12.2} {:>8.1}%",
            rank + 1,
            entry.result.label,
            entry.result.total_cost,
            entry.savings,
            entry.savings_percentage
        );
    }

    if let Some(cheapest) = report.cheapest() {
        println!("\nBreak-even against '{}':", cheapest.result.label);
        for pair in &report.break_even {
            match pair.point {
                Some(point) => println!(
                    "  {:<32} year {:>6.2} at {:>12.2}",
                    pair.label, point.year, point.value
                ),
                None => println!("  {:<32} curves do not cross", pair.label),
            }
        }
    }
}

fn open_sink(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    })
}

fn write_batch_json(results: Vec<ValuationResult>, output: Option<&PathBuf>) -> Result<()> {
    let compact: Vec<ValuationResult> =
        results.into_iter().map(|r| r.without_breakdown()).collect();
    let mut sink = open_sink(output)?;
    serde_json::to_writer_pretty(&mut sink, &compact)?;
    writeln!(sink)?;
    sink.flush()?;
    Ok(())
}

fn write_batch_csv(results: &[ValuationResult], output: Option<&PathBuf>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(open_sink(output)?);

    writer.write_record([
        "label",
        "kind",
        "purchasePrice",
        "totalCost",
        "horizonYears",
        "annualizedCost",
        "monthlyCost",
        "fallbacks",
    ])?;
    for result in results {
        writer.write_record([
            result.label.clone(),
            format!("{:?}", result.kind).to_lowercase(),
            format!("{:.2}", result.purchase_price),
            format!("{:.2}", result.total_cost),
            result.horizon_years.to_string(),
            format!("{:.2}", result.annualized_cost()),
            result.monthly_cost.map(|m| format!("{:.2}", m)).unwrap_or_default(),
            result.fallbacks.len().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let prefs = load_preferences(&cli)?;
    let valuation_year = cli.valuation_year.unwrap_or_else(current_year);
    let engine = ValuationEngine::new(prefs.clone()).with_valuation_year(valuation_year);

    match &cli.command {
        Command::Value { input } => {
            let inputs = load_inputs(input)?;
            log::info!("valuing {} products", inputs.len());
            let results: Vec<ValuationResult> = inputs.iter().map(|i| engine.value(i)).collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                results.iter().for_each(print_result);
            }
        }

        Command::Compare { input } => {
            let entries: Vec<ComparisonEntry> = load_inputs(input)?
                .into_iter()
                .map(ComparisonEntry::from_product)
                .collect();
            let report = ComparisonEngine::new(engine).compare(&entries)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Command::Batch { input, vehicles, output } => {
            let inputs: Vec<ProductInput> = if *vehicles {
                load_vehicles(input)
                    .with_context(|| format!("reading vehicles from {}", input.display()))?
                    .into_iter()
                    .map(ProductInput::Vehicle)
                    .collect()
            } else {
                load_products(input)
                    .with_context(|| format!("reading products from {}", input.display()))?
                    .into_iter()
                    .map(ProductInput::Appliance)
                    .collect()
            };

            let runner = SensitivityRunner::new(prefs).with_valuation_year(valuation_year);
            let start = std::time::Instant::now();
            let results = runner.run_batch(&inputs);
            log::info!("valued {} records in {:?}", results.len(), start.elapsed());

            if cli.json {
                write_batch_json(results, output.as_ref())?;
            } else {
                write_batch_csv(&results, output.as_ref())?;
            }
        }

        Command::Sensitivity { input, discount_rates, electricity_rates } => {
            let (axis, values) = match (discount_rates.is_empty(), electricity_rates.is_empty()) {
                (false, _) => (SensitivityAxis::DiscountRate, discount_rates),
                (true, false) => (SensitivityAxis::ElectricityRate, electricity_rates),
                (true, true) => bail!("pass --discount-rates or --electricity-rates"),
            };

            let runner = SensitivityRunner::new(prefs).with_valuation_year(valuation_year);
            for product in load_inputs(input)? {
                let points = runner.vary(&product, axis, values);

                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&points)?);
                    continue;
                }

                println!("{} ({:?})", product.label(), axis);
                for point in &points {
                    println!("  {:>8.4} -> {:>12.2}", point.value, point.result.total_cost);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifetime_cost::product::ProductRecord;

    #[test]
    fn test_batch_json_honours_output_path() {
        let engine = ValuationEngine::default();
        let fridge = ProductInput::Appliance(ProductRecord::with_price(400.0));
        let results = vec![engine.value(&fridge)];
        let path = std::env::temp_dir()
            .join(format!("lifetime_cost_batch_{}.json", std::process::id()));

        write_batch_json(results, Some(&path)).unwrap();

        let written: Vec<ValuationResult> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].purchase_price, 400.0);
        assert!(written[0].yearly_breakdown.is_none());

        std::fs::remove_file(path).ok();
    }
}
