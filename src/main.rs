use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};

use std::path::PathBuf;

use market_share::{
    render::{self, Format},
    Data, SortKey,
};

#[derive(Parser)]
/// Reports quarterly PC vendor market share from CSV sales data.
///
/// Writes one HTML and one CSV report per country and period, prints the
/// figures for one vendor, then writes the HTML reports again sorted by
/// vendor and by units.
struct Args {
    /// Path to the sales CSV file
    #[arg(default_value = "data.csv")]
    input: PathBuf,
    /// Prefix for output file paths
    #[arg(short, long, default_value = "report")]
    output: String,
    /// Vendor to look up in each table
    #[arg(long, default_value = "Fujitsu Siemens")]
    vendor: String,
    /// Log more detail (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut data = Data::from_csv(&args.input)?;
    info!(tables = data.len(), "loaded {}", args.input.display());

    export(&data, &args.output, &[Format::Html, Format::Csv]);

    println!("Units and share for vendor: {}", args.vendor);
    for table in data.tables() {
        let (country, period) = (table.country(), table.period());
        match data.units_and_share(&args.vendor, country, period) {
            Some((units, share)) => {
                println!(" Country: {country} Period: {period} Units: {units:.2} Share: {share:.2}");
            }
            None => println!(" Country: {country} Period: {period} N/A"),
        }
    }
    println!();

    println!("Row position for vendor: {}", args.vendor);
    for table in data.tables() {
        let (country, period) = (table.country(), table.period());
        match data.row_position(&args.vendor, country, period) {
            Some(position) => println!(" Country: {country} Period: {period} Row: {position}"),
            None => println!(" Country: {country} Period: {period} N/A"),
        }
    }

    data.sort_all(SortKey::Vendor);
    export(&data, &format!("{}SortedByVendor", args.output), &[Format::Html]);
    data.sort_all(SortKey::Units);
    export(&data, &format!("{}SortedByUnits", args.output), &[Format::Html]);
    Ok(())
}

fn export(data: &Data, prefix: &str, formats: &[Format]) {
    for &format in formats {
        for (path, err) in render::export(data, prefix, format) {
            error!("writing {}: {err:#}", path.display());
        }
    }
}
