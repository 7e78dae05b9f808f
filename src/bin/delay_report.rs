//! Delivery Delay Report
//! Run: ./target/release/delay_report --input data/deliveries.csv

use anyhow::Result;
use clap::Parser;
use courier_delay::config;
use courier_delay::output;
use courier_delay::pipeline::StatusSummary;
use courier_delay::report::{self, GroupStats};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "delay_report")]
#[command(about = "On-time breakdowns over a classified delivery CSV")]
struct Args {
    /// Classified deliveries CSV
    #[arg(long, default_value = config::DEFAULT_OUTPUT_PATH)]
    input: PathBuf,
}

fn print_section(title: &str, column: &str, stats: &[GroupStats]) {
    println!("\n{}", title);
    println!("{}", "-".repeat(70));
    println!(
        "  {:16} {:>10} {:>10} {:>10} {:>10}  {}",
        column, "Deliveries", "On-Time%", "Delayed%", "Avg Min", "Visual"
    );
    println!("  {}", "-".repeat(66));

    for stat in stats {
        let on_time_pct = stat.on_time_pct();
        let bar: String = "#".repeat((on_time_pct / 5.0) as usize);
        println!(
            "  {:16} {:>10} {:>9.1}% {:>9.1}% {:>10.1}  {}",
            stat.label,
            stat.summary.total,
            on_time_pct,
            stat.delayed_pct(),
            stat.avg_delivery_time,
            bar
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let rows = output::read_csv(&args.input)?;

    println!("\n{}", "=".repeat(70));
    println!("                   DELIVERY DELAY REPORT");
    println!("{}", "=".repeat(70));

    let overall = StatusSummary::from_statuses(rows.iter().map(|r| r.status));
    match (overall.on_time_pct(), overall.delayed_pct()) {
        (Some(on_time), Some(delayed)) => {
            println!("  Deliveries: {:>6}", overall.total);
            println!("  On-time:    {:>6} ({:.1}%)", overall.on_time, on_time);
            println!("  Delayed:    {:>6} ({:.1}%)", overall.delayed, delayed);
        }
        _ => {
            println!("  No deliveries in {}", args.input.display());
            return Ok(());
        }
    }

    let weekdays = report::by_weekday(&rows);
    let zones = report::by_zone(&rows);
    print_section("BY WEEKDAY", "Weekday", &weekdays);
    print_section("BY DELIVERY ZONE", "Zone", &zones);
    print_section("BY WEATHER CONDITION", "Weather", &report::by_weather(&rows));
    print_section("BY PACKAGE TYPE", "Package", &report::by_package(&rows));

    println!("\n\nKEY INSIGHTS");
    println!("{}", "-".repeat(60));
    if let Some(best) = weekdays
        .iter()
        .max_by(|a, b| a.on_time_pct().total_cmp(&b.on_time_pct()))
    {
        println!(
            "  Best weekday:        {} ({:.1}% on-time)",
            best.label,
            best.on_time_pct()
        );
    }
    if let Some(worst) = zones
        .iter()
        .max_by(|a, b| a.delayed_pct().total_cmp(&b.delayed_pct()))
    {
        println!(
            "  Most delayed zone:   {} ({:.1}% delayed)",
            worst.label,
            worst.delayed_pct()
        );
    }

    println!("\n{}", "=".repeat(70));
    println!();

    Ok(())
}
