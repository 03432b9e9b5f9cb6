use anyhow::Result;
use std::io::{self, Write};
use clap::Parser;
use futures::future::join_all;
use tracing::info;

use dhl_tracking::{TrackingClient, TrackingError, config::Config, models::ShipmentsResult};

#[derive(Parser, Debug)]
#[command(name = "dhl-tracking")]
#[command(about = "Look up shipments with the DHL Shipment Tracking API", long_about = None)]
struct Args {
    /// Tracking numbers to look up
    #[arg(required = true, value_name = "TRACKING_NUMBER")]
    tracking_numbers: Vec<String>,

    /// Print the decoded responses as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dhl_tracking={log_level}").into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let client = TrackingClient::from_config(&config)?;
    info!(url = client.base_url(), "Tracking {} shipment(s)", args.tracking_numbers.len());

    let lookups = args
        .tracking_numbers
        .iter()
        .map(|number| client.shipments(number));
    let results = join_all(lookups).await;

    let mut failed = 0;
    for (number, result) in args.tracking_numbers.iter().zip(results) {
        match result {
            Ok(found) if args.json => println!("{}", serde_json::to_string_pretty(&found)?),
            Ok(found) => print_summary(number, &found),
            Err(e) => {
                failed += 1;
                print_failure(&mut std::io::stderr().lock(), number, &e)?;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} lookup(s) failed", failed);
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(tracking_number: &str, found: &ShipmentsResult) {
    println!("📦 Tracking: {}", tracking_number);

    for shipment in &found.shipments {
        let status = &shipment.status;
        println!("🚚 Shipment: {} ({})", shipment.id, shipment.service);
        match status.timestamp {
            Some(at) => println!("📍 Status: {} - {} [{}]", status.status, status.description, at),
            None => println!("📍 Status: {} - {}", status.status, status.description),
        }

        match status.final_status() {
            Some(outcome) => println!("✅ Final: {}", outcome),
            None => println!("ℹ️  Status is not final, {} event(s) so far", shipment.events.len()),
        }
    }

    for url in &found.possible_additional_shipments_url {
        println!("🔗 More results: {}", url);
    }

    println!("================================");
}

fn print_failure(out: &mut impl Write, tracking_number: &str, error: &TrackingError) -> io::Result<()> {
    // API errors display as the upstream detail; the rest carry their cause
    writeln!(out, "❌ {}: {}", tracking_number, error)?;
    writeln!(out, "================================")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhl_tracking::models::ProblemDetail;

    #[test]
    fn failure_and_separator_share_one_stream() {
        let error = TrackingError::Api(ProblemDetail {
            detail: "No shipment with given tracking number found.".to_string(),
            ..ProblemDetail::default()
        });
        let mut out = Vec::new();

        print_failure(&mut out, "123", &error).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "❌ 123: No shipment with given tracking number found.\n================================\n"
        );
    }
}
