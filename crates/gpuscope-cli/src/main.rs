mod args;
mod client;
mod filter;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use gpuscope_common::{GpuMetrics, GpuNode, GpuUtilization, HealthStatus};
use reqwest::Client;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};
use crate::client::fetch;
use crate::filter::summarize;
use crate::output::{print_health, print_metrics, print_nodes, print_utilization};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(3))
        .timeout(Duration::from_secs(60))
        .build()?;
    let base = args.api_url.as_str();

    match args.command {
        Command::Health => match fetch::<HealthStatus>(&client, base, "/health").await {
            Ok(status) if args.json => print_json(&status)?,
            Ok(status) => print_health(&status),
            Err(e) => {
                eprintln!("✗ Health check failed: {e:#}");
                std::process::exit(1);
            }
        },
        Command::Metrics(filters) => {
            let metrics: Vec<GpuMetrics> = fetch(&client, base, "/v1/gpu/metrics").await?;
            let metrics = filters.apply(metrics);
            if args.json {
                print_json(&metrics)?;
            } else {
                print_metrics(&metrics, &summarize(&metrics));
            }
        }
        Command::Nodes => {
            let nodes: Vec<GpuNode> = fetch(&client, base, "/v1/gpu/nodes").await?;
            if args.json {
                print_json(&nodes)?;
            } else {
                print_nodes(&nodes);
            }
        }
        Command::Utilization => {
            let samples: Vec<GpuUtilization> =
                fetch(&client, base, "/v1/gpu/utilization").await?;
            if args.json {
                print_json(&samples)?;
            } else {
                print_utilization(&samples);
            }
        }
    }
    Ok(())
}
