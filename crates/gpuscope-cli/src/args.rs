use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gpuscope")]
#[command(about = "Query the gpuscope API from the terminal", long_about = None)]
pub struct Args {
    /// API base URL
    #[arg(long, env = "GPUSCOPE_API_URL", default_value = "http://127.0.0.1:8080")]
    pub api_url: String,

    /// Print the raw JSON payload instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check API and Prometheus connectivity
    Health,
    /// Per-GPU metrics
    Metrics(MetricsFilterArgs),
    /// GPU nodes with counts and models
    Nodes,
    /// Raw utilization samples
    Utilization,
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub struct MetricsFilterArgs {
    /// Only nodes whose name contains this text (case-insensitive)
    #[arg(long)]
    pub node: Option<String>,

    /// Minimum utilization in percent
    #[arg(long)]
    pub min_util: Option<f64>,

    /// Maximum utilization in percent
    #[arg(long)]
    pub max_util: Option<f64>,

    /// Minimum temperature in Celsius
    #[arg(long)]
    pub min_temp: Option<f64>,

    /// Maximum temperature in Celsius
    #[arg(long)]
    pub max_temp: Option<f64>,

    /// Only GPUs at or above 80% utilization
    #[arg(long)]
    pub high_util: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_filters_parse() {
        let args = Args::try_parse_from([
            "gpuscope",
            "metrics",
            "--node",
            "gpu-a",
            "--min-util",
            "10",
            "--max-temp",
            "85.5",
            "--high-util",
        ])
        .unwrap();
        match args.command {
            Command::Metrics(f) => {
                assert_eq!(f.node.as_deref(), Some("gpu-a"));
                assert_eq!(f.min_util, Some(10.0));
                assert_eq!(f.max_temp, Some(85.5));
                assert!(f.high_util);
                assert!(f.max_util.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_json_flag_after_subcommand() {
        let args = Args::try_parse_from(["gpuscope", "nodes", "--json"]).unwrap();
        assert!(args.json);
        assert!(matches!(args.command, Command::Nodes));
    }
}
