use std::path::PathBuf;

use clap::Parser;
use gpuscope_common::telemetry::LogFormat;

#[derive(Debug, Parser)]
#[command(author, version, about = "GPU metrics API backed by Prometheus")]
pub struct Args {
    #[arg(long, env = "PROMETHEUS_URL", default_value = "http://localhost:9090")]
    pub prometheus_url: String,

    #[arg(long, env = "GPUSCOPE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory served for non-API paths; skipped when missing.
    #[arg(long, env = "GPUSCOPE_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Overall deadline for one API request's Prometheus work.
    #[arg(long, env = "GPUSCOPE_QUERY_TIMEOUT_SECS", default_value_t = 30)]
    pub query_timeout_secs: u64,

    #[arg(long, env = "GPUSCOPE_PROBE_TIMEOUT_SECS", default_value_t = 5)]
    pub probe_timeout_secs: u64,

    #[arg(long, env = "GPUSCOPE_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    #[arg(long, env = "GPUSCOPE_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    #[arg(long, env = "GPUSCOPE_OTLP_TOKEN")]
    pub otlp_token: Option<String>,
}

impl Args {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
