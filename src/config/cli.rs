use crate::config::AppConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "score-graph")]
#[command(about = "Aggregates user scores from the document store and serves them for charting")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the aggregation service (gRPC)
    Serve {
        #[arg(long)]
        listen: Option<String>,

        #[arg(long)]
        max_workers: Option<usize>,
    },
    /// Run the HTTP gateway in front of the aggregation service
    Gateway {
        #[arg(long)]
        listen: Option<String>,

        #[arg(long)]
        service_endpoint: Option<String>,
    },
    /// Call GetGraphData once and print the result
    Probe {
        #[arg(long)]
        endpoint: Option<String>,
    },
}

impl Cli {
    /// Fold command line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if self.json_logs {
            config.logging.json = true;
        }

        match &self.command {
            Command::Serve {
                listen,
                max_workers,
            } => {
                if let Some(listen) = listen {
                    config.service.listen_addr = listen.clone();
                }
                if let Some(max_workers) = max_workers {
                    config.service.max_workers = *max_workers;
                }
            }
            Command::Gateway {
                listen,
                service_endpoint,
            } => {
                if let Some(listen) = listen {
                    config.gateway.listen_addr = listen.clone();
                }
                if let Some(endpoint) = service_endpoint {
                    config.gateway.service_endpoint = endpoint.clone();
                }
            }
            Command::Probe { endpoint } => {
                if let Some(endpoint) = endpoint {
                    config.gateway.service_endpoint = endpoint.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "score-graph",
            "serve",
            "--listen",
            "127.0.0.1:6000",
            "--max-workers",
            "3",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.service.listen_addr, "127.0.0.1:6000");
        assert_eq!(config.service.max_workers, 3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "score-graph",
            "gateway",
            "--service-endpoint",
            "http://svc:50051",
            "--json-logs",
            "-c",
            "app.toml",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.config.as_deref(), Some("app.toml"));
        assert_eq!(config.gateway.service_endpoint, "http://svc:50051");
        assert!(config.logging.json);
    }
}
