use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::config::{ServerConfig, SourceConfig};
use crate::constants::{
    DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_LIMIT, DEFAULT_PORT,
    DEFAULT_RETRY_BACKOFF_MS, DEFAULT_SOURCE_URL,
};
use crate::utils::init_tracing;

#[derive(Parser)]
#[command(name = "stockindex")]
#[command(about = "Paginated JSON API over the daily stock-index CSV", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that downloads the CSV
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// URL of the index CSV
    #[arg(long, env = "CSV_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Per-request download timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Download attempts before giving up (first try included)
    #[arg(long, env = "FETCH_RETRIES", default_value_t = DEFAULT_FETCH_ATTEMPTS)]
    pub fetch_retries: u32,

    /// Delay before the first retry in milliseconds, doubled each time
    #[arg(long, env = "RETRY_BACKOFF_MS", default_value_t = DEFAULT_RETRY_BACKOFF_MS)]
    pub retry_backoff_ms: u64,
}

impl From<SourceArgs> for SourceConfig {
    fn from(args: SourceArgs) -> Self {
        SourceConfig::new(
            args.source_url,
            args.fetch_timeout_secs,
            args.fetch_retries,
            args.retry_backoff_ms,
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the CSV in the background and start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Largest page size a client may request (0 = no cap)
        #[arg(long, env = "MAX_PAGE_LIMIT", default_value_t = DEFAULT_MAX_LIMIT)]
        max_limit: usize,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Download and parse the CSV once, then print a summary
    Check {
        /// Number of records to preview
        #[arg(long, default_value_t = 5)]
        preview: usize,

        #[command(flatten)]
        source: SourceArgs,
    },
}

pub async fn run() {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve {
            port,
            max_limit,
            source,
        } => {
            let config = ServerConfig {
                port,
                max_limit,
                source: source.into(),
            };
            commands::serve::run(config).await;
        }
        Commands::Check { preview, source } => {
            commands::check::run(source.into(), preview).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "stockindex",
            "serve",
            "--port",
            "8080",
            "--max-limit",
            "50",
            "--source-url",
            "http://localhost:9000/dump.csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve {
                port,
                max_limit,
                source,
            } => {
                assert_eq!(port, 8080);
                assert_eq!(max_limit, 50);
                assert_eq!(source.source_url, "http://localhost:9000/dump.csv");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["stockindex", "check", "--preview", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { preview: 2, .. }));
    }
}
