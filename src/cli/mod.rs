// CLI module - Command-line entry points for serving and inspecting logs

mod output;

use crate::config::ServiceConfig;
use crate::logs::{self, LineCount, LogRegistry, DEFAULT_LINES};
use crate::server;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// logtail - Bounded tail reads over a fixed set of service logs
#[derive(Parser)]
#[command(name = "logtail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,

    /// List configured log services
    List,

    /// Print the last lines of a service log
    Tail {
        /// Service identifier (case-insensitive)
        service: String,

        /// Number of lines to display
        #[arg(short = 'n', long, default_value_t = DEFAULT_LINES as i64)]
        lines: i64,
    },
}

impl Cli {
    /// Run the CLI application
    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();
        cli.execute()
    }

    /// Execute the parsed command
    fn execute(&self) -> anyhow::Result<()> {
        let config = ServiceConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;

        init_tracing(&config.log_level);

        let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

        match &self.command {
            Commands::Serve => runtime
                .block_on(server::serve(config))
                .context("Server failed"),

            Commands::List => {
                let registry = LogRegistry::from_config(&config)
                    .context("Failed to initialize log directory")?;
                output::print_info(&format!(
                    "Log directory: {}",
                    registry.log_dir().display()
                ));
                output::print_service_table(registry.entries());
                Ok(())
            }

            Commands::Tail { service, lines } => {
                let lines = LineCount::new(*lines)?;
                let registry = LogRegistry::from_config(&config)
                    .context("Failed to initialize log directory")?;
                let path = registry.resolve(service)?;

                let text = runtime.block_on(logs::tail(path, lines));
                output::print_tail(&text);
                Ok(())
            }
        }
    }
}

/// Report a fatal CLI error
pub fn report_error(error: &anyhow::Error) {
    output::print_error(&format!("{:#}", error));
}

/// Install the global tracing subscriber; RUST_LOG wins over the configured level
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
