use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use roster_service::directory::{SortField, DEFAULT_PAGE, DEFAULT_SIZE};

mod api;
mod browser;
mod commands;
mod pager;
mod render;

use commands::ClientOptions;

/// roster - browse a paginated user directory from the terminal
#[derive(Parser)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL
    #[arg(
        long,
        global = true,
        env = "ROSTER_API_URL",
        default_value = "http://localhost:3001/api"
    )]
    url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS", default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of users
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,

        /// Users per page (1-100)
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: u32,

        /// Sort field: name or id
        #[arg(long)]
        sort: Option<SortField>,
    },
    /// Page through users interactively
    Browse {
        /// Users per page to start with
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: u32,
    },
    /// Check that the service is up
    Health {
        /// Show every field of the health report
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let options = ClientOptions {
        url: cli.url,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    let result = match cli.command {
        Commands::List { page, size, sort } => {
            commands::list::execute(&options, page, size, sort).await
        }
        Commands::Browse { size } => commands::browse::execute(&options, size).await,
        Commands::Health { verbose } => commands::health::execute(&options, verbose).await,
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
