//! it - issuetrack terminal client
//!
//! Lists, filters and browses issues of an issuetrack server.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use commands::auth::LoginArgs;
use commands::issues::IssuesArgs;
use context::AppContext;

/// it - issuetrack terminal client
#[derive(Parser, Debug)]
#[command(name = "it")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "ISSUETRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tracker API base URL (overrides configuration)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List issues once
    #[command(alias = "ls")]
    Issues(IssuesArgs),

    /// Show the values available for each filter
    Filters,

    /// Browse issues interactively
    Browse,

    /// Verify an API token and store it as the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show who requests are sent as
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.global);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting it");

    let ctx = AppContext::load(&cli.global)?;

    match cli.command {
        Commands::Issues(args) => commands::issues::run(&ctx, args).await,
        Commands::Filters => commands::filters::run(&ctx).await,
        Commands::Browse => commands::browse::run(&ctx).await,
        Commands::Login(args) => commands::auth::login(&ctx, args).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx).await,
    }
}

/// Initialize tracing/logging on stderr
fn init_tracing(args: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let json = args.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text = (!args.log_json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issues_flags() {
        let cli = Cli::try_parse_from([
            "it", "--no-color", "issues", "--type", "2", "--type", "5", "--search", "login",
            "--sort", "title", "--direction", "desc", "--unassigned",
        ])
        .unwrap();
        assert!(cli.global.no_color);
        match cli.command {
            Commands::Issues(args) => {
                assert_eq!(args.types, vec![2, 5]);
                assert_eq!(args.search.as_deref(), Some("login"));
                assert!(args.unassigned);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["it", "whoami", "--api-url", "https://t.example.com"]).unwrap();
        assert_eq!(cli.global.api_url.as_deref(), Some("https://t.example.com"));
    }
}
