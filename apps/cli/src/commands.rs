//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use firmscope_core::{ProfileComposer, ProgressReporter};
use firmscope_shared::{AppConfig, RegistryNumber, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// firmscope: company profiles from Czech public registries.
#[derive(Parser)]
#[command(
    name = "firmscope",
    version,
    about = "Aggregate registry, document and procurement data for Czech companies.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to load instead of ~/.firmscope/firmscope.toml.
    #[arg(long, env = "FIRMSCOPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Registry profile plus discovered annual reports.
    Profile {
        /// 8-digit registry number (IČO).
        ico: String,

        /// Years to look back for documents (defaults to config).
        #[arg(long)]
        lookback: Option<u32>,
    },

    /// Document summary only.
    Documents {
        /// 8-digit registry number (IČO).
        ico: String,

        /// Years to look back (defaults to config).
        #[arg(long)]
        lookback: Option<u32>,
    },

    /// Relevant public contracts of a company.
    Procurement {
        /// 8-digit registry number (IČO).
        ico: String,
    },

    /// Open tenders of a company that still accept offers.
    Tenders {
        /// 8-digit registry number (IČO).
        ico: String,
    },

    /// Search the registry by company name.
    Search {
        /// Company name or a fragment of it.
        name: String,

        /// Maximum number of results.
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Search the registry by name, keeping only IT vendors.
    Vendors {
        /// Company name or a fragment of it.
        name: String,

        /// Maximum number of companies requested from the registry.
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Active public contracts of any company matching the keywords.
    Opportunities {
        /// Keywords, matched disjunctively.
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Maximum number of results.
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "firmscope=warn",
        1 => "firmscope=info",
        _ => "firmscope=debug",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Profile { ico, lookback } => cmd_profile(config_path, &ico, lookback).await,
        Command::Documents { ico, lookback } => cmd_documents(config_path, &ico, lookback).await,
        Command::Procurement { ico } => cmd_procurement(config_path, &ico).await,
        Command::Tenders { ico } => cmd_tenders(config_path, &ico).await,
        Command::Search { name, limit } => cmd_search(config_path, &name, limit).await,
        Command::Vendors { name, limit } => cmd_vendors(config_path, &name, limit).await,
        Command::Opportunities { keywords, limit } => {
            cmd_opportunities(config_path, &keywords, limit).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

fn composer(path: Option<&Path>) -> Result<ProfileComposer> {
    let config = resolve_config(path)?;
    Ok(ProfileComposer::from_config(&config)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_profile(config: Option<&Path>, ico: &str, lookback: Option<u32>) -> Result<()> {
    let composer = composer(config)?;
    let lookback = lookback.unwrap_or(composer.lookback_years());
    info!(ico, lookback, "composing company profile");

    let reporter = CliProgress::new();
    let result = composer.compose(ico, lookback, &reporter).await;
    reporter.finish();

    print_json(&result?)
}

async fn cmd_documents(config: Option<&Path>, ico: &str, lookback: Option<u32>) -> Result<()> {
    let registry_number = RegistryNumber::parse(ico)?;
    let composer = composer(config)?;
    let lookback = lookback.unwrap_or(composer.lookback_years());

    let reporter = CliProgress::new();
    reporter.phase("Discovering documents");
    let summary = composer
        .get_document_summary(&registry_number, lookback)
        .await;
    reporter.finish();

    print_json(&summary)
}

async fn cmd_procurement(config: Option<&Path>, ico: &str) -> Result<()> {
    let registry_number = RegistryNumber::parse(ico)?;
    let composer = composer(config)?;

    let reporter = CliProgress::new();
    reporter.phase("Searching public contracts");
    let summary = composer.get_procurement_summary(&registry_number).await;
    reporter.finish();

    print_json(&summary)
}

async fn cmd_tenders(config: Option<&Path>, ico: &str) -> Result<()> {
    let registry_number = RegistryNumber::parse(ico)?;
    let composer = composer(config)?;

    let reporter = CliProgress::new();
    reporter.phase("Searching open tenders");
    let tenders = composer.get_active_tenders(&registry_number).await;
    reporter.finish();

    print_json(&tenders)
}

async fn cmd_search(config: Option<&Path>, name: &str, limit: u32) -> Result<()> {
    let composer = composer(config)?;

    let reporter = CliProgress::new();
    reporter.phase("Searching the registry");
    let result = composer.search_companies(name, limit).await;
    reporter.finish();

    print_json(&result?)
}

async fn cmd_vendors(config: Option<&Path>, name: &str, limit: u32) -> Result<()> {
    let composer = composer(config)?;

    let reporter = CliProgress::new();
    reporter.phase("Searching IT vendors");
    let result = composer.search_vendors(name, limit).await;
    reporter.finish();

    print_json(&result?)
}

async fn cmd_opportunities(config: Option<&Path>, keywords: &[String], limit: u32) -> Result<()> {
    let composer = composer(config)?;

    let reporter = CliProgress::new();
    reporter.phase("Searching active contracts");
    let found = composer.search_opportunities(keywords, limit).await;
    reporter.finish();

    print_json(&found)
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_done(&self, source: &str, items: usize, degraded: bool) {
        if degraded {
            self.spinner
                .set_message(format!("{source}: unavailable, continuing without it"));
        } else {
            self.spinner.set_message(format!("{source}: {items} item(s)"));
        }
    }
}
