use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenlens::cli::commands::analyze::AnalyzeOptions;
use tokenlens::TokenError;
use tokenlens::config::{ConfigLoader, OutputFormat};

/// Parse output format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "tokenlens")]
#[command(
    version,
    about = "Extract design tokens, UI patterns and a quality score from rendered page samples"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Extra config file merged after project config")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a design spec from page sample files
    Analyze {
        #[arg(required = true, help = "PageSamples JSON files")]
        files: Vec<PathBuf>,
        #[arg(short = 'f', long, value_parser = parse_output_format, help = "Output format: json, yaml, markdown")]
        format: Option<OutputFormat>,
        #[arg(short = 'o', long, help = "Write to file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Score an existing design token document
    Score {
        #[arg(help = "DesignTokens JSON file")]
        tokens: PathBuf,
        #[arg(long, short, help = "Detected UI patterns JSON file")]
        patterns: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "markdown",
            value_parser = parse_output_format,
            help = "Output format: markdown, json, yaml"
        )]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n{}", style("━━━ PANIC ━━━").red().bold());
        eprintln!("{}", style("tokenlens encountered an unexpected error:").red());
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "{}",
                style(format!(
                    "Location: {}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                ))
                .dim()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red(), e);
            match e.downcast_ref::<TokenError>() {
                Some(err) => ExitCode::from(err.category().exit_code()),
                None => ExitCode::FAILURE,
            }
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            files,
            format,
            output,
        } => {
            let config = ConfigLoader::load_with(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(tokenlens::cli::commands::analyze::run(
                &config,
                AnalyzeOptions {
                    files,
                    format,
                    output,
                },
            ))?;
        }
        Commands::Score {
            tokens,
            patterns,
            format,
        } => {
            tokenlens::cli::commands::score::run(&tokens, patterns.as_deref(), format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let config = ConfigLoader::load_with(cli.config.as_deref())?;
                tokenlens::cli::commands::config::show(&config, &format)?;
            }
            ConfigAction::Path => {
                tokenlens::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                tokenlens::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
