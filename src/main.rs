use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sitewarden")]
#[command(
    version,
    about = "AI-driven construction site safety analysis and Go/No-Go decisions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the four-stage safety analysis for a site
    Analyze {
        #[arg(help = "Site identifier to analyze")]
        site_id: String,
        #[arg(long, help = "LLM provider (gemini, mock)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(short, long, help = "Write the report to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Normalize a stored report into the canonical shape
    Adapt {
        #[arg(help = "Path to the stored report JSON")]
        input: PathBuf,
        #[arg(short, long, help = "Write the canonical report to a file")]
        output: Option<PathBuf>,
    },

    /// Fetch a previously stored report by id and render it
    Report {
        #[arg(help = "Report identifier")]
        report_id: String,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
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

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mSiteWarden encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
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
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Analyze {
            site_id,
            provider,
            model,
            format,
            output,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(sitewarden::cli::commands::analyze::run(
                sitewarden::cli::commands::analyze::AnalyzeOptions {
                    site_id,
                    provider,
                    model,
                    format,
                    output,
                },
            ))?;
        }
        Commands::Report { report_id, format } => {
            let rt = Runtime::new()?;
            rt.block_on(sitewarden::cli::commands::report::run(&report_id, &format))?;
        }
        Commands::Adapt { input, output } => {
            sitewarden::cli::commands::adapt::run(&input, output)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                sitewarden::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                sitewarden::cli::commands::config::path()?;
            }
        },
    }

    Ok(())
}
