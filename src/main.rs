use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overload::cli::commands;
use overload::cli::ui::Output;
use overload::cli::{CommandContext, GlobalArgs};

#[derive(Parser)]
#[command(name = "overload")]
#[command(
    version,
    about = "Clean, transform and compile per-library documentation for LLM context"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, env = "OVERLOAD_ROOT", help = "Project root (default: current directory)")]
    root: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Config file (default: <root>/overload.toml)")]
    config: Option<PathBuf>,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create overload.toml, the docs layout, the lock file and a starter prompt
    Init {
        #[arg(long, short, help = "Overwrite existing config and prompt")]
        force: bool,
    },

    /// Delete non-Markdown files from every docs/<library>/input tree
    Clean,

    /// Transform changed input pages into docs/<library>/output
    Transform {
        #[arg(long, help = "Do not echo streamed model output")]
        no_echo: bool,
    },

    /// Concatenate each library into public/docs/<library>.md
    Compile,

    /// clean, transform and compile in order
    Run {
        #[arg(long, help = "Do not echo streamed model output")]
        no_echo: bool,
    },

    /// Show pages pending transformation per library
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = ["text", "json"],
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
            value_parser = ["toml", "json"],
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration and layout paths
    Path,
    /// Write a default overload.toml
    Init {
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

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31moverload encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!("\x1b[90mThe lock file only records completed pages; rerunning is safe.\x1b[0m");
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{:#}", e));
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

    // stdout carries streamed model output; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = GlobalArgs {
        root: cli.root,
        config: cli.config,
        quiet: cli.quiet,
    };

    let rt = Runtime::new()?;

    match cli.command {
        Commands::Init { force } => {
            rt.block_on(commands::init::run(&args, force))?;
        }
        Commands::Clean => {
            let ctx = CommandContext::load(&args)?;
            rt.block_on(commands::clean::run(&ctx))?;
        }
        Commands::Transform { no_echo } => {
            let ctx = CommandContext::load(&args)?;
            rt.block_on(commands::transform::run(&ctx, no_echo))?;
        }
        Commands::Compile => {
            let ctx = CommandContext::load(&args)?;
            rt.block_on(commands::compile::run(&ctx))?;
        }
        Commands::Run { no_echo } => {
            let ctx = CommandContext::load(&args)?;
            rt.block_on(commands::run::run(&ctx, no_echo))?;
        }
        Commands::Status { format } => {
            let ctx = CommandContext::load(&args)?;
            rt.block_on(commands::status::run(&ctx, &format))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let ctx = CommandContext::load(&args)?;
                commands::config::show(&ctx, &format)?;
            }
            ConfigAction::Path => {
                let ctx = CommandContext::load(&args)?;
                commands::config::path(&ctx)?;
            }
            ConfigAction::Init { force } => {
                commands::config::init(&args, force)?;
            }
        },
    }

    Ok(())
}
