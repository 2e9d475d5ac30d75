mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "avtalskoll",
    version,
    about = "Consistency checks for waste-collection contract exports"
)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one check against an xlsx export
    Check {
        /// Check to run (see `avtalskoll checks`)
        check: String,

        /// Path to the xlsx export
        input_file: PathBuf,

        /// Frequency check: flag any difference between the fractions, not
        /// only denser food-waste collection
        #[arg(long)]
        strict: bool,

        /// Custom JSON rule configuration (default: built-in)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the deviation workbook to this file
        #[arg(short = 'O', long = "out", value_name = "FILE", conflicts_with = "out_dir")]
        out: Option<PathBuf>,

        /// Write the deviation workbook into this directory under a generated name
        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// List the available checks and their required columns
    Checks,
    /// Inspect and validate rule configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the built-in configuration as JSON
    Show,
    /// Validate a custom configuration file
    Validate {
        /// Path to JSON configuration file
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            check,
            input_file,
            strict,
            config,
            output,
            out,
            out_dir,
        } => commands::check::run(&check, input_file, strict, config, &output, out, out_dir),
        Commands::Checks => commands::checks::list(),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
