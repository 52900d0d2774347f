#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{ErrorReport, OutputMode};
use planning_search_core::config::resolve_config;
use std::env;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "psearch: planning advanced search filter state",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List the search form fields of a filter mode",
        long_about = "List the ordered field descriptors for a filter mode, bound to a filter state.",
        after_help = "EXAMPLES:\n    # Fields of the planning form\n    psearch fields --mode planning\n\n    # Bind values from a saved state\n    psearch fields --mode events --state search.json --format json"
    )]
    Fields(cmd::fields::FieldsArgs),

    #[command(
        about = "Apply field edits to a filter state",
        long_about = "Run field edits through a search session, including the spike-state policy.",
        after_help = "EXAMPLES:\n    # Show only posted items\n    psearch apply --set advancedSearch.posted=true\n\n    # Pick a symbolic range and save the result\n    psearch apply --state search.json --set advancedSearch.dates.range=today --out search.json"
    )]
    Apply(cmd::apply::ApplyArgs),

    #[command(
        about = "Show the effective date window",
        long_about = "Resolve the date bounds a filter state selects, expanding symbolic ranges.",
        after_help = "EXAMPLES:\n    # Window relative to a fixed day\n    psearch window --state search.json --today 2026-10-14"
    )]
    Window(cmd::window::WindowArgs),

    #[command(
        about = "Encode a filter state as query parameters",
        long_about = "Flatten a filter state into dotted-path query parameters, or decode them back.",
        after_help = "EXAMPLES:\n    # Encode\n    psearch params --state search.json\n\n    # Decode\n    psearch params --decode advancedSearch.slugline=flood spikeState='\"both\"'"
    )]
    Params(cmd::params::ParamsArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    psearch completions bash > /etc/bash_completion.d/psearch"
    )]
    Completions {
        /// Target shell for completion script generation.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PSEARCH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "psearch=debug,planning_search_core=debug,info"
        } else {
            "psearch=info,warn"
        })
    });

    let format = env::var("PSEARCH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let config = resolve_config(&project_root)?;
    let output = OutputMode::resolve(cli.format, cli.json, config.user.output.as_deref());
    let search = &config.project;

    match &cli.command {
        Commands::Fields(args) => cmd::fields::run_fields(args, search, output),
        Commands::Apply(args) => cmd::apply::run_apply(args, search, output),
        Commands::Window(args) => cmd::window::run_window(args, search, output),
        Commands::Params(args) => cmd::params::run_params(args, output),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "psearch", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mode = OutputMode::resolve(cli.format, cli.json, None);
            if let Err(render_err) = output::report_error(mode, &ErrorReport::from(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
