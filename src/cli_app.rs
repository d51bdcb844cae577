//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::DateTime;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use thiserror::Error;

use classclock::clock::{EnglishWeekdays, FixedInstantSource, TimeSampler};
use classclock::core::config::Config;
use classclock::core::errors::ClockError;
use classclock::tui;

/// Decorative terminal clock rendered as a live Java class.
#[derive(Debug, Parser)]
#[command(
    name = "classclock",
    author,
    version,
    about = "Decorative terminal clock styled as a live Java class",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Use the high-contrast palette.
    #[arg(long, global = true)]
    high_contrast: bool,
    /// Display options when no subcommand is given.
    #[command(flatten)]
    run: RunArgs,
    /// Subcommand to execute (defaults to `run`).
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run the full-screen clock display.
    Run(RunArgs),
    /// Print a single clock sample and exit.
    Once(OnceArgs),
    /// Print the effective configuration as TOML.
    Config,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Default, Args)]
struct RunArgs {
    /// Clock refresh interval in milliseconds.
    #[arg(long, value_name = "N")]
    tick_ms: Option<u64>,
    /// Boot overlay duration in milliseconds.
    #[arg(long, value_name = "N")]
    boot_ms: Option<u64>,
    /// Inactivity window before returning to idle, in milliseconds.
    #[arg(long, value_name = "N")]
    idle_ms: Option<u64>,
}

#[derive(Debug, Clone, Args)]
struct OnceArgs {
    /// Emit the sample as JSON.
    #[arg(long)]
    json: bool,
    /// Sample this RFC 3339 instant instead of the host clock.
    #[arg(long, value_name = "RFC3339")]
    at: Option<String>,
    /// Zone label reported with `--at` (defaults to the instant's offset).
    #[arg(long, value_name = "NAME", requires = "at")]
    zone: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("{0}")]
    User(String),
    #[error(transparent)]
    Clock(#[from] ClockError),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        None => run_display(cli, &cli.run),
        Some(Command::Run(args)) => run_display(cli, args),
        Some(Command::Once(args)) => run_once(cli, args),
        Some(Command::Config) => run_config(cli),
        Some(Command::Completions(args)) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

/// File + env config with global and display flags applied on top.
fn effective_config(cli: &Cli, args: &RunArgs) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_color {
        config.theme.no_color = true;
    }
    if cli.high_contrast {
        config.theme.high_contrast = true;
    }
    if let Some(ms) = args.tick_ms {
        config.display.tick_interval_ms = ms;
    }
    if let Some(ms) = args.boot_ms {
        config.display.boot_duration_ms = ms;
    }
    if let Some(ms) = args.idle_ms {
        config.display.idle_timeout_ms = ms;
    }
    config.validate()?;
    if config.theme.no_color {
        control::set_override(false);
    }
    Ok(config)
}

fn run_display(cli: &Cli, args: &RunArgs) -> Result<(), CliError> {
    let config = effective_config(cli, args)?;
    tui::run_display(&config)?;
    Ok(())
}

fn run_once(cli: &Cli, args: &OnceArgs) -> Result<(), CliError> {
    effective_config(cli, &RunArgs::default())?;

    let sampler = match &args.at {
        Some(raw) => {
            let at = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| CliError::User(format!("invalid --at instant {raw:?}: {e}")))?;
            let zone = args
                .zone
                .clone()
                .unwrap_or_else(|| at.offset().to_string());
            TimeSampler::new(
                Box::new(FixedInstantSource::new(at, zone)),
                Box::new(EnglishWeekdays),
            )
        }
        None => TimeSampler::system(),
    };
    let state = sampler.sample();

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer(&mut stdout, &state)?;
        writeln!(stdout)?;
    } else {
        writeln!(
            stdout,
            "{}  {}",
            state.display_string().bold(),
            state.timezone.dimmed()
        )?;
    }
    Ok(())
}

fn run_config(cli: &Cli) -> Result<(), CliError> {
    let config = effective_config(cli, &RunArgs::default())?;
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", config.to_toml_string()?)?;
    writeln!(stdout, "# hash: {}", config.stable_hash()?)?;
    Ok(())
}
