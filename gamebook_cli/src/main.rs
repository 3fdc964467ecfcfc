//! gamebook - Play a gamebook story in the terminal

mod terminal;

use clap::Parser;
use crossterm::style::Stylize;
use gamebook_core::config::ConfigError;
use gamebook_core::{
    Console, GameConfig, LineConsole, Pacing, RngRolls, RollSource, RuleError, RuleRegistry, RuleSettings, Session,
    SessionEnd, SessionError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use terminal::TerminalConsole;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_CRT_FILE: &str = "combat_result_table.toml";

/// Gamebook - Walk a story graph with combat, random rolls and gated choices
#[derive(Parser, Debug)]
#[command(name = "gamebook")]
#[command(about = "Play an interactive gamebook story")]
struct Args {
    /// Story file (TOML or JSON)
    #[arg(default_value = "story.toml")]
    story: PathBuf,

    /// Combat result table; defaults to combat_result_table.toml beside the story
    #[arg(long)]
    crt: Option<PathBuf>,

    /// Rule system to use instead of the one named in the story
    #[arg(long)]
    system: Option<String>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the pauses between combat blows
    #[arg(long, default_value_t = false)]
    no_delay: bool,

    /// Do not ask for action commands between nodes
    #[arg(long, default_value_t = false)]
    no_actions: bool,

    /// Plain output without colours
    #[arg(long, default_value_t = false)]
    plain: bool,

    /// Log engine decisions to stderr
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Failed to load story: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rules(#[from] RuleError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(args.verbose, env.as_deref()))
        .init();

    match run(&args) {
        Ok(end) => {
            tracing::info!(node = %end.node, defeated = end.player_defeated, "session finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "session halted");
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` when set, otherwise warn (debug with `--verbose`)
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(env.unwrap_or_default())
}

fn run(args: &Args) -> Result<SessionEnd, AppError> {
    let config = GameConfig::load(&args.story)?;
    let graph = Arc::new(config.story()?);
    let player = config.player();
    tracing::info!(nodes = graph.len(), start = %graph.start(), "story loaded");

    let system = args.system.as_deref().unwrap_or(&config.system);
    let settings = RuleSettings {
        crt_path: args.crt.clone().unwrap_or_else(|| crt_beside(&args.story)),
        table: None,
        rolls: roll_source(args.seed),
        pacing: if args.no_delay { Pacing::none() } else { Pacing::default() },
    };

    let registry = RuleRegistry::with_defaults();
    let mut rules = registry.create(system, settings)?;
    rules.initialize(&config)?;
    tracing::info!(system = rules.name(), "rule system ready");

    let mut session = Session::new(graph, rules, player).with_action_prompt(!args.no_actions);
    let mut console: Box<dyn Console> = if args.plain {
        Box::new(LineConsole::new(io::stdin().lock(), io::stdout()))
    } else {
        Box::new(TerminalConsole::new())
    };
    Ok(session.run(console.as_mut())?)
}

fn crt_beside(story: &Path) -> PathBuf {
    story
        .parent()
        .map(|dir| dir.join(DEFAULT_CRT_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CRT_FILE))
}

fn roll_source(seed: Option<u64>) -> Box<dyn RollSource> {
    match seed {
        Some(seed) => Box::new(RngRolls::new(ChaCha8Rng::seed_from_u64(seed))),
        None => Box::new(RngRolls::from_entropy()),
    }
}
