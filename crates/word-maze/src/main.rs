//! CLI entry point for the word maze generator.
//!
//! Usage:
//!   word-maze generate <config.json> [options]
//!   word-maze generate --stdin [options]
//!
//! Options:
//!   --seed <n>        Seed for the random source (default: from config, else random)
//!   --attempts <n>    Fresh mazes to try before giving up (default: from config)
//!   --pretty          Pretty-print the JSON output
//!   -v, --verbose     Log every stage at debug level

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use word_maze::{generate_word_maze, MazeConfig, MazeError, MazeSnapshot, WordMaze};

#[derive(Parser)]
#[command(name = "word-maze")]
#[command(about = "Generate mazes whose solution path spells a list of answers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a word maze and print it as JSON
    Generate {
        /// Path to maze config JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read config from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Seed for the random source
        #[arg(long)]
        seed: Option<u64>,

        /// Fresh mazes to try before giving up
        #[arg(long)]
        attempts: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Log every stage at debug level
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Output format for a generated maze
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationOutput {
    seed: u64,
    attempts: usize,
    alternates_exact: usize,
    alternates_fallback: usize,
    alternates_skipped: usize,
    maze: MazeSnapshot,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            file,
            stdin,
            seed,
            attempts,
            pretty,
            verbose,
        } => {
            init_logging(verbose);
            match run_generate(file, stdin, seed, attempts, pretty) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!("{:#}", err);
                    match err.downcast_ref::<MazeError>() {
                        Some(MazeError::Unsolvable { .. }) => {
                            eprintln!(
                                "The generated maze could not be solved; try more barrier \
                                 removals, a different size, more attempts, or just run again."
                            );
                            ExitCode::from(2)
                        }
                        _ => ExitCode::from(1),
                    }
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run_generate(
    file: Option<PathBuf>,
    stdin: bool,
    seed: Option<u64>,
    attempts: Option<usize>,
    pretty: bool,
) -> Result<()> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read config from stdin")?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {:?}", path))?
    } else {
        bail!("must provide either a config file path or --stdin");
    };

    let mut config = MazeConfig::from_json(&json_content).context("invalid maze config")?;
    if let Some(attempts) = attempts {
        config.max_attempts = attempts;
    }
    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    info!("using seed {}", seed);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maze = generate_word_maze(&config, &mut rng)?;

    let output = format_result(seed, &maze);
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}

fn format_result(seed: u64, maze: &WordMaze) -> GenerationOutput {
    let metrics = maze.metrics();
    GenerationOutput {
        seed,
        attempts: metrics.attempts,
        alternates_exact: metrics.placement.exact,
        alternates_fallback: metrics.placement.fallback,
        alternates_skipped: metrics.placement.skipped,
        maze: maze.snapshot(),
    }
}
