//! Go-Reading: inspect reading budgets and superstrings from the command line.
//!
//! ## Usage
//!
//! - `go-reading` - Report the parameters at the default level
//! - `go-reading levels --level 8 --level 12 --set depth=20` - Report several levels
//! - `go-reading superstring --black D4,E5 --white E4 --at D4 --mode full`

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;

use go_reading::constants::DEFAULT_LEVEL;
use go_reading::depth::{Assignment, DepthBudget, Overrides};
use go_reading::position::{Position, parse_coord, str_coord};
use go_reading::reading::Reader;
use go_reading::superstring::{Connection, Query, SuperstringBuilder};

/// Go-Reading: superstrings and reading budgets for Go engines
#[derive(Parser)]
#[command(name = "go-reading")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (reading verdicts and node counts)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reading parameters derived from one or more levels
    Levels {
        /// Skill level to report (repeatable)
        #[arg(short, long, allow_negative_numbers = true)]
        level: Vec<i32>,

        /// Override a parameter, e.g. `depth=20` (repeatable, -1 clears)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<Assignment>,
    },
    /// Build the superstring of a stone in a given position
    Superstring {
        /// Black stones, comma separated (e.g. D4,E5)
        #[arg(short, long, value_delimiter = ',')]
        black: Vec<String>,

        /// White stones, comma separated
        #[arg(short, long, value_delimiter = ',')]
        white: Vec<String>,

        /// Stone whose superstring is built
        #[arg(long)]
        at: String,

        #[arg(short, long, value_enum, default_value_t = Mode::Full)]
        mode: Mode,

        /// Leave the seed string's own stones, liberties and chains out
        #[arg(long)]
        proper: bool,

        /// Liberty cap (0 means no limit)
        #[arg(long, default_value_t = 0)]
        cap: usize,

        /// Skill level for the tactical reader used by full mode
        #[arg(short, long, default_value_t = DEFAULT_LEVEL, allow_negative_numbers = true)]
        level: i32,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum Mode {
    Full,
    Conservative,
    Chain,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    match cli.command {
        Some(Commands::Levels { level, set }) => run_levels(&level, &set),
        Some(Commands::Superstring {
            black,
            white,
            at,
            mode,
            proper,
            cap,
            level,
        }) => run_superstring(&black, &white, &at, mode, proper, cap, level),
        None => run_levels(&[], &[]),
    }
}

fn run_levels(levels: &[i32], set: &[Assignment]) -> Result<()> {
    let mut overrides = Overrides::new();
    for &assignment in set {
        overrides.apply(assignment);
    }
    for (param, value) in overrides.iter() {
        log::info!("override {param} = {value}");
    }

    let levels = if levels.is_empty() { &[DEFAULT_LEVEL][..] } else { levels };
    let mut budget = DepthBudget::with_overrides(levels[0], overrides);
    for &level in levels {
        budget.recompute(level, false);
        println!("{}", budget.params().report(level));
    }
    Ok(())
}

fn run_superstring(
    black: &[String],
    white: &[String],
    at: &str,
    mode: Mode,
    proper: bool,
    cap: usize,
    level: i32,
) -> Result<()> {
    let black: Vec<&str> = black.iter().map(String::as_str).collect();
    let white: Vec<&str> = white.iter().map(String::as_str).collect();
    let pos = Position::with_stones(&black, &white).context("invalid stone list")?;
    let seed = parse_coord(at).with_context(|| format!("invalid seed point '{at}'"))?;
    if !pos.color[seed].is_stone() {
        bail!("no stone at {at}");
    }

    let connection = match mode {
        Mode::Full => Connection::Full,
        Mode::Conservative => Connection::Conservative,
        Mode::Chain => Connection::ChainAdjacency,
    };
    let query = Query {
        connection,
        proper,
        liberty_cap: cap,
        stones: true,
        liberties: connection != Connection::ChainAdjacency,
        chains: true,
    };

    let budget = DepthBudget::new(level);
    let mut reader = Reader::new(budget.params());
    let mut builder = SuperstringBuilder::new();
    let result = match connection {
        Connection::Full => builder.build(&pos, seed, &query, Some(&mut reader)),
        _ => builder.build(&pos, seed, &query, None),
    };
    log::debug!("reading nodes: {}", reader.nodes());

    println!("{pos}");
    println!("stones:    {}", format_points(&result.stones));
    println!("liberties: {}", format_points(&result.liberties));
    println!("chains:    {}", format_points(&result.chains));
    Ok(())
}

fn format_points(points: &[usize]) -> String {
    let mut names: Vec<String> = points.iter().map(|&pt| str_coord(pt)).collect();
    names.sort();
    names.join(" ")
}
