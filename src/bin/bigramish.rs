//! Reads text from a file, builds a bigram table, optionally overrides some of its
//! distributions, and prints generated text.
//!
//! Using `cargo run`: `cargo run -- input.txt -n 50 -s ROMEO: --override ROMEO:=Juliet:1.0`

use std::path::PathBuf;

use anyhow::{Context, Result};
use bigramish::token::{split_whitespace, split_word_bounds};
use bigramish::{GenerateOptions, TransitionCounts, TransitionTable};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bigramish")]
#[command(version)]
#[command(about = "Generate text from a bigram model, with optional probability overrides")]
struct Cli {
    /// Text file to learn from
    file: PathBuf,

    /// Number of tokens to generate
    #[arg(short = 'n', long, default_value = "100")]
    length: usize,

    /// Token to start from
    #[arg(short, long)]
    seed: Option<String>,

    /// Seed for the random source, for reproducible output
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Replace a distribution, as `PRED=SUCC:WEIGHT,SUCC:WEIGHT`. May be repeated
    #[arg(long = "override", value_parser = parse_override)]
    overrides: Vec<Override>,

    /// Split on word bounds instead of whitespace
    #[arg(long)]
    word_bounds: bool,

    /// How many successors of the seed to show before and after overriding
    #[arg(long, default_value = "5")]
    top: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct Override {
    predecessor: String,
    weights: Vec<(String, f64)>,
}

fn parse_override(s: &str) -> Result<Override, String> {
    let (predecessor, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PRED=SUCC:WEIGHT,..., got {s:?}"))?;
    let weights = rest
        .split(',')
        .map(|pair| {
            let (succ, w) = pair
                .rsplit_once(':')
                .ok_or_else(|| format!("expected SUCC:WEIGHT, got {pair:?}"))?;
            let w = w
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("bad weight in {pair:?}: {e}"))?;
            Ok((succ.trim().to_string(), w))
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(Override {
        predecessor: predecessor.to_string(),
        weights,
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn show_successors(table: &TransitionTable, predecessor: &str, n: usize) {
    match table.query(predecessor) {
        Some(dist) => {
            for (token, weight) in dist.most_likely(n) {
                println!(
                    "  {predecessor} -> {token}: {weight:.4} ({:.2}%)",
                    dist.probability(token) * 100.0
                );
            }
        }
        None => println!("  {predecessor} has no distribution"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("could not read {}", cli.file.display()))?;
    let tokens = if cli.word_bounds {
        split_word_bounds(&text)
    } else {
        split_whitespace(&text)
    };
    info!(tokens = tokens.len(), "tokenized input");

    let counts = TransitionCounts::from_tokens(&tokens);
    let mut table = counts.normalize().context("could not normalize counts")?;

    if let Some(seed) = &cli.seed {
        if cli.top > 0 {
            println!("Before overrides:");
            show_successors(&table, seed, cli.top);
        }
    }

    for o in &cli.overrides {
        table
            .replace(&o.predecessor, o.weights.iter().cloned())
            .with_context(|| format!("could not override {:?}", o.predecessor))?;
    }

    if let Some(seed) = &cli.seed {
        if cli.top > 0 && !cli.overrides.is_empty() {
            println!("After overrides:");
            show_successors(&table, seed, cli.top);
        }
    }

    let opts = GenerateOptions {
        length: cli.length,
        seed: cli.seed.clone(),
        rng_seed: cli.rng_seed,
    };
    let generated = table
        .generate_with_options(&tokens, &opts)
        .context("failed to generate text")?;
    let sep = if cli.word_bounds { "" } else { " " };
    let generated: Vec<&str> = generated.into_iter().map(String::as_str).collect();
    println!("{}", generated.join(sep));

    Ok(())
}
