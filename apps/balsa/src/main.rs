use anyhow::{Result, bail};
use balsa_avl::{AvlTree, BalanceStrategy};
use balsa_prng::SeededRng;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use serde::Serialize;

/// Insert order for the demonstration tree. The repeated 40 and 30 are
/// deliberate; they must be ignored.
const DEMO_KEYS: [i32; 11] = [50, 30, 40, 35, 32, 40, 45, 48, 46, 30, 47];

/// The key the demonstration removes after printing the first traversal.
const DEMO_REMOVAL: i32 = 48;

#[derive(Parser, Debug)]
#[command(name = "balsa")]
#[command(about = "Build height-balanced trees and print their traversals.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert a fixed key sequence, print the tree, remove one key, print again.
    Demo {
        /// Rebalancing strategy: "composed" (default) or "fused".
        #[arg(long, default_value = "composed")]
        strategy: String,
        /// Output format: "text" (default) or "json".
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Build a tree holding every key of an inclusive range, inserted in
    /// seeded-random order.
    Random {
        /// Smallest key (inclusive).
        #[arg(long, allow_negative_numbers = true)]
        lower: i32,
        /// Largest key (inclusive).
        #[arg(long, allow_negative_numbers = true)]
        upper: i32,
        /// Shuffle seed. If omitted, BALSA_SEED is used.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "composed")]
        strategy: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

/// One stdout line of `--format json`.
#[derive(Serialize)]
struct TraversalReport<'a> {
    label: &'a str,
    strategy: BalanceStrategy,
    keys: usize,
    height: i32,
    pre_order: Vec<i32>,
    tree: &'a AvlTree<i32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Demo { strategy, format } => {
            let strategy = parse_strategy(&strategy)?;
            let format = parse_format(&format)?;

            let mut tree = AvlTree::with_strategy(strategy);
            for key in DEMO_KEYS {
                tree.insert(key);
            }
            emit("after inserts", &tree, format)?;

            tree.remove(&DEMO_REMOVAL);
            emit("after removing 48", &tree, format)?;
        }

        Command::Random { lower, upper, seed, strategy, format } => {
            let strategy = parse_strategy(&strategy)?;
            let format = parse_format(&format)?;
            if lower > upper {
                bail!("invalid range: --lower {lower} is greater than --upper {upper}");
            }

            let seed = seed
                .or_else(|| std::env::var("BALSA_SEED").ok().and_then(|raw| raw.parse().ok()))
                .unwrap_or_else(|| {
                    eprintln!("WARN: no seed provided; using seed 0. Pass --seed or set BALSA_SEED for a chosen shuffle.");
                    0
                });

            let mut rng = SeededRng::new(seed);
            let mut tree = AvlTree::with_strategy(strategy);
            for key in rng.shuffled_range(lower, upper) {
                tree.insert(key);
            }
            emit("random tree", &tree, format)?;
        }
    }

    Ok(())
}

fn parse_strategy(raw: &str) -> Result<BalanceStrategy> {
    match raw {
        "composed" => Ok(BalanceStrategy::Composed),
        "fused" => Ok(BalanceStrategy::Fused),
        other => bail!("unknown strategy {other:?}; expected \"composed\" or \"fused\""),
    }
}

fn parse_format(raw: &str) -> Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => bail!("unknown format {other:?}; expected \"text\" or \"json\""),
    }
}

fn emit(label: &str, tree: &AvlTree<i32>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_text(label, tree)),
        OutputFormat::Json => {
            let report = TraversalReport {
                label,
                strategy: tree.strategy(),
                keys: tree.len(),
                height: tree.height(),
                pre_order: tree.pre_order().into_iter().copied().collect(),
                tree,
            };
            println!("{}", serde_json::to_string(&report)?);
        }
    }
    Ok(())
}

fn render_text(label: &str, tree: &AvlTree<i32>) -> String {
    format!(
        "{label} ({} keys, height {}): {}",
        tree.len(),
        tree.height(),
        tree.pre_order().iter().join(" ")
    )
}
