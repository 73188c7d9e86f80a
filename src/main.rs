//! bt64 - CLI Entry Point
//!
//! Commands:
//! - `bt64 encode <n>` - Show the balanced ternary form of an integer
//! - `bt64 show <word|n>` - Inspect a trit string or an integer
//! - `bt64 add|sub <a> <b>` - Word arithmetic
//! - `bt64 div <n> <k>` - Divide by 2^k (exact or floor)
//! - `bt64 mod <n> <k>` - Reduce modulo 2^k or 2^k - 1
//! - `bt64 table` - Print the encodings of the first few naturals
//! - `bt64 check` - Run the built-in self-check

use std::path::PathBuf;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use bt64::{CheckConfig, Divider, Limits, Word64};
use bt64::ternary::{add, encode, encode_signed, encode_wide, subtract};

#[derive(Parser)]
#[command(name = "bt64")]
#[command(version = "0.1.0")]
#[command(about = "Fixed-width balanced ternary arithmetic over 64-trit words")]
struct Cli {
    /// Maximum correction rounds for the division family
    #[arg(long, global = true)]
    max_rounds: Option<u32>,
    /// JSON file with division limits, e.g. {"max_rounds": 64}
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an integer and show its trits
    Encode {
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },
    /// Inspect a trit string such as "+0-" or "0tPON", or an integer
    Show {
        #[arg(allow_hyphen_values = true)]
        word: String,
    },
    /// Add two integers in balanced ternary
    Add {
        #[arg(allow_hyphen_values = true)]
        a: i64,
        #[arg(allow_hyphen_values = true)]
        b: i64,
    },
    /// Subtract two integers in balanced ternary
    Sub {
        #[arg(allow_hyphen_values = true)]
        a: i64,
        #[arg(allow_hyphen_values = true)]
        b: i64,
    },
    /// Divide by 2^k
    Div {
        #[arg(allow_hyphen_values = true)]
        value: i64,
        k: u32,
        /// Floor division with remainder instead of exact division
        #[arg(short, long)]
        floor: bool,
    },
    /// Reduce modulo 2^k (or 2^k - 1 with --mersenne)
    Mod {
        #[arg(allow_hyphen_values = true)]
        value: i64,
        k: u32,
        /// Reduce modulo 2^k - 1 (experimental)
        #[arg(short, long)]
        mersenne: bool,
    },
    /// Print the encodings of 0..count
    Table {
        #[arg(short, long, default_value = "50")]
        count: u64,
    },
    /// Run the built-in self-check
    Check {
        /// Number of inputs per identity
        #[arg(
            short,
            long,
            default_value = "10000",
            value_parser = clap::value_parser!(u64).range(0..=CheckConfig::MAX_RANGE)
        )]
        range: u64,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let limits = load_limits(cli.config.as_deref(), cli.max_rounds)?;
    let divider = Divider::new(limits);

    match cli.command {
        Some(Commands::Encode { value }) => {
            show_word("value", encode_signed(value));
        }
        Some(Commands::Show { word }) => {
            show_word("value", parse_word(&word)?);
        }
        Some(Commands::Add { a, b }) => {
            let sum = add(encode_signed(a), encode_signed(b))?;
            println!("{} + {} = {}", a, b, sum.to_i128());
            show_word("sum", sum);
        }
        Some(Commands::Sub { a, b }) => {
            let diff = subtract(encode_signed(a), encode_signed(b))?;
            println!("{} - {} = {}", a, b, diff.to_i128());
            show_word("difference", diff);
        }
        Some(Commands::Div { value, k, floor }) => {
            let t = encode_signed(value);
            if floor {
                let (q, r) = divider
                    .floor(t, k)
                    .with_context(|| format!("floor division of {} by 2^{}", value, k))?;
                println!("{} = 2^{} × {} + {}", value, k, q.to_i128(), r.to_i128());
                show_word("quotient", q);
            } else {
                let q = divider
                    .exact(t, k)
                    .with_context(|| format!("exact division of {} by 2^{}", value, k))?;
                println!("{} / 2^{} = {}", value, k, q.to_i128());
                show_word("quotient", q);
            }
        }
        Some(Commands::Mod { value, k, mersenne }) => {
            let t = encode_signed(value);
            if mersenne {
                let r = divider
                    .mersenne(t, k)
                    .with_context(|| format!("reducing {} modulo 2^{} - 1", value, k))?;
                println!("{} mod (2^{} - 1) = {}", value, k, r.to_i128());
                show_word("remainder", r);
            } else {
                let (_, r) = divider
                    .floor(t, k)
                    .with_context(|| format!("reducing {} modulo 2^{}", value, k))?;
                println!("{} mod 2^{} = {}", value, k, r.to_i128());
                show_word("remainder", r);
            }
        }
        Some(Commands::Table { count }) => {
            print_table(count);
        }
        Some(Commands::Check { range, json }) => {
            run_self_check(CheckConfig { range, limits }, json)?;
        }
        None => {
            println!("bt64 v0.1.0");
            println!("Fixed-width balanced ternary arithmetic");
            println!();
            println!("Use --help for available commands");
            println!();
            print_table(50);
        }
    }

    Ok(())
}

/// Limits from the optional JSON file, with `--max-rounds` taking precedence.
fn load_limits(path: Option<&std::path::Path>, max_rounds: Option<u32>) -> anyhow::Result<Limits> {
    let mut limits = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Limits::default(),
    };
    if let Some(rounds) = max_rounds {
        limits.max_rounds = rounds;
    }
    Ok(limits)
}

/// A decimal integer anywhere in the window, else a trit string.
///
/// Input without a digit 1-9 is always read as trits, so `+0` is 3.
fn parse_word(input: &str) -> anyhow::Result<Word64> {
    let decimal = input.contains(|c: char| matches!(c, '1'..='9'));
    if let (true, Ok(n)) = (decimal, input.trim().parse::<i128>()) {
        let magnitude = encode_wide(n.unsigned_abs())
            .with_context(|| format!("{} does not fit in 64 trits", n))?;
        return Ok(if n < 0 { -magnitude } else { magnitude });
    }
    Word64::parse(input).with_context(|| format!("parsing trit string {:?}", input))
}

fn show_word(label: &str, word: Word64) {
    println!("{:>10}: {:#}", label, word);
    println!("{:>10}  {:?}", "", word);
}

fn print_table(count: u64) {
    for n in 0..count {
        println!("n = {:2}: {:#}", n, encode(n));
    }
}

fn run_self_check(config: CheckConfig, json: bool) -> anyhow::Result<()> {
    let report = bt64::run_self_check(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("━━━ bt64 Self-Check (n < {}) ━━━", config.range);
        println!();
        for outcome in &report.checks {
            if outcome.passed() {
                println!("{:.<32} ✓ ({} cases)", outcome.name, outcome.cases);
            } else {
                println!(
                    "{:.<32} ✗ ({} of {} failed; first: {})",
                    outcome.name,
                    outcome.failures,
                    outcome.cases,
                    outcome.first_failure.as_deref().unwrap_or("-")
                );
            }
        }
        println!();
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "Results: {} passed, {} failed",
            report.checks.len() - report.failed_checks(),
            report.failed_checks()
        );
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
