//! Trivanity CLI
//!
//! Vanity wallet address generator for Ethereum, Solana and TRON.

mod config;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use trivanity_core::difficulty::format_difficulty;
use trivanity_core::{
    calculate_difficulty, export_results, format_keys, persist_or_warn, run_benchmark,
    BenchmarkConfig, CancelToken, ChainKind, FileResultSink, FoundAction, FoundResult,
    SearchOptions, SearchOrchestrator, SearchPlan,
};

use crate::config::{load_settings, save_settings, Overrides, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "trivanity")]
#[command(author = "Trivanity Team")]
#[command(version)]
#[command(about = "Vanity wallet address generator for ETH, SOL and TRX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for vanity addresses
    Generate(GenerateArgs),

    /// List supported chains
    Chains,

    /// Measure raw key derivation speed
    Benchmark {
        /// Chain ticker or name
        #[arg(short, long, default_value = "ETH")]
        chain: ChainKind,

        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Number of threads (0 = auto)
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Chains to search, e.g. `ETH,SOL` (default: those enabled in the config file)
    #[arg(short, long, value_delimiter = ',')]
    chain: Vec<ChainKind>,

    /// Prefix for every selected chain (TRON: after the leading T)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Suffix for every selected chain
    #[arg(short, long)]
    suffix: Option<String>,

    /// Match case exactly
    #[arg(long)]
    case_sensitive: bool,

    /// Settings file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write the merged settings back to the settings file
    #[arg(long)]
    save_config: bool,

    /// Directory for per-result files
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Do not write result files
    #[arg(long)]
    no_save: bool,

    /// Matches to find per chain before retiring it (0 = unlimited)
    #[arg(short = 'n', long, default_value = "1")]
    count: u64,

    /// Milliseconds between progress updates
    #[arg(long, default_value = "500")]
    report_interval_ms: u64,

    /// Write all results of this run to one wallet_results_*.txt
    #[arg(long)]
    export: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args)?,
        Commands::Chains => cmd_chains(),
        Commands::Benchmark {
            chain,
            duration,
            threads,
            json,
        } => cmd_benchmark(chain, duration, threads, json)?,
    }

    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let overrides = Overrides {
        chains: args.chain.clone(),
        prefix: args.prefix.clone(),
        suffix: args.suffix.clone(),
        case_sensitive: args.case_sensitive,
        no_save: args.no_save,
    };
    let settings = overrides.apply(load_settings(&args.config)?);
    if args.save_config {
        save_settings(&args.config, &settings)?;
        eprintln!("Settings saved to {}", args.config.display());
    }

    let plan = SearchPlan::from_settings(&settings);
    plan.validate()?;

    // Attempts until any chain is expected to hit
    let mut rate = 0.0;
    if !args.json {
        eprintln!("Trivanity v{}", env!("CARGO_PKG_VERSION"));
        for planned in plan.chains() {
            let codec = planned.chain.codec();
            let difficulty = calculate_difficulty(
                &planned.pattern,
                codec.valid_address_chars(),
                codec.first_body_chars(),
            );
            rate += 1.0 / difficulty;
            eprintln!(
                "{:<4} prefix {:<12} suffix {:<12} difficulty {}",
                planned.chain.ticker(),
                show_pattern(&planned.pattern.prefix),
                show_pattern(&planned.pattern.suffix),
                format_difficulty(difficulty)
            );
        }
        eprintln!(
            "Case sensitive: {}  Save results: {}  Per chain: {}",
            settings.case_sensitive,
            settings.save_local,
            if args.count == 0 { "unlimited".to_string() } else { args.count.to_string() }
        );
        eprintln!("Searching... (Press Ctrl+C to stop)\n");
    }
    let difficulty = if rate > 0.0 { 1.0 / rate } else { f64::INFINITY };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install Ctrl-C handler")?;

    let sink = FileResultSink::new(&args.results_dir);
    let mut results: Vec<FoundResult> = Vec::new();
    let mut per_chain: BTreeMap<ChainKind, u64> = BTreeMap::new();

    let mut search = SearchOrchestrator::new(SearchOptions {
        report_interval_ms: args.report_interval_ms,
        ..Default::default()
    });

    let summary = search.run(
        &plan,
        cancel.clone(),
        |found| {
            let location = if settings.save_local {
                persist_or_warn(&sink, &found)
            } else {
                None
            };
            print_result(&found, location.as_deref(), args.json);

            let n = per_chain.entry(found.chain).or_default();
            *n += 1;
            let done = args.count > 0 && *n >= args.count;
            results.push(found);

            if done {
                FoundAction::RetireChain
            } else {
                FoundAction::KeepSearching
            }
        },
        |progress| {
            if !args.json {
                eprint!("\r{}", progress.format(difficulty));
            }
        },
    )?;

    if !args.json {
        eprintln!();
        if cancel.is_cancelled() {
            eprintln!("Stopped by user.");
        }
        eprintln!("\n--- Final Statistics ---");
        eprintln!("Total keys generated: {}", format_keys(summary.attempts));
        for (chain, attempts) in &summary.per_chain {
            eprintln!("  {:<4} {}", chain.ticker(), format_keys(*attempts));
        }
        eprintln!("Matches found:        {}", results.len());
        eprintln!("Failed derivations:   {}", summary.failed_derivations);
        eprintln!("Time elapsed:         {:.2}s", summary.elapsed.as_secs_f64());
        eprintln!("Average speed:        {}/s", format_keys(summary.speed as u64));
    }

    if args.export && !results.is_empty() {
        let path = export_results(&PathBuf::from("."), &results)
            .context("failed to export results")?;
        eprintln!("Results exported to {}", path.display());
    }

    Ok(())
}

fn show_pattern(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn print_result(found: &FoundResult, location: Option<&str>, json: bool) {
    if json {
        let value = serde_json::json!({
            "chain": found.chain,
            "address": found.display_address(),
            "private_key": found.private_key_export(),
            "timestamp": found.timestamp,
            "saved_to": location,
        });
        println!("{value}");
        return;
    }

    eprintln!();
    println!("=== {} match ===", found.chain.name());
    println!("Address:     {}", found.display_address());
    println!("Private Key: {}", found.private_key_export());
    println!("Time:        {}", found.timestamp.format("%Y-%m-%d %H:%M:%S"));
    match location {
        Some(path) => println!("Saved to:    {path}"),
        None => println!("Not saved; copy the key above."),
    }
    println!();
}

fn cmd_chains() {
    println!("Supported Chains:");
    println!("{:-<72}", "");
    println!("{:<8} {:<10} {:<8} {:<10} {}", "Ticker", "Name", "Marker", "Matchable", "Alphabet");
    println!("{:-<72}", "");

    for kind in ChainKind::ALL {
        let codec = kind.codec();
        println!(
            "{:<8} {:<10} {:<8} {:<10} {}",
            kind.ticker(),
            kind.name(),
            codec.marker().map(String::from).unwrap_or_else(|| "-".into()),
            codec.matchable_length(),
            codec.valid_address_chars()
        );
    }
}

fn cmd_benchmark(chain: ChainKind, duration_secs: u64, threads: usize, json: bool) -> Result<()> {
    let config = BenchmarkConfig {
        chain,
        duration_ms: duration_secs.saturating_mul(1000),
        threads,
    };

    if !json {
        eprintln!("Benchmarking {} for {} seconds...", chain.name(), duration_secs);
        eprintln!("Threads: {}", config.thread_count());
        eprintln!();
    }

    let result = run_benchmark(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Keys tested: {}", format_keys(result.attempts));
        println!("Time:        {:.2}s", result.elapsed_secs);
        println!("Speed:       {}/s", format_keys(result.keys_per_second as u64));
    }

    Ok(())
}
