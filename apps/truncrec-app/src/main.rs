//! truncrec command-line interface.
//!
//! Provides three modes of operation:
//! - `sample`: draw one truncated batch and print the samples or a summary
//! - `depth`: run a repair-depth survey and print the log2(N) fit
//! - `info`: print crate versions and the effective configuration

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use truncrec_core::prelude::*;
use truncrec_sampler::prelude::*;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Vectorized lower-truncated normal sampler.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML sampler configuration (strategy, depth_margin, seed).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured repair strategy.
    #[arg(long, global = true)]
    strategy: Option<StrategyArg>,

    /// Log verbosity: -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw one batch of truncated normal samples.
    Sample {
        /// Batch size.
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Mean shared by every element.
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        mean: f64,

        /// Standard deviation.
        #[arg(short, long, default_value_t = 1.0)]
        sigma: f64,

        /// Lower bound; `-inf` disables truncation.
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        lower: f64,

        /// Random seed (overrides the configured seed).
        #[arg(long)]
        seed: Option<u64>,

        /// Draw from the stream of this independent chain instead of the
        /// root stream.
        #[arg(long)]
        chain: Option<u32>,

        /// Print summary statistics instead of every sample.
        #[arg(long)]
        summary: bool,
    },

    /// Measure repair depth against batch size.
    Depth {
        /// Batch sizes to survey.
        #[arg(long, value_delimiter = ',', default_values_t = [10, 100, 1000, 10_000])]
        sizes: Vec<usize>,

        /// Calls per batch size.
        #[arg(short, long, default_value_t = 100)]
        trials: u32,

        /// Distance of every mean above the lower bound.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset: f64,

        /// Random seed (overrides the configured seed).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print crate information.
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Iterative,
    Recursive,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Iterative => Self::Iterative,
            StrategyArg::Recursive => Self::Recursive,
        }
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_sample(
    config: &SamplerConfig,
    count: usize,
    mean: f64,
    sigma: f64,
    lower: f64,
    chain: Option<u32>,
    summary: bool,
) -> Result<(), TruncError> {
    let sampler = TruncatedNormalSampler::new(config.clone());
    let means = vec![mean; count];
    let seeds = SeedHierarchy::new(config.seed);
    let mut rng = chain.map_or_else(|| seeds.root_rng(), |c| seeds.chain_rng(c));
    let (samples, report) =
        sampler.sample_with_report(&mut RngNormals::new(&mut rng), &means, sigma, lower)?;

    if !summary {
        for x in &samples {
            println!("{x}");
        }
        return Ok(());
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    #[allow(clippy::cast_precision_loss)]
    let avg = samples.iter().sum::<f64>() / samples.len().max(1) as f64;
    println!("n={count}, mean={mean}, sigma={sigma}, lower={lower}");
    println!("min={min:.6}, mean={avg:.6}, max={max:.6}");
    println!(
        "depth={}, draws={}, acceptance={}",
        report.depth,
        report.draws,
        report
            .acceptance_rate()
            .map_or_else(|| "n/a".to_string(), |r| format!("{r:.4}"))
    );
    Ok(())
}

fn run_depth(
    config: &SamplerConfig,
    sizes: Vec<usize>,
    trials: u32,
    offset: f64,
) -> Result<(), TruncError> {
    let sampler = TruncatedNormalSampler::new(config.clone());
    let survey = DepthSurvey {
        sizes,
        trials,
        mean_offset: offset,
        seed: SeedHierarchy::new(config.seed).named_seed("depth_survey"),
        ..DepthSurvey::default()
    };
    tracing::info!(sizes = ?survey.sizes, trials, offset, "running depth survey");
    let stats = survey.run(&sampler)?;

    println!("{:>10} {:>8} {:>10} {:>6}", "n", "log2(n)", "mean", "max");
    for s in &stats {
        println!(
            "{:>10} {:>8.3} {:>10.3} {:>6}",
            s.n,
            s.log2_n(),
            s.mean_depth().unwrap_or(f64::NAN),
            s.max_depth().unwrap_or(0)
        );
    }
    match fit_log2(&stats) {
        Some(fit) => println!(
            "\nfit: depth = {:.3} * log2(n) + {:.3}",
            fit.slope, fit.intercept
        ),
        None => println!("\nfit: need at least two distinct sizes"),
    }
    Ok(())
}

fn run_info(config: &SamplerConfig) {
    println!("truncrec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  truncrec-core    {}", env!("CARGO_PKG_VERSION"));
    println!("  truncrec-sampler {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("config:");
    println!("  strategy     {:?}", config.strategy);
    println!("  depth_margin {}", config.depth_margin);
    println!("  seed         {}", config.seed);
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<SamplerConfig, TruncError> {
    let mut config = match &cli.config {
        Some(path) => SamplerConfig::from_file(path)?,
        None => SamplerConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.into();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), TruncError> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Sample {
            count,
            mean,
            sigma,
            lower,
            seed,
            chain,
            summary,
        }) => {
            config.seed = seed.unwrap_or(config.seed);
            run_sample(&config, count, mean, sigma, lower, chain, summary)
        }
        Some(Commands::Depth {
            sizes,
            trials,
            offset,
            seed,
        }) => {
            config.seed = seed.unwrap_or(config.seed);
            run_depth(&config, sizes, trials, offset)
        }
        Some(Commands::Info) => {
            run_info(&config);
            Ok(())
        }
        None => run_sample(&config, 10, 0.0, 1.0, 0.0, None, false),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "truncrec failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
