mod catalog;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use conjecturing::{
    config::CliOverrides,
    summary::{self, Labels},
    Direction, EngineConfig, FindExtremal, Operation, SearchDriver, SearchReport, SearchResult,
    SearchStrategy,
};
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use catalog::{Candidates, ConditionKind, GeneratorKind, WeightKind};

/// Number of checks in the stock demonstration run
const DEMO_CHECKS: u64 = 100_001;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (YAML), applied after the global and local ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins if set
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SearchArgs {
    /// Number of candidates to check
    #[arg(short = 'n', long = "checks")]
    checks: u64,

    /// Candidate source
    #[arg(short, long, value_enum, default_value = "naturals")]
    generator: GeneratorKind,

    /// Length of the `range` generator (defaults to the number of checks)
    #[arg(long)]
    limit: Option<u64>,

    /// Conjecture to check
    #[arg(short, long, value_enum)]
    condition: ConditionKind,

    /// Draw a progress bar on stderr
    #[arg(long)]
    progress: bool,

    /// Number of progress batches
    #[arg(long)]
    granularity: Option<usize>,

    /// Use at most one batch per check
    #[arg(long)]
    adaptive: bool,

    /// Print the report as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Suppress the heading and result lines
    #[arg(short, long)]
    quiet: bool,
}

impl SearchArgs {
    fn candidates(&self) -> Candidates {
        self.generator.candidates(self.checks, self.limit)
    }

    fn overrides(&self, log_level: Option<String>) -> CliOverrides {
        CliOverrides {
            granularity: self.granularity,
            adaptive_granularity: self.adaptive,
            show_progress: self.progress,
            quiet: self.quiet || self.json,
            log_level,
        }
    }
}

#[derive(Args)]
struct ExtremalArgs {
    #[command(flatten)]
    search: SearchArgs,

    /// Weight used to rank counterexamples
    #[arg(short, long, value_enum, default_value = "identity")]
    weight: WeightKind,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the first counterexample
    First(Box<SearchArgs>),

    /// Count every counterexample
    Count(Box<SearchArgs>),

    /// Report the counterexample with the smallest weight
    Min(Box<ExtremalArgs>),

    /// Report the counterexample with the greatest weight
    Max(Box<ExtremalArgs>),

    /// Check a slow, always-true condition over a finite range with a progress bar
    Demo {
        /// Number of candidates to check
        #[arg(short = 'n', long = "checks", default_value_t = DEMO_CHECKS)]
        checks: u64,
    },

    /// Print the effective configuration as YAML
    Config,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let file_config = EngineConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::First(args) => {
            let config = resolve(file_config, args.overrides(cli.log_level))?;
            let driver = SearchDriver::from_config(&config)?;
            let labels = Labels::new(args.generator.name(), args.condition.name());
            let condition = args.condition;

            let report = with_summary(&config, Operation::FindFirst, args.checks, &labels, || {
                driver.find_first(args.checks, |x: &u64| condition.holds(x), args.candidates())
            })?;
            emit_json(args.json, &report)
        }
        Commands::Count(args) => {
            let config = resolve(file_config, args.overrides(cli.log_level))?;
            let driver = SearchDriver::from_config(&config)?;
            let labels = Labels::new(args.generator.name(), args.condition.name());
            let condition = args.condition;

            let report = with_summary(&config, Operation::CountAll, args.checks, &labels, || {
                driver.count_all(args.checks, |x: &u64| condition.holds(x), args.candidates())
            })?;
            emit_json(args.json, &report)
        }
        Commands::Min(args) => run_extremal(file_config, &args, cli.log_level, Direction::Min),
        Commands::Max(args) => run_extremal(file_config, &args, cli.log_level, Direction::Max),
        Commands::Demo { checks } => {
            let config = resolve(
                file_config,
                CliOverrides {
                    show_progress: true,
                    log_level: cli.log_level,
                    ..Default::default()
                },
            )?;
            let driver = SearchDriver::from_config(&config)?;
            let generator = GeneratorKind::Range;
            let condition = ConditionKind::Sleep;
            let labels = Labels::new(generator.name(), condition.name());

            with_summary(&config, Operation::FindFirst, checks, &labels, || {
                driver.find_first(
                    checks,
                    |x: &u64| condition.holds(x),
                    generator.candidates(checks, None),
                )
            })?;
            Ok(())
        }
        Commands::Config => {
            let config = resolve(
                file_config,
                CliOverrides {
                    log_level: cli.log_level,
                    ..Default::default()
                },
            )?;
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn run_extremal(
    file_config: EngineConfig,
    args: &ExtremalArgs,
    log_level: Option<String>,
    direction: Direction,
) -> Result<()> {
    let search = &args.search;
    let config = resolve(file_config, search.overrides(log_level))?;
    let driver = SearchDriver::from_config(&config)?;
    let labels =
        Labels::new(search.generator.name(), search.condition.name()).with_weight(args.weight.name());

    let (condition, weight) = (search.condition, args.weight);
    let strategy = FindExtremal::<u64, _, _>::new(
        move |x: &u64| condition.holds(x),
        move |x: &u64| weight.weigh(x),
        direction,
    );
    let operation = strategy.operation();

    let report = with_summary(&config, operation, search.checks, &labels, || {
        driver.run(search.checks, strategy, search.candidates())
    })?;
    emit_json(search.json, &report)
}

/// Applies CLI overrides, starts logging and checks the result
fn resolve(file_config: EngineConfig, overrides: CliOverrides) -> Result<EngineConfig> {
    let config = file_config.merge_with_cli(overrides);
    init_tracing(&config.log_level);
    config.validate()?;
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs `search`, framing it with the heading and result lines when enabled
fn with_summary<T, W>(
    config: &EngineConfig,
    operation: Operation,
    checks: u64,
    labels: &Labels,
    search: impl FnOnce() -> SearchResult<SearchReport<T, W>>,
) -> Result<SearchReport<T, W>>
where
    T: Display,
    W: Debug,
{
    if config.show_summary {
        let mut stdout = io::stdout().lock();
        summary::write_heading(&mut stdout, operation, checks, labels)?;
        stdout.flush()?;
    }

    let report = search()?;

    if config.show_summary {
        let mut stdout = io::stdout().lock();
        summary::write_result(&mut stdout, &report)?;
    }
    Ok(report)
}

fn emit_json<T: Serialize, W: Serialize>(json: bool, report: &SearchReport<T, W>) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    }
    Ok(())
}
