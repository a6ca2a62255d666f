use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deltaver::app;
use deltaver::audit::Auditor;
use deltaver::config::{ConfigOverrides, DeltaverConfig, LOG_ENV};
use deltaver::parser::types::RequirementsFormat;

#[derive(Parser)]
#[command(name = "deltaver")]
#[command(version, about = "Report how many days pinned Python dependencies lag behind PyPI")]
struct Cli {
    /// requirements.txt (pip freeze) or poetry.lock to audit
    path: PathBuf,

    /// File format, detected from the file name when omitted
    #[arg(short, long, value_enum)]
    format: Option<RequirementsFormat>,

    /// Exit with failure when the average delta exceeds this many days
    #[arg(long)]
    fail_on_avg: Option<i64>,

    /// Exit with failure when the largest delta exceeds this many days
    #[arg(long)]
    fail_on_max: Option<i64>,

    /// Query an artifact repository instead of pypi.org
    #[arg(long)]
    artifactory_domain: Option<String>,

    /// Package to skip, may be repeated
    #[arg(long = "exclude", value_name = "PACKAGE")]
    excluded: Vec<String>,

    /// Report deltas as they stood on this date (YYYY-MM-DD)
    #[arg(long)]
    for_date: Option<NaiveDate>,

    /// Count versions newer than the registry's latest as up to date
    #[arg(long)]
    overtaking_safe: bool,

    /// JSON config file, defaults to $XDG_CONFIG_HOME/deltaver/config.json
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = DeltaverConfig::load(cli.config.as_deref())?.apply(ConfigOverrides {
        file_format: cli.format,
        fail_on_avg: cli.fail_on_avg,
        fail_on_max: cli.fail_on_max,
        artifactory_domain: cli.artifactory_domain,
        excluded: cli.excluded,
        for_date: cli.for_date,
        overtaking_safe: cli.overtaking_safe,
    });

    let auditor = Auditor::from_config(&config);
    let outcome = app::run(&config, &cli.path, &auditor).await?;
    print!("{}", outcome.report.render());

    for violation in &outcome.violations {
        eprintln!("deltaver: {}", violation);
    }

    Ok(if outcome.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
