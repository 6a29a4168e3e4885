use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ranker::api_client::{ApiClient, Session};
use ranker::config::Config;
use ranker::report::{build_posting_report, render_report};
use ranker::roster::{RosterQuery, SortKey, SortOrder};

#[derive(Parser, Debug)]
#[command(
    name = "ranker",
    about = "Rank a job posting's applicants against its evaluation rubric",
    version
)]
struct Cli {
    /// Job posting to report on
    job_id: i64,
    /// Only keep applicants whose name or email contains this text
    #[arg(long, default_value = "")]
    search: String,
    /// Column to sort the roster by
    #[arg(long, value_enum, default_value_t = SortArg::Score)]
    sort: SortArg,
    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
    /// Number of score distribution buckets (overrides RANKER_BUCKETS)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    buckets: Option<u32>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    AppliedAt,
    Status,
    Score,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => SortKey::Name,
            SortArg::AppliedAt => SortKey::AppliedAt,
            SortArg::Status => SortKey::Status,
            SortArg::Score => SortKey::Score,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ranker v{}", env!("CARGO_PKG_VERSION"));

    let client = ApiClient::new(&config.api_url, Session::new()).on_unauthorized(|status| {
        warn!("Backend rejected the session ({status}); credentials must be refreshed");
    });
    let user = client
        .login(&config.email, &config.password)
        .await
        .with_context(|| format!("Login to {} failed", config.api_url))?;
    info!("Logged in as {} {}", user.first_name, user.last_name);

    let query = RosterQuery {
        search: cli.search,
        sort_by: cli.sort.into(),
        order: if cli.asc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        },
    };
    let bucket_count = cli.buckets.map_or(config.bucket_count, |b| b as usize);

    let report = build_posting_report(&client, cli.job_id, &query, bucket_count)
        .await
        .with_context(|| format!("Failed to build report for posting {}", cli.job_id))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report, &mut std::io::stdout().lock())?;
    }

    client.logout();
    Ok(())
}
