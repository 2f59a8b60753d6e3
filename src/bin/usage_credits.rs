use clap::Parser;
use colored::{ColoredString, Colorize};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

// Import from organized modules
use usage_credits::error::UsageError;
use usage_credits::formatting::{fit_width, format_credits, format_report_name, format_timestamp};
use usage_credits::{Config, DailyCredits, Result, SortSpec, UsageCalculator, UsageRecord, UsageReport, sort_usage};

const REPORT_NAME_WIDTH: usize = 32;

/// Per-message credit usage for the current billing period
#[derive(Debug, Parser)]
#[command(name = "usage-credits", version)]
struct Cli {
    /// Message listing URL (overrides USAGE_MESSAGES_URL)
    #[arg(long)]
    messages_url: Option<String>,

    /// Report store base URL (overrides USAGE_REPORTS_URL)
    #[arg(long)]
    reports_url: Option<String>,

    /// Sort keys, e.g. "reportName:asc,creditsUsed:desc"
    #[arg(long)]
    sort: Option<SortSpec>,

    /// Print the {"usage": [...]} JSON body instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "usage_credits=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "usage computation failed");
            eprintln!("{} {}", "❌".red(), error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Scoring runs on rayon; size the pool to the machine
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .thread_name(|i| format!("usage-worker-{}", i))
        .build_global()
        .map_err(UsageError::ThreadPoolInit)?;

    let mut config = Config::from_env()?;
    if let Some(url) = cli.messages_url {
        config.messages_url = url;
    }
    if let Some(url) = cli.reports_url {
        config.reports_url = url;
    }

    let calculator = UsageCalculator::from_config(&config)?;
    let mut usage = calculator.compute_usage().await?;

    if let Some(spec) = &cli.sort {
        sort_usage(&mut usage, spec);
    }

    if cli.json {
        let body = serde_json::to_string_pretty(&UsageReport::new(usage)).map_err(|source| {
            UsageError::Validation {
                context: "usage output".to_string(),
                source,
            }
        })?;
        println!("{body}");
    } else {
        print_table(&usage);
    }

    Ok(())
}

fn print_table(usage: &[UsageRecord]) {
    println!(
        "{:>10}  {:<16}  {:<width$}  {:>10}",
        "Message".bold(),
        "Timestamp".bold(),
        "Report".bold(),
        "Credits".bold(),
        width = REPORT_NAME_WIDTH
    );

    for record in usage {
        println!(
            "{:>10}  {:<16}  {}  {:>10}",
            record.message_id,
            format_timestamp(&record.timestamp),
            report_cell(record),
            format_credits(record.credits_used).green()
        );
    }

    let daily = DailyCredits::from_records(usage);
    if daily.is_empty() {
        return;
    }

    println!();
    println!("{}", "Credits per day".bold());
    for (date, credits) in daily.iter() {
        println!("  {}  {:>10}", date.format("%d-%m-%Y"), format_credits(*credits));
    }
    println!(
        "  {:<10}  {:>10}",
        "Total".bold(),
        format_credits(daily.total()).yellow().bold()
    );
}

#[inline]
fn report_cell(record: &UsageRecord) -> ColoredString {
    let name = fit_width(
        format_report_name(record.report_name.as_deref()),
        REPORT_NAME_WIDTH,
    );
    if record.is_report() {
        name.cyan()
    } else {
        name.dimmed()
    }
}

fn error_chain(e: &UsageError) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}
