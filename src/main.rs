use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod aggregate;
mod analytics;
mod console;
mod daily_command;
mod datetime;
mod error;
mod invoice;
mod invoice_command;
mod log_command;
mod monthly_command;
mod project;
mod range_command;
mod task;
mod time_entry;
mod timetracker;
mod weekly_command;
mod yearly_command;

use console::{ConsoleJson, ConsoleMarkdownList, ConsolePresenter};
use daily_command::DailyCommand;
use invoice_command::{InvoiceArgs, InvoiceCommand};
use log_command::{LogArgs, LogCommand};
use monthly_command::MonthlyCommand;
use range_command::{RangeArgs, RangeCommand};
use timetracker::TimeTrackerClient;
use weekly_command::WeeklyCommand;
use yearly_command::YearlyCommand;

/// timetracker APIからanalyticsレポートとinvoiceを生成するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- daily
/// $ cargo run -- invoice 42 --start 2024-01-01 --end 2024-01-31
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(long = "json", help = "Print the output as JSON", global = true)]
    json: bool,

    #[clap(
        short = 'v',
        long = "verbose",
        help = "Enable debug logging",
        global = true
    )]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Show hours per calendar day for the trailing day
    Daily,
    /// Show hours per weekday for the trailing 7 days
    Weekly,
    /// Show hours per month for the trailing month
    Monthly,
    /// Show hours per year for the trailing year
    Yearly,
    /// Show hours per calendar day for an explicit date range
    Range(RangeArgs),
    /// Generate an invoice for a project over a billing period
    Invoice(InvoiceArgs),
    /// Record a new time entry
    Log(LogArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logger(args.verbose).context("Failed to initialize logger")?;

    let client = TimeTrackerClient::from_env().context("Failed to create timetracker client")?;
    let mut stdout = io::stdout();
    let mut presenter: Box<dyn ConsolePresenter + '_> = if args.json {
        Box::new(ConsoleJson::new(&mut stdout))
    } else {
        Box::new(ConsoleMarkdownList::new(&mut stdout))
    };

    match args.subcommand {
        SubCommands::Daily => {
            let rows = DailyCommand::new(&client).run().await?;
            presenter.show_analytics(&rows)?;
        }
        SubCommands::Weekly => {
            let rows = WeeklyCommand::new(&client).run().await?;
            presenter.show_analytics(&rows)?;
        }
        SubCommands::Monthly => {
            let rows = MonthlyCommand::new(&client).run().await?;
            presenter.show_analytics(&rows)?;
        }
        SubCommands::Yearly => {
            let rows = YearlyCommand::new(&client).run().await?;
            presenter.show_analytics(&rows)?;
        }
        SubCommands::Range(range) => {
            let rows = RangeCommand::new(&client).run(range).await?;
            presenter.show_analytics(&rows)?;
        }
        SubCommands::Invoice(invoice) => {
            let invoice = InvoiceCommand::new(&client).run(invoice).await?;
            presenter.show_invoice(&invoice)?;
        }
        SubCommands::Log(log_args) => {
            let created = LogCommand::new(&client).run(log_args).await?;
            presenter.show_time_entries(&[created])?;
        }
    }

    Ok(())
}

/// fernのロガーを初期化する。
///
/// ログはstderrへ出力し、`--verbose`でdebugレベルまで有効にする。
fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let colors = fern::colors::ColoredLevelConfig::new();
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
