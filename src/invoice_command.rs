use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::datetime::parse_date;
use crate::invoice::{build_invoice, Invoice};
use crate::timetracker::TimeTrackerRepository;

/// `invoice`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct InvoiceArgs {
    #[clap(help = "Project id to invoice")]
    project_id: u64,

    #[clap(
        long = "start",
        help = "Start date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    start: DateTime<Utc>,

    #[clap(
        long = "end",
        help = "End date in the format YYYY-MM-DD (the whole day is included)",
        parse(try_from_str = parse_date),
    )]
    end: DateTime<Utc>,
}

/// プロジェクトの請求期間のinvoiceを生成するコマンド。
pub struct InvoiceCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> InvoiceCommand<'a, T> {
    /// 新しい`InvoiceCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `invoice`サブコマンドの処理を行う。
    ///
    /// プロジェクトの存在確認を行なってから、請求期間のタイムエントリーを
    /// 取得してinvoiceを組み立てる。プロジェクトが見つからない場合は
    /// エントリーの取得を行わない。
    ///
    /// 終了日は1日進めた半開区間`[start, end + 1日)`として扱い、
    /// 終了日全体を請求対象に含める。
    ///
    /// # Arguments
    ///
    /// * `invoice` - `invoice`サブコマンドの引数
    pub async fn run(&self, invoice: InvoiceArgs) -> Result<Invoice> {
        let project = self
            .client
            .read_project(invoice.project_id)
            .await
            .with_context(|| format!("Failed to retrieve project {}", invoice.project_id))?;

        let end_at = invoice.end + Duration::days(1);
        info!("Start at: {}, End at: {}", invoice.start, end_at);
        let time_entries = self
            .client
            .read_project_time_entries(invoice.project_id, &invoice.start, &end_at)
            .await
            .context("Failed to retrieve time entries")?;

        Ok(build_invoice(
            &project,
            &time_entries,
            &invoice.start,
            &invoice.end,
        ))
    }
}
