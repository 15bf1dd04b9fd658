use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::datetime::parse_datetime;
use crate::time_entry::{NewTimeEntry, TimeEntry};
use crate::timetracker::TimeTrackerRepository;

/// `log`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct LogArgs {
    #[clap(help = "Project id the entry belongs to")]
    project_id: u64,

    #[clap(long = "task", help = "Task id the entry belongs to")]
    task_id: Option<u64>,

    #[clap(
        long = "start",
        help = "Start time in RFC 3339 format",
        parse(try_from_str = parse_datetime),
    )]
    start: DateTime<Utc>,

    #[clap(
        long = "end",
        help = "End time in RFC 3339 format",
        parse(try_from_str = parse_datetime),
    )]
    end: DateTime<Utc>,
}

/// タイムエントリーを記録するコマンド。
pub struct LogCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> LogCommand<'a, T> {
    /// 新しい`LogCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `log`サブコマンドの処理を行う。
    ///
    /// 開始・終了日時からdurationを計算した入力値を組み立てて、
    /// タイムエントリーを作成する。終了日時が開始日時より前の場合は
    /// リクエストを送らずにエラーを返す。
    ///
    /// # Arguments
    ///
    /// * `log` - `log`サブコマンドの引数
    pub async fn run(&self, log: LogArgs) -> Result<TimeEntry> {
        let new_entry = NewTimeEntry::new(log.project_id, log.task_id, log.start, log.end)
            .context("Failed to build a new time entry")?;

        let created = self
            .client
            .create_time_entry(&new_entry)
            .await
            .context("Failed to create time entry")?;
        info!("Time entry created successfully.");

        Ok(created)
    }
}
