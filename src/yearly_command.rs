use anyhow::{Context, Result};
use chrono::Months;
use log::info;

use crate::aggregate::{aggregate, year_key};
use crate::analytics::{build_analytics_report, ActivityCounts, AnalyticsRow};
use crate::datetime;
use crate::timetracker::TimeTrackerRepository;

/// 直近1年のanalyticsレポートを生成するコマンド。
pub struct YearlyCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> YearlyCommand<'a, T> {
    /// 新しい`YearlyCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `yearly`サブコマンドの処理を行う。
    ///
    /// 現在時刻から1年遡った期間のタイムエントリーを取得し、
    /// 西暦ごとに集計したレポートを返す。
    pub async fn run(&self) -> Result<Vec<AnalyticsRow>> {
        let end_at = datetime::now();
        let start_at = end_at
            .checked_sub_months(Months::new(12))
            .context("Failed to subtract a year")?;
        info!("Start at: {}, End at: {}", start_at, end_at);

        let time_entries = self
            .client
            .read_time_entries(&start_at, &end_at)
            .await
            .context("Failed to retrieve time entries")?;
        let tasks = self
            .client
            .read_tasks()
            .await
            .context("Failed to retrieve tasks")?;
        let projects = self
            .client
            .read_projects()
            .await
            .context("Failed to retrieve projects")?;

        let buckets = aggregate(&time_entries, year_key);
        let counts = ActivityCounts::collect(&tasks, &projects);

        Ok(build_analytics_report(&buckets, &counts))
    }
}
