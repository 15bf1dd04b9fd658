use anyhow::{Context, Result};
use chrono::Duration;
use log::info;

use crate::aggregate::{aggregate, day_key};
use crate::analytics::{build_analytics_report, ActivityCounts, AnalyticsRow};
use crate::datetime;
use crate::timetracker::TimeTrackerRepository;

/// 直近1日のanalyticsレポートを生成するコマンド。
pub struct DailyCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> DailyCommand<'a, T> {
    /// 新しい`DailyCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `daily`サブコマンドの処理を行う。
    ///
    /// 現在時刻から24時間遡った期間のタイムエントリーを取得し、
    /// カレンダー日付ごとに集計したレポートを返す。
    pub async fn run(&self) -> Result<Vec<AnalyticsRow>> {
        let end_at = datetime::now();
        let start_at = end_at - Duration::days(1);
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

        let buckets = aggregate(&time_entries, day_key);
        let counts = ActivityCounts::collect(&tasks, &projects);

        Ok(build_analytics_report(&buckets, &counts))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::DailyCommand;
    use crate::datetime::mock_datetime;
    use crate::time_entry::TimeEntry;
    use crate::timetracker::MockTimeTrackerRepository;

    /// テスト用にタイムエントリーを作成する。
    fn entry(start: &str, duration: i64) -> TimeEntry {
        let start_time = chrono::DateTime::parse_from_rfc3339(start).unwrap().to_utc();
        TimeEntry {
            id: 0,
            user_id: 1,
            project_id: 1,
            task_id: None,
            start_time,
            end_time: start_time + Duration::seconds(duration),
            duration,
        }
    }

    /// 直近1日の期間でエントリーが取得され、日毎に集計されることを確認する。
    #[tokio::test]
    async fn test_daily_command() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        mock_datetime::set_mock_time(now);
        let mut client = MockTimeTrackerRepository::new();
        client
            .expect_read_time_entries()
            .withf(move |start_at, end_at| {
                *start_at == now - Duration::days(1) && *end_at == now
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    entry("2024-01-01T22:00:00Z", 1800),
                    entry("2024-01-02T09:00:00Z", 3600),
                ])
            });
        client.expect_read_tasks().times(1).returning(|| Ok(vec![]));
        client
            .expect_read_projects()
            .times(1)
            .returning(|| Ok(vec![]));

        let command = DailyCommand::new(&client);
        let rows = command.run().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[0].hours, 0.5);
        assert_eq!(rows[1].date, "2024-01-02");
        assert_eq!(rows[1].hours, 1.0);

        mock_datetime::clear_mock_time();
    }

    /// エントリーが無い場合は空のレポートになることを確認する。
    #[tokio::test]
    async fn test_daily_command_no_entries() {
        let mut client = MockTimeTrackerRepository::new();
        client
            .expect_read_time_entries()
            .times(1)
            .returning(|_, _| Ok(vec![]));
        client.expect_read_tasks().times(1).returning(|| Ok(vec![]));
        client
            .expect_read_projects()
            .times(1)
            .returning(|| Ok(vec![]));

        let command = DailyCommand::new(&client);
        let rows = command.run().await.unwrap();

        assert!(rows.is_empty());
    }
}
