use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::aggregate::{aggregate, day_key};
use crate::analytics::{build_analytics_report, ActivityCounts, AnalyticsRow};
use crate::datetime::parse_date;
use crate::timetracker::TimeTrackerRepository;

/// `range`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct RangeArgs {
    #[clap(
        long = "start",
        help = "Start date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    start: DateTime<Utc>,

    #[clap(
        long = "end",
        help = "End date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    end: DateTime<Utc>,
}

/// 指定期間のanalyticsレポートを生成するコマンド。
///
/// 期間は`[start, end)`の半開区間で、終了日の00:00:00より後に始まる
/// エントリーは含まれない。
pub struct RangeCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> RangeCommand<'a, T> {
    /// 新しい`RangeCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `range`サブコマンドの処理を行う。
    ///
    /// 指定期間のタイムエントリーを取得し、カレンダー日付ごとに
    /// 集計したレポートを返す。
    ///
    /// # Arguments
    ///
    /// * `range` - `range`サブコマンドの引数
    pub async fn run(&self, range: RangeArgs) -> Result<Vec<AnalyticsRow>> {
        info!("Start at: {}, End at: {}", range.start, range.end);

        let time_entries = self
            .client
            .read_time_entries(&range.start, &range.end)
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

    use super::{RangeArgs, RangeCommand};
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

    /// 指定した期間でエントリーが取得され、日毎に集計されることを確認する。
    #[tokio::test]
    async fn test_range_command() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let args = RangeArgs { start, end };
        let mut client = MockTimeTrackerRepository::new();
        client
            .expect_read_time_entries()
            .withf(move |start_at, end_at| *start_at == start && *end_at == end)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    entry("2024-01-01T10:00:00Z", 3600),
                    entry("2024-01-01T22:00:00Z", 1800),
                    entry("2024-01-02T09:00:00Z", 3600),
                ])
            });
        client.expect_read_tasks().times(1).returning(|| Ok(vec![]));
        client
            .expect_read_projects()
            .times(1)
            .returning(|| Ok(vec![]));

        let command = RangeCommand::new(&client);
        let rows = command.run(args).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[0].hours, 1.5);
        assert_eq!(rows[1].date, "2024-01-02");
        assert_eq!(rows[1].hours, 1.0);
    }
}
