use anyhow::{Context, Result};
use chrono::Duration;
use log::info;

use crate::aggregate::{aggregate, weekday_key};
use crate::analytics::{build_analytics_report, ActivityCounts, AnalyticsRow};
use crate::datetime;
use crate::timetracker::TimeTrackerRepository;

/// 直近7日のanalyticsレポートを生成するコマンド。
///
/// バケットキーは曜日の短縮名のみで、週をまたいだ同じ曜日は
/// 同一バケットにまとまる。
pub struct WeeklyCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> WeeklyCommand<'a, T> {
    /// 新しい`WeeklyCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `weekly`サブコマンドの処理を行う。
    ///
    /// 現在時刻から7日遡った期間のタイムエントリーを取得し、
    /// 曜日ごとに集計したレポートを返す。
    pub async fn run(&self) -> Result<Vec<AnalyticsRow>> {
        let end_at = datetime::now();
        let start_at = end_at - Duration::days(7);
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

        let buckets = aggregate(&time_entries, weekday_key);
        let counts = ActivityCounts::collect(&tasks, &projects);

        Ok(build_analytics_report(&buckets, &counts))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::WeeklyCommand;
    use crate::datetime::mock_datetime;
    use crate::project::Project;
    use crate::task::Task;
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

    /// 直近7日の期間でエントリーが取得され、曜日ごとに集計されることを確認する。
    #[tokio::test]
    async fn test_weekly_command() {
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap();
        mock_datetime::set_mock_time(now);
        let mut client = MockTimeTrackerRepository::new();
        client
            .expect_read_time_entries()
            .withf(move |start_at, end_at| {
                *start_at == now - Duration::days(7) && *end_at == now
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    entry("2024-01-02T10:00:00Z", 3600), // Tue
                    entry("2024-01-03T10:00:00Z", 1800), // Wed
                    entry("2024-01-03T14:00:00Z", 1800), // Wed
                ])
            });
        client.expect_read_tasks().times(1).returning(|| {
            Ok(vec![Task {
                id: 1,
                user_id: 1,
                project_id: 1,
                title: "task".to_string(),
                description: "".to_string(),
                status: "COMPLETED".to_string(),
                tags: vec![],
            }])
        });
        client.expect_read_projects().times(1).returning(|| {
            Ok(vec![Project {
                id: 1,
                user_id: 1,
                name: "project".to_string(),
                description: "".to_string(),
                hourly_rate: 50.0,
            }])
        });

        let command = WeeklyCommand::new(&client);
        let rows = command.run().await.unwrap();

        assert_eq!(rows.len(), 2);
        let tue = rows.iter().find(|row| row.date == "Tue").unwrap();
        let wed = rows.iter().find(|row| row.date == "Wed").unwrap();
        assert_eq!(tue.hours, 1.0);
        assert_eq!(wed.hours, 1.0);
        assert_eq!(tue.total_tasks, 1);
        assert_eq!(tue.completed_tasks, 1);
        assert_eq!(tue.total_projects, 1);

        mock_datetime::clear_mock_time();
    }
}
