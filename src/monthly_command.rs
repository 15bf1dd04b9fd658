use anyhow::{Context, Result};
use chrono::Months;
use log::info;

use crate::aggregate::{aggregate, month_key};
use crate::analytics::{build_analytics_report, ActivityCounts, AnalyticsRow};
use crate::datetime;
use crate::timetracker::TimeTrackerRepository;

/// 直近1ヶ月のanalyticsレポートを生成するコマンド。
///
/// バケットキーは月の短縮名のみで、年をまたいだ同じ月は
/// 同一バケットにまとまる。
pub struct MonthlyCommand<'a, T: TimeTrackerRepository> {
    client: &'a T,
}

impl<'a, T: TimeTrackerRepository> MonthlyCommand<'a, T> {
    /// 新しい`MonthlyCommand`を返す。
    ///
    /// # Arguments
    /// * `client` - timetracker APIと通信するためのリポジトリ
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// `monthly`サブコマンドの処理を行う。
    ///
    /// 現在時刻から1ヶ月遡った期間のタイムエントリーを取得し、
    /// 月ごとに集計したレポートを返す。
    pub async fn run(&self) -> Result<Vec<AnalyticsRow>> {
        let end_at = datetime::now();
        let start_at = end_at
            .checked_sub_months(Months::new(1))
            .context("Failed to subtract a month")?;
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

        let buckets = aggregate(&time_entries, month_key);
        let counts = ActivityCounts::collect(&tasks, &projects);

        Ok(build_analytics_report(&buckets, &counts))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Months, TimeZone, Utc};

    use super::MonthlyCommand;
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

    /// 直近1ヶ月の期間でエントリーが取得され、月ごとに集計されることを確認する。
    #[tokio::test]
    async fn test_monthly_command() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        mock_datetime::set_mock_time(now);
        let mut client = MockTimeTrackerRepository::new();
        client
            .expect_read_time_entries()
            .withf(move |start_at, end_at| {
                *start_at == now.checked_sub_months(Months::new(1)).unwrap() && *end_at == now
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    entry("2024-01-20T10:00:00Z", 3600),
                    entry("2024-02-01T10:00:00Z", 7200),
                ])
            });
        client.expect_read_tasks().times(1).returning(|| Ok(vec![]));
        client
            .expect_read_projects()
            .times(1)
            .returning(|| Ok(vec![]));

        let command = MonthlyCommand::new(&client);
        let rows = command.run().await.unwrap();

        assert_eq!(rows.len(), 2);
        let jan = rows.iter().find(|row| row.date == "Jan").unwrap();
        let feb = rows.iter().find(|row| row.date == "Feb").unwrap();
        assert_eq!(jan.hours, 1.0);
        assert_eq!(feb.hours, 2.0);

        mock_datetime::clear_mock_time();
    }
}
