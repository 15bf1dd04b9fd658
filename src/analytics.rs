use std::collections::HashMap;

use serde::Serialize;

use crate::project::Project;
use crate::task::Task;

/// analyticsレスポンスの1行。
///
/// フィールド名はtimetracker APIのワイヤーフォーマット(camelCase)に
/// 合わせている。タスク・プロジェクトのカウントはバケットごとではなく
/// ユーザー全体の値で、全行に同じ値が入る。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRow {
    pub date: String,
    pub hours: f64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_projects: usize,
}

/// ユーザー全体のタスク・プロジェクト数。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityCounts {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_projects: usize,
}

impl ActivityCounts {
    /// タスク・プロジェクトの一覧からカウントを集計する。
    ///
    /// completed_tasksはstatusが`COMPLETED`に完全一致するタスクのみを数える。
    pub fn collect(tasks: &[Task], projects: &[Project]) -> Self {
        Self {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|task| task.is_completed()).count(),
            total_projects: projects.len(),
        }
    }
}

/// バケットごとの集計結果からanalyticsレスポンスを組み立てる。
///
/// バケットキーごとに1行を作り、各行に同じカウントを繰り返し入れる。
/// 出力が実行ごとに揺れないようにバケットキーでソートするが、行の順序に
/// 意味はない。
///
/// # Arguments
///
/// * `buckets` - バケットキーごとの合計時間
/// * `counts` - 呼び出し側で取得したユーザー全体のカウント
pub fn build_analytics_report(
    buckets: &HashMap<String, f64>,
    counts: &ActivityCounts,
) -> Vec<AnalyticsRow> {
    let mut rows = buckets
        .iter()
        .map(|(date, hours)| AnalyticsRow {
            date: date.clone(),
            hours: *hours,
            total_tasks: counts.total_tasks,
            completed_tasks: counts.completed_tasks,
            total_projects: counts.total_projects,
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.date.cmp(&b.date));

    rows
}
