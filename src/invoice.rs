use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{aggregate, day_key};
use crate::project::Project;
use crate::time_entry::TimeEntry;

/// invoiceレスポンス。
///
/// フィールド名はtimetracker APIのワイヤーフォーマット(camelCase)に
/// 合わせている。金額は丸めずに保持し、丸めは表示側で行う。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub project_name: String,
    pub start_date: String,
    pub end_date: String,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_amount: f64,
    pub entries: Vec<InvoiceLine>,
}

/// invoice内の日毎の明細行。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub date: String,
    pub hours: f64,
}

/// プロジェクトとタイムエントリーからinvoiceを組み立てる。
///
/// エントリーは対象プロジェクト・認証ユーザー・請求期間での絞り込みが
/// 呼び出し側で済んでいること。期間は終了日を1日進めた半開区間
/// `[start_date, end_date + 1日)`で絞り込む。
///
/// エントリーをカレンダー日付ごとにまとめて明細行とし、合計時間と
/// `合計時間 × hourly_rate`の請求額を計算する。
///
/// # Arguments
///
/// * `project` - 請求対象のプロジェクト
/// * `time_entries` - 絞り込み済みのタイムエントリー
/// * `start_date` - 請求期間の開始日
/// * `end_date` - 請求期間の終了日(その日全体を含む)
pub fn build_invoice(
    project: &Project,
    time_entries: &[TimeEntry],
    start_date: &DateTime<Utc>,
    end_date: &DateTime<Utc>,
) -> Invoice {
    let buckets = aggregate(time_entries, day_key);
    let total_hours: f64 = buckets.values().sum();

    let mut entries = buckets
        .into_iter()
        .map(|(date, hours)| InvoiceLine { date, hours })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| a.date.cmp(&b.date));

    Invoice {
        project_name: project.name.clone(),
        start_date: start_date.format("%Y-%m-%d").to_string(),
        end_date: end_date.format("%Y-%m-%d").to_string(),
        total_hours,
        hourly_rate: project.hourly_rate,
        total_amount: total_hours * project.hourly_rate,
        entries,
    }
}
