use std::collections::HashMap;

use crate::time_entry::TimeEntry;

/// タイムエントリーをバケットキーごとの合計時間(hour)に集計する。
///
/// 各エントリーの`duration / 3600.0`を`key_fn(entry)`のキーへ加算する。
/// 空の入力は空のマップを返す。加算は可換なので入力の順序は結果に影響
/// しないが、返されるマップのキー順には意味がない。
///
/// durationが0以下のエントリーもそのまま加算する。値の検証は
/// 書き込み境界(`NewTimeEntry`)の責務で、ここでは行わない。
///
/// # Arguments
///
/// * `time_entries` - 集計対象のタイムエントリー。ユーザーと期間での絞り込みは呼び出し側で済んでいること
/// * `key_fn` - エントリーからバケットキーを導出する関数
pub fn aggregate<F>(time_entries: &[TimeEntry], key_fn: F) -> HashMap<String, f64>
where
    F: Fn(&TimeEntry) -> String,
{
    time_entries.iter().fold(HashMap::new(), |mut buckets, entry| {
        *buckets.entry(key_fn(entry)).or_insert(0.0) += entry.duration as f64 / 3600.0;
        buckets
    })
}

/// 開始日時のカレンダー日付(`YYYY-MM-DD`)をキーとして返す。
pub fn day_key(entry: &TimeEntry) -> String {
    entry.start_time.format("%Y-%m-%d").to_string()
}

/// 開始日時の曜日の短縮名(`Mon`など)をキーとして返す。
///
/// 曜日名のみをキーにするため、1週間を超える期間では別の週の同じ曜日が
/// 同一バケットにまとまる。これはAPI互換のために維持している挙動。
pub fn weekday_key(entry: &TimeEntry) -> String {
    entry.start_time.format("%a").to_string()
}

/// 開始日時の月の短縮名(`Jan`など)をキーとして返す。
///
/// 月名のみをキーにするため、年をまたぐ期間では別の年の同じ月が
/// 同一バケットにまとまる。これはAPI互換のために維持している挙動。
pub fn month_key(entry: &TimeEntry) -> String {
    entry.start_time.format("%b").to_string()
}

/// 開始日時の西暦4桁(`2024`など)をキーとして返す。
pub fn year_key(entry: &TimeEntry) -> String {
    entry.start_time.format("%Y").to_string()
}
