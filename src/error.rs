use chrono::{DateTime, Utc};
use thiserror::Error;

/// timetracker APIに関わる処理で発生するエラー。
///
/// 呼び出し側が入力不正・対象なし・API障害を区別できるように分類している。
/// いずれの場合もリトライは行わず、そのコマンドの失敗として呼び出し側へ返す。
#[derive(Debug, Error)]
pub enum Error {
    /// 日付・日時文字列がパースできなかった。
    #[error("invalid date: {input}")]
    InvalidDate { input: String },

    /// 終了日時が開始日時より前になっている。
    #[error("invalid time range: end {end} is before start {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// 要求されたリソースが存在しないか、認証ユーザーの所有ではない。
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// APIトークンが環境変数にもトークンファイルにも見つからなかった。
    #[error("TIMETRACKER_API_TOKEN is not set and no token file was found")]
    MissingApiToken,

    /// timetracker APIへのリクエストが失敗した。
    #[error("failed to call the timetracker API")]
    Api(#[from] reqwest::Error),
}
