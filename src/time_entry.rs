use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// timetracker APIが保持するタイムエントリー。
///
/// `duration`は秒単位で、APIが書き込み時に`end_time - start_time`として
/// 再計算した値を保持する。
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimeEntry {
    pub id: u64,
    pub user_id: u64,
    pub project_id: u64,
    pub task_id: Option<u64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i64,
}

/// タイムエントリーを新規作成するための入力値。
///
/// 更新用の値とは型を分け、クライアントから渡されたフィールドが
/// そのまま既存レコードを上書きしないようにしている。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTimeEntry {
    pub project_id: u64,
    pub task_id: Option<u64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i64,
}

impl NewTimeEntry {
    /// 新しい`NewTimeEntry`を返す。
    ///
    /// `duration`は入力を信頼せず、常に`end_time - start_time`の秒数として
    /// 計算する。終了日時が開始日時より前の場合はエラーを返す。
    ///
    /// # Arguments
    ///
    /// * `project_id` - エントリーが属するプロジェクトのID
    /// * `task_id` - エントリーが属するタスクのID
    /// * `start_time` - 開始日時
    /// * `end_time` - 終了日時
    pub fn new(
        project_id: u64,
        task_id: Option<u64>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, Error> {
        if end_time < start_time {
            return Err(Error::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }

        Ok(Self {
            project_id,
            task_id,
            start_time,
            end_time,
            duration: end_time.timestamp() - start_time.timestamp(),
        })
    }
}
