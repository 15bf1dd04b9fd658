use serde::{Deserialize, Serialize};

/// timetracker APIが保持するプロジェクト。
///
/// `hourly_rate`は1時間あたりの請求単価で、非負の通貨値。
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub description: String,
    pub hourly_rate: f64,
}
