use serde::{Deserialize, Serialize};

/// 完了済みタスクとして集計されるstatusの値。
///
/// statusは自由記述の文字列だが、completed task数のカウントでは
/// この値との完全一致のみを完了として扱う。
pub const COMPLETED_STATUS: &str = "COMPLETED";

/// timetracker APIが保持するタスク。
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: u64,
    pub user_id: u64,
    pub project_id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub tags: Vec<String>,
}

impl Task {
    /// タスクが完了済みかどうかを返す。
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }
}
