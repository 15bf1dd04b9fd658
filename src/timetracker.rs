use std::{env, fs};

use chrono::{DateTime, Utc};
use log::info;
#[cfg(test)]
use mockall::automock;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};

use crate::error::Error;
use crate::project::Project;
use crate::task::Task;
use crate::time_entry::{NewTimeEntry, TimeEntry};

/// APIのURLが指定されていない場合に利用するデフォルト値。
const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// timetracker APIへのアクセスを抽象化するリポジトリ。
///
/// 集計・レポート側はこのtraitを通してのみデータへアクセスし、
/// 共有のグローバルな接続は持たない。期間の引数はいずれも
/// `[start_at, end_at)`の半開区間。
#[cfg_attr(test, automock)]
pub trait TimeTrackerRepository {
    /// 認証ユーザーのタイムエントリーを期間で絞り込んで取得する。
    async fn read_time_entries(
        &self,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, Error>;

    /// 指定プロジェクトのタイムエントリーを期間で絞り込んで取得する。
    async fn read_project_time_entries(
        &self,
        project_id: u64,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, Error>;

    /// 認証ユーザーのプロジェクトをIDで取得する。
    ///
    /// 存在しない場合や認証ユーザーの所有でない場合は`Error::NotFound`を返す。
    async fn read_project(&self, project_id: u64) -> Result<Project, Error>;

    /// 認証ユーザーのプロジェクト一覧を取得する。
    async fn read_projects(&self) -> Result<Vec<Project>, Error>;

    /// 認証ユーザーのタスク一覧を取得する。
    async fn read_tasks(&self) -> Result<Vec<Task>, Error>;

    /// タイムエントリーを新規作成する。
    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, Error>;
}

/// timetracker APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = TimeTrackerClient::from_env().unwrap();
/// let time_entries = client.read_time_entries(&start_at, &end_at).await.unwrap();
/// ```
pub struct TimeTrackerClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl TimeTrackerClient {
    /// 新しい`TimeTrackerClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `api_url` - timetracker APIのベースURL
    /// * `api_token` - Bearer認証に利用するAPIトークン
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_token: api_token.into(),
        }
    }

    /// 環境変数から設定を読み込んで`TimeTrackerClient`を返す。
    ///
    /// URLは環境変数`TIMETRACKER_API_URL`から読み込み、未設定の場合は
    /// `http://localhost:8080/api`を利用する。トークンは環境変数
    /// `TIMETRACKER_API_TOKEN`から読み込み、未設定の場合はユーザー設定
    /// ディレクトリの`ttools/token`ファイルを参照する。どちらにもない
    /// 場合はエラーを返す。
    pub fn from_env() -> Result<Self, Error> {
        let api_url =
            env::var("TIMETRACKER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_token = match env::var("TIMETRACKER_API_TOKEN") {
            Ok(token) => token,
            Err(_) => read_token_file().ok_or(Error::MissingApiToken)?,
        };

        Ok(Self::new(api_url, api_token))
    }

    /// タイムエントリーを取得し、半開区間`[start_at, end_at)`へ絞り込む。
    ///
    /// APIの期間フィルタは終端の瞬間を含むため、リポジトリの契約に
    /// 合わせて取得後に絞り直す。
    async fn fetch_time_entries(
        &self,
        query: &[(&str, String)],
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, Error> {
        let mut time_entries = self
            .client
            .get(format!("{}/time-entries", self.api_url))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<TimeEntry>>()
            .await?;
        time_entries
            .retain(|entry| *start_at <= entry.start_time && entry.start_time < *end_at);
        info!("Retrieved {} time entries.", time_entries.len());

        Ok(time_entries)
    }
}

impl TimeTrackerRepository for TimeTrackerClient {
    async fn read_time_entries(
        &self,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, Error> {
        let query = [
            ("start_time", start_at.to_rfc3339()),
            ("end_time", end_at.to_rfc3339()),
        ];

        self.fetch_time_entries(&query, start_at, end_at).await
    }

    async fn read_project_time_entries(
        &self,
        project_id: u64,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, Error> {
        let query = [
            ("project_id", project_id.to_string()),
            ("start_time", start_at.to_rfc3339()),
            ("end_time", end_at.to_rfc3339()),
        ];

        self.fetch_time_entries(&query, start_at, end_at).await
    }

    async fn read_project(&self, project_id: u64) -> Result<Project, Error> {
        let response = self
            .client
            .get(format!("{}/projects/{}", self.api_url, project_id))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: format!("project {}", project_id),
            });
        }
        let project = response.error_for_status()?.json::<Project>().await?;

        Ok(project)
    }

    async fn read_projects(&self) -> Result<Vec<Project>, Error> {
        let projects = self
            .client
            .get(format!("{}/projects", self.api_url))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Project>>()
            .await?;

        Ok(projects)
    }

    async fn read_tasks(&self) -> Result<Vec<Task>, Error> {
        let tasks = self
            .client
            .get(format!("{}/tasks", self.api_url))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Task>>()
            .await?;

        Ok(tasks)
    }

    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, Error> {
        let created = self
            .client
            .post(format!("{}/time-entries", self.api_url))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .json(entry)
            .send()
            .await?
            .error_for_status()?
            .json::<TimeEntry>()
            .await?;
        info!("Created time entry with id {}.", created.id);

        Ok(created)
    }
}

/// ユーザー設定ディレクトリのトークンファイルを読み込む。
fn read_token_file() -> Option<String> {
    let path = dirs::config_dir()?.join("ttools").join("token");
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
