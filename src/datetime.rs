use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Error;

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// `YYYY-MM-DD`形式の日付をUTCの00:00:00としてパースする。
///
/// パースできない場合は、取得処理を始める前に入力不正のエラーを返す。
///
/// # Arguments
///
/// * `s` - パースする日付文字列
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, Error> {
    let naive_date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: s.to_string(),
    })?;
    let naive_datetime = naive_date.and_hms_opt(0, 0, 0).ok_or(Error::InvalidDate {
        input: s.to_string(),
    })?;

    Ok(DateTime::from_naive_utc_and_offset(naive_datetime, Utc))
}

/// RFC 3339形式の日時をパースする。
///
/// # Arguments
///
/// * `s` - パースする日時文字列
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|datetime| datetime.to_utc())
        .map_err(|_| Error::InvalidDate {
            input: s.to_string(),
        })
}

/// テスト時に利用するモック時間を取得する。
#[cfg(test)]
pub mod mock_datetime {
    use std::cell::RefCell;

    use super::DateTime;
    use super::Utc;

    thread_local! {
        static MOCK_TIME: RefCell<Option<DateTime<Utc>>> = RefCell::new(None);
    }

    /// モック時間を取得する。
    pub fn now() -> DateTime<Utc> {
        MOCK_TIME.with(|cell| cell.borrow().as_ref().cloned().unwrap_or_else(Utc::now))
    }

    /// モック時間を設定する。
    pub fn set_mock_time(time: DateTime<Utc>) {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = Some(time));
    }

    // 設定したモック時間をクリアする。
    pub fn clear_mock_time() {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = None);
    }
}

#[cfg(test)]
pub use mock_datetime::now;
