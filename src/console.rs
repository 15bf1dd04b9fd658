use std::io::Write;

use anyhow::{Context, Result};

use crate::analytics::AnalyticsRow;
use crate::invoice::Invoice;
use crate::time_entry::TimeEntry;

/// Consoleにレポートを表示するためのtrait。
pub trait ConsolePresenter {
    /// タイムエントリーを表示する。
    ///
    /// # Arguments
    ///
    /// * `time_entries` - 表示するタイムエントリー
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()>;

    /// analyticsレポートを表示する。
    fn show_analytics(&mut self, rows: &[AnalyticsRow]) -> Result<()>;

    /// invoiceを表示する。
    fn show_invoice(&mut self, invoice: &Invoice) -> Result<()>;
}

/// レポートをMarkdownのlist形式で表示する。
///
/// 時間と金額は表示時のみ小数2桁に丸める。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // time entryをlist形式で表示する。
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()> {
        let mut sorted_entries = time_entries.to_vec();
        sorted_entries.sort_by_key(|entry| entry.start_time);

        for entry in sorted_entries {
            let start_str = entry.start_time.format("%Y-%m-%d %H:%M").to_string();
            let end_str = entry.end_time.format("%H:%M").to_string();
            let hours = entry.duration as f64 / 3600.0;
            writeln!(
                self.writer,
                "- {} ~ {}: {:.2}h",
                start_str, end_str, hours
            )
            .with_context(|| format!("Failed to write time entry: {:?}", entry))?;
        }

        Ok(())
    }

    // analyticsの各行をlist形式で表示する。
    fn show_analytics(&mut self, rows: &[AnalyticsRow]) -> Result<()> {
        for row in rows {
            writeln!(
                self.writer,
                "- {}: {:.2}h (tasks: {}/{}, projects: {})",
                row.date, row.hours, row.completed_tasks, row.total_tasks, row.total_projects
            )
            .with_context(|| format!("Failed to write analytics row: {:?}", row))?;
        }

        Ok(())
    }

    // invoiceを見出しと明細のlist形式で表示する。
    fn show_invoice(&mut self, invoice: &Invoice) -> Result<()> {
        writeln!(
            self.writer,
            "# {} ({} ~ {})",
            invoice.project_name, invoice.start_date, invoice.end_date
        )
        .context("Failed to write invoice header")?;
        for line in &invoice.entries {
            writeln!(self.writer, "- {}: {:.2}h", line.date, line.hours)
                .with_context(|| format!("Failed to write invoice line: {:?}", line))?;
        }
        writeln!(
            self.writer,
            "total: {:.2}h * {:.2} = {:.2}",
            invoice.total_hours, invoice.hourly_rate, invoice.total_amount
        )
        .context("Failed to write invoice total")?;

        Ok(())
    }
}

/// レポートをワイヤーフォーマットのままJSONで表示する。
///
/// 値は丸めずにそのまま出力する。
pub struct ConsoleJson<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleJson<'a, W> {
    /// 新しい`ConsoleJson`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    /// シリアライズ可能な値を1行のJSONとして書き出す。
    fn write_json<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
        writeln!(self.writer, "{}", json).context("Failed to write JSON output")?;

        Ok(())
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleJson<'a, W> {
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()> {
        self.write_json(&time_entries)
    }

    fn show_analytics(&mut self, rows: &[AnalyticsRow]) -> Result<()> {
        self.write_json(&rows)
    }

    fn show_invoice(&mut self, invoice: &Invoice) -> Result<()> {
        self.write_json(invoice)
    }
}
