//! Formatter Module
//!
//! セル値の表示文字列を生成するモジュール。
//! Markdown/CSV/HTMLはすべてのセルをこの表示文字列として扱い、
//! JSONは文字列型のフォールバックとして使用します。

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDateTime, Timelike};

use crate::api::DateFormat;
use crate::error::ConvertError;
use crate::types::CellValue;

/// セルフォーマッター
///
/// 表示文字列生成のファサードとして機能します。
#[derive(Debug, Clone)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
            number_formatter: NumberFormatter,
        }
    }

    /// セル値の表示文字列を取得
    ///
    /// 型に関わらず常に取得でき、空セルは空文字列になります。
    pub fn display_string(&self, value: &CellValue) -> String {
        match value {
            CellValue::Number(n) => self.number_formatter.format(*n),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(dt) => self.date_formatter.format(dt),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self::new(DateFormat::Iso8601)
    }
}

/// 日付フォーマッター
#[derive(Debug, Clone)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    /// 日時値をフォーマット
    ///
    /// `Custom`のフォーマット文字列は`ConverterBuilder::build()`で検証済みです。
    pub fn format(&self, value: &NaiveDateTime) -> String {
        match &self.date_format {
            DateFormat::Iso8601 => {
                if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
                    value.format("%Y-%m-%d").to_string()
                } else {
                    value.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            DateFormat::Custom(format_str) => value.format(format_str).to_string(),
        }
    }
}

/// JSON出力用の日時文字列（`yyyy-MM-ddTHH:mm:ss`、タイムゾーン・小数秒なし）
pub(crate) fn iso_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// 数値フォーマッター
///
/// 書式設定は扱わないため、最短の往復可能な10進表記を使用します。
#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            // -0.0 を "0" に正規化
            return "0".to_string();
        }
        value.to_string()
    }
}

/// カスタム日付形式の検証
///
/// chronoは不正な指定子を含むフォーマットで`to_string()`するとパニックするため、
/// 事前に`StrftimeItems`で解析して確認します。
pub(crate) fn validate_date_format(format_str: &str) -> Result<(), ConvertError> {
    if format_str.is_empty() {
        return Err(ConvertError::Config(
            "Invalid date format string: ''".to_string(),
        ));
    }

    if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
        return Err(ConvertError::Config(format!(
            "Invalid date format string: '{}'",
            format_str
        )));
    }

    Ok(())
}
