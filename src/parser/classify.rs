//! Cell Type Classifier
//!
//! calamineのセル値を`CellValue`へ一度だけ分類する。
//! 判定順序: 論理値 → 数値 → 日時 → 文字列 → 空。

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};

use crate::types::CellValue;

/// calamineのセル値を分類する
///
/// エラー値（`#DIV/0!`など）や期間値は表示文字列を持つ文字列として扱います。
/// `[h]:mm`などの経過時間書式のセルは`36:00:00`形式の文字列になります。
/// 日時として解釈できないシリアル値は数値にフォールバックします。
pub(crate) fn classify(cell: &Data) -> CellValue {
    match cell {
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Text(format_elapsed(dt.as_f64())),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => {
                log::warn!(
                    "date/time serial {} is out of range, keeping it as a number",
                    dt.as_f64()
                );
                CellValue::Number(dt.as_f64())
            }
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// 日数のシリアル値を`時:分:秒`の経過時間に変換（時間は24を超えても繰り上げない）
fn format_elapsed(days: f64) -> String {
    let total_seconds = (days.abs() * 86_400.0).round() as u64;
    let sign = if days < 0.0 && total_seconds > 0 { "-" } else { "" };
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total_seconds / 3600,
        total_seconds / 60 % 60,
        total_seconds % 60
    )
}

/// ISO 8601形式の日時・日付文字列を解析（ODSの日付セル）
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let raw = s.trim().trim_end_matches('Z');
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            raw.parse::<NaiveDate>()
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
