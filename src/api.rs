//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// 日付の出力形式
///
/// 日時セルの表示文字列の形式を指定します。
/// JSON出力の日時値は常に`yyyy-MM-ddTHH:mm:ss`であり、この設定の影響を受けません。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式
    ///
    /// 時刻が0時ちょうどの場合は`2025-11-20`、それ以外は`2025-11-20 14:30:00`
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxconv::ConvertError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// シート選択方式
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// ワークブック全体を変換（デフォルト）
    ///
    /// JSONとHTMLはワークブック専用の形式、MarkdownとCSVはシートごとの連結になります。
    All,

    /// シート名指定（完全一致）
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),
}

impl SheetSelector {
    /// 省略可能なシート名から選択方式を生成
    pub fn from_target(target: Option<&str>) -> Self {
        match target {
            Some(name) => SheetSelector::Name(name.to_string()),
            None => SheetSelector::All,
        }
    }
}

/// 出力フォーマット
///
/// ホスト側で最後に使用した形式を保存できるよう、serdeで小文字名として
/// シリアライズされます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Markdown形式（デフォルト）
    ///
    /// ```markdown
    /// | Header1 | Header2 |
    /// | --- | --- |
    /// | Data1 | Data2 |
    /// ```
    Markdown,

    /// CSV形式
    ///
    /// ```csv
    /// Header1,Header2
    /// Data1,Data2
    /// ```
    Csv,

    /// JSON形式
    ///
    /// 1行目をヘッダーとして、各データ行をオブジェクトとした配列を出力します。
    ///
    /// ```json
    /// [
    ///   {
    ///     "Header1": "Data1",
    ///     "Header2": 42
    ///   }
    /// ]
    /// ```
    Json,

    /// HTML形式
    ///
    /// スタイルシートを埋め込んだ単独で表示可能なHTML文書を出力します。
    Html,
}

impl OutputFormat {
    /// すべての出力フォーマット
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Markdown,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Html,
    ];

    /// 保存ダイアログ用のファイル拡張子（ドットなし）
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    /// 形式名または拡張子から解析（大文字小文字を区別しない）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "html" | "htm" => Ok(OutputFormat::Html),
            other => Err(ConvertError::Config(format!(
                "Unknown output format: '{}'",
                other
            ))),
        }
    }
}
