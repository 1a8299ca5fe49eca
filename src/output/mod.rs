//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::api::OutputFormat;
use crate::error::ConvertError;
use crate::formatter::CellFormatter;
use crate::grid::resolve_used_range;
use crate::types::Sheet;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（Markdown, CSV, JSON, HTML）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Markdown,
    Csv,
    Json,
    Html,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => OutputFormatter::Markdown,
            OutputFormat::Csv => OutputFormatter::Csv,
            OutputFormat::Json => OutputFormatter::Json,
            OutputFormat::Html => OutputFormatter::Html,
        }
    }

    /// 1シートを出力する
    ///
    /// 使用範囲はここで毎回計算し、各フォーマッターに渡します。
    pub(crate) fn render_sheet(
        &self,
        sheet: &Sheet,
        cells: &CellFormatter,
    ) -> Result<String, ConvertError> {
        let range = resolve_used_range(sheet);
        log::debug!("sheet '{}' used range: {:?}", sheet.name, range);

        let output = match self {
            OutputFormatter::Markdown => MarkdownFormatter.render(sheet, range, cells),
            OutputFormatter::Csv => CsvFormatter.render(sheet, range, cells),
            OutputFormatter::Json => JsonFormatter.render(sheet, range, cells)?,
            OutputFormatter::Html => HtmlFormatter.render(sheet, range, cells),
        };

        Ok(output)
    }

    /// ワークブック全体を出力する
    ///
    /// JSONとHTMLはワークブック専用の形式、MarkdownとCSVはシートごとの連結です。
    pub(crate) fn render_workbook(
        &self,
        sheets: &[Sheet],
        cells: &CellFormatter,
    ) -> Result<String, ConvertError> {
        let output = match self {
            OutputFormatter::Markdown => MarkdownFormatter.render_workbook(sheets, cells),
            OutputFormatter::Csv => CsvFormatter.render_workbook(sheets, cells),
            OutputFormatter::Json => JsonFormatter.render_workbook(sheets, cells)?,
            OutputFormatter::Html => HtmlFormatter.render_workbook(sheets, cells),
        };

        Ok(output)
    }
}
