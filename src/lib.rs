//! xlsxconv - Pure-Rust spreadsheet converter
//!
//! This crate converts spreadsheet workbooks (XLSX, XLSM, XLSB, XLS, ODS) into four text
//! representations: Markdown tables, CSV, JSON records and self-contained HTML documents.
//! A conversion targets either one named sheet or the whole workbook, and is a pure,
//! synchronous, read-only transform: the file is opened, converted and released within a
//! single call.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsxconv::{convert_workbook, OutputFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One sheet as CSV
//!     let csv = convert_workbook("example.xlsx", Some("Sheet1"), OutputFormat::Csv)?;
//!     println!("{}", csv);
//!
//!     // The whole workbook as a single JSON object keyed by sheet name
//!     let json = convert_workbook("example.xlsx", None, OutputFormat::Json)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxconv::{ConverterBuilder, DateFormat, OutputFormat, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("Report".to_string()))
//!         .with_output_format(OutputFormat::Markdown)
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
//!         .build()?;
//!
//!     let input = File::open("example.xlsx")?;
//!     let output = File::create("output.md")?;
//!     converter.convert_to_writer(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Listing Sheets
//!
//! ```rust,no_run
//! fn main() -> Result<(), xlsxconv::ConvertError> {
//!     for name in xlsxconv::list_sheet_names("example.xlsx")? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod error;
mod formatter;
mod grid;
mod output;
mod parser;
mod security;
mod types;

use std::path::Path;

// 公開API
pub use api::{DateFormat, OutputFormat, SheetSelector};
pub use builder::{Converter, ConverterBuilder};
pub use error::ConvertError;

/// ワークブックを変換する
///
/// `target_sheet`が`None`の場合はワークブック全体を変換します。
///
/// # 戻り値
///
/// * `Ok(String)` - 変換結果（末尾の空白は除去済み）
/// * `Err(ConvertError)` - ファイルが開けない、シートが存在しない、解析に失敗した場合
pub fn convert_workbook<P: AsRef<Path>>(
    path: P,
    target_sheet: Option<&str>,
    format: OutputFormat,
) -> Result<String, ConvertError> {
    ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::from_target(target_sheet))
        .with_output_format(format)
        .build()?
        .convert_path(path)
}

/// ワークブックのシート名を格納順で取得する
pub fn list_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ConvertError> {
    ConverterBuilder::new().build()?.sheet_names_from_path(path)
}
