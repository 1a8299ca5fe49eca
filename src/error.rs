//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// xlsxconvクレート全体で使用するエラー型
///
/// 変換処理は「全部成功」か「全部失敗」のどちらかであり、部分的な出力は返しません。
/// 空のシートはエラーではなく、各フォーマットの番兵出力として扱われます。
///
/// # エラーの種類
///
/// - `NotFound`: ワークブックファイルが存在しない、または開けない
/// - `InvalidFormat`: 指定されたシート名がワークブックに存在しない
/// - `Parse`: ファイルが正しいスプレッドシートではない（calamine由来）
/// - `Io` / `Json`: 読み込み後のI/Oエラー、JSONシリアライズエラー
/// - `Config`: ビルダー設定の検証に失敗した
/// - `SecurityViolation`: 入力サイズ制限に違反した
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxconv::{convert_workbook, ConvertError, OutputFormat};
///
/// match convert_workbook("book.xlsx", Some("Sheet99"), OutputFormat::Csv) {
///     Err(ConvertError::InvalidFormat(name)) => eprintln!("no such sheet: {}", name),
///     Err(e) => eprintln!("{}", e),
///     Ok(csv) => println!("{}", csv),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    /// ワークブックファイルが存在しない、または開けない（権限、ロックなど）
    #[error("Workbook not found or cannot be opened: {}: {source}", path.display())]
    NotFound {
        /// 開こうとしたパス
        path: PathBuf,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// 指定されたシートがワークブックに存在しない
    ///
    /// フォールバックのシートは選択されません。値は要求されたシート名です。
    #[error("Sheet '{0}' does not exist in the workbook")]
    InvalidFormat(String),

    /// スプレッドシートの解析中に発生したエラー
    ///
    /// 破損したファイルやスプレッドシートでないファイルの場合に発生します。
    /// `#[from]`属性により、`calamine::Error`から自動的に変換されます。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// I/O操作中に発生したエラー
    ///
    /// ファイルを開いた後の読み込み、出力先への書き込みなどで発生します。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSONのシリアライズエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, ConvertError, DateFormat};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("".to_string()))
    ///     .build();
    ///
    /// match result {
    ///     Err(ConvertError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルが設定された最大サイズを超えた場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
