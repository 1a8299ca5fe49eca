//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`は変換のオーケストレーターであり、1回の呼び出しごとに
//! ワークブックを開き、範囲を決定し、エンコードして、ハンドルを解放します。

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use crate::api::{DateFormat, OutputFormat, SheetSelector};
use crate::error::ConvertError;
use crate::formatter::{validate_date_format, CellFormatter};
use crate::output::OutputFormatter;
use crate::parser::WorkbookParser;
use crate::security::SecurityConfig;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 出力フォーマット
    pub output_format: OutputFormat,

    /// 日付形式（表示文字列用）
    pub date_format: DateFormat,

    /// セキュリティ設定
    pub security: SecurityConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            output_format: OutputFormat::Markdown,
            date_format: DateFormat::Iso8601,
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxconv::{ConverterBuilder, OutputFormat, SheetSelector};
///
/// # fn main() -> Result<(), xlsxconv::ConvertError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Name("Sheet1".to_string()))
///     .with_output_format(OutputFormat::Json)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: ワークブック全体
    /// - 出力フォーマット: Markdown
    /// - 日付形式: ISO 8601
    /// - 入力サイズ上限: 2GB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 変換対象のシートを選択する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, SheetSelector};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name("Sheet1".to_string()));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 出力フォーマットを指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, OutputFormat};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_output_format(OutputFormat::Csv);
    /// ```
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 日時セルの表示文字列の形式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `ConvertError::Config(String)`: 設定の検証に失敗した場合
    ///   * カスタム日付形式が空、または不正な書式指定子を含む
    ///   * 入力サイズ上限が0
    pub fn build(self) -> Result<Converter, ConvertError> {
        // 1. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            validate_date_format(format_str)?;
        }

        // 2. 入力サイズ上限の検証
        if self.config.security.max_input_file_size == 0 {
            return Err(ConvertError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// 状態を持たないサービスオブジェクトです。各呼び出しは独立しており、
/// 複数スレッドから異なるファイルを同時に変換できます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxconv::{ConverterBuilder, OutputFormat};
///
/// # fn main() -> Result<(), xlsxconv::ConvertError> {
/// let converter = ConverterBuilder::new()
///     .with_output_format(OutputFormat::Html)
///     .build()?;
/// let html = converter.convert_path("example.xlsx")?;
/// println!("{}", html);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            config,
        }
    }

    /// ファイルパスからワークブックを変換
    ///
    /// ファイルハンドルはこの呼び出しの中だけで保持され、成功・失敗どちらの
    /// 場合も戻る前に解放されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 変換結果（末尾の空白は除去済み）
    /// * `Err(ConvertError::NotFound)` - ファイルが存在しない、または開けない場合
    /// * `Err(ConvertError::InvalidFormat)` - 指定シートが存在しない場合
    /// * `Err(ConvertError::Parse)` - スプレッドシートとして解析できない場合
    pub fn convert_path<P: AsRef<Path>>(&self, path: P) -> Result<String, ConvertError> {
        let file = open_file(path.as_ref())?;
        self.convert(file)
    }

    /// リーダーからワークブックを変換
    ///
    /// # 処理フロー
    ///
    /// 1. 入力をサイズ制限付きでメモリに読み込む
    /// 2. ワークブックを開く
    /// 3. 範囲の決定（単一シート / ワークブック全体）
    /// 4. エンコード
    /// 5. 末尾の空白を除去
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use xlsxconv::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxconv::ConvertError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let excel_data: Vec<u8> = vec![]; // Excelファイルのバイト列
    /// let markdown = converter.convert(Cursor::new(excel_data))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read>(&self, input: R) -> Result<String, ConvertError> {
        // 1. 入力データをメモリに読み込む
        let buffer = self.config.security.read_limited(input)?;

        // 2. ワークブックを開く
        let mut parser = WorkbookParser::open(Cursor::new(buffer))?;

        // 3-4. 範囲の決定とエンコード
        let formatter = OutputFormatter::from_format(self.config.output_format);
        let output = match &self.config.sheet_selector {
            SheetSelector::Name(name) => {
                log::debug!(
                    "converting sheet '{}' to {}",
                    name,
                    self.config.output_format
                );
                parser.select_sheets(&self.config.sheet_selector)?;
                let sheet = parser.load_sheet(name)?;
                formatter.render_sheet(&sheet, &self.formatter)?
            }
            SheetSelector::All => {
                let sheets = parser.load_sheets(&SheetSelector::All)?;
                log::debug!(
                    "converting whole workbook ({} sheets) to {}",
                    sheets.len(),
                    self.config.output_format
                );
                formatter.render_workbook(&sheets, &self.formatter)?
            }
        };

        log::trace!("conversion produced {} bytes", output.len());

        // 5. 末尾の空白を除去
        Ok(output.trim_end().to_string())
    }

    /// 変換結果をライターに書き込む
    ///
    /// 変換がすべて成功した場合にのみ書き込みを行います（部分的な出力はありません）。
    pub fn convert_to_writer<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<(), ConvertError> {
        let document = self.convert(input)?;
        output.write_all(document.as_bytes())?;
        output.flush()?;
        Ok(())
    }

    /// リーダーからシート名を格納順で取得
    pub fn sheet_names<R: Read>(&self, input: R) -> Result<Vec<String>, ConvertError> {
        let buffer = self.config.security.read_limited(input)?;
        let parser = WorkbookParser::open(Cursor::new(buffer))?;
        Ok(parser.get_sheet_names())
    }

    /// ファイルパスからシート名を格納順で取得
    pub fn sheet_names_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<String>, ConvertError> {
        let file = open_file(path.as_ref())?;
        self.sheet_names(file)
    }
}

/// ファイルを開く（失敗は`NotFound`として報告）
///
/// ディレクトリは`File::open`が成功してしまう環境があるため、ここで拒否します。
fn open_file(path: &Path) -> Result<File, ConvertError> {
    let not_found = |source| ConvertError::NotFound {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(not_found)?;
    if file.metadata().map_err(not_found)?.is_dir() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path is a directory, not a workbook file",
        )));
    }

    Ok(file)
}
