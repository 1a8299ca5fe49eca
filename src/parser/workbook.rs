//! Workbook Loader
//!
//! calamineを使用したワークブック読み込みの実装。
//! XLSX/XLSM/XLSB/XLS/ODSの形式を自動判別し、シートを`Sheet`として取り出します。

use std::io::{Read, Seek};

use calamine::{open_workbook_auto_from_rs, Reader, Sheets};

use crate::api::SheetSelector;
use crate::error::ConvertError;
use crate::parser::classify;
use crate::types::{CellCoord, Sheet};

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// 1回の変換呼び出しの間だけ存在し、ドロップ時にリーダーを解放します。
pub(crate) struct WorkbookParser<R: Read + Seek + Clone> {
    workbook: Sheets<R>,
}

impl<R: Read + Seek + Clone> WorkbookParser<R> {
    /// ワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(ConvertError::Parse)` - スプレッドシートとして解析できない場合
    pub fn open(reader: R) -> Result<Self, ConvertError> {
        let workbook = open_workbook_auto_from_rs(reader)?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を格納順で取得
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト（格納順）
    /// * `Err(ConvertError::InvalidFormat)` - 指定名のシートが存在しない場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>, ConvertError> {
        let all_sheet_names = self.get_sheet_names();

        match selector {
            SheetSelector::All => Ok(all_sheet_names),

            SheetSelector::Name(name) => {
                if !all_sheet_names.iter().any(|sheet| sheet == name) {
                    return Err(ConvertError::InvalidFormat(name.clone()));
                }
                Ok(vec![name.clone()])
            }
        }
    }

    /// シートを読み込み、各セルを分類して`Sheet`を構築
    ///
    /// calamineの範囲は左上が(0, 0)とは限らないため、範囲の開始位置を加算して
    /// 1始まりの絶対座標に変換します。
    pub fn load_sheet(&mut self, sheet_name: &str) -> Result<Sheet, ConvertError> {
        let range = self.workbook.worksheet_range(sheet_name)?;

        let mut sheet = Sheet::new(sheet_name);
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        for (row_idx, col_idx, cell) in range.used_cells() {
            let coord = CellCoord::new(
                start_row + row_idx as u32 + 1,
                start_col + col_idx as u32 + 1,
            );
            let value = classify(cell);
            log::trace!("{}!{} = {:?}", sheet_name, coord.to_a1_notation(), value);
            sheet.insert(coord, value);
        }

        log::debug!(
            "loaded sheet '{}' ({} non-empty cells)",
            sheet_name,
            sheet.cells().count()
        );

        Ok(sheet)
    }

    /// 選択されたシートを格納順にすべて読み込む
    pub fn load_sheets(&mut self, selector: &SheetSelector) -> Result<Vec<Sheet>, ConvertError> {
        let names = self.select_sheets(selector)?;
        names.iter().map(|name| self.load_sheet(name)).collect()
    }
}

// calamineで読めるワークブックが必要なため、テストは統合テスト（tests/）で実装します。
