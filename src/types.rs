//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// セルの値を表す列挙型
///
/// 読み込み時に一度だけ分類され、各エンコーダーはこの値を再解釈しません。
/// バリアントがそのままセルの型（数値・論理値・日時・文字列・空）を表します。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（整数セルもf64として保持）
    Number(f64),

    /// 論理値
    Boolean(bool),

    /// 日時（タイムゾーンなし）
    DateTime(NaiveDateTime),

    /// 文字列（エラー値や期間値の表示文字列を含む）
    Text(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空文字列のテキストも空として扱います（使用範囲の計算に影響しない）。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// セル座標（1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (1, 1) -> "A1"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_a1_notation(&self) -> String {
        let mut col = self.col.saturating_sub(1);
        let mut letters = String::new();
        loop {
            letters.insert(0, (b'A' + (col % 26) as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        format!("{}{}", letters, self.row)
    }
}

/// シートの使用範囲
///
/// (1, 1) から (last_row, last_col) までの矩形。空でないセルだけの凸包ではなく、
/// 途中の空行・空列も含みます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UsedRange {
    pub last_row: u32,
    pub last_col: u32,
}

impl UsedRange {
    pub fn new(last_row: u32, last_col: u32) -> Self {
        Self { last_row, last_col }
    }

    /// 行インデックス（1始まり、昇順）
    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.last_row
    }

    /// 列インデックス（1始まり、昇順）
    pub fn cols(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.last_col
    }
}

/// 1枚のシート
///
/// セルはスパースに保持され、存在しない座標は空セルとして読み出されます。
/// 変換呼び出しの間は不変です。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sheet {
    /// シート名（ワークブック内で一意）
    pub name: String,

    /// 空でないセル（座標順）
    cells: BTreeMap<CellCoord, CellValue>,
}

impl Sheet {
    /// 空のシートを生成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// セルを配置する（空の値は保持しない）
    pub fn insert(&mut self, coord: CellCoord, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, value);
        }
    }

    /// 指定座標のセル値を取得（1始まり）
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        self.cells
            .get(&CellCoord::new(row, col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 空でないセルを座標順に列挙
    pub fn cells(&self) -> impl Iterator<Item = (&CellCoord, &CellValue)> {
        self.cells.iter()
    }

    /// テスト用: 行ごとの値からシートを組み立てる
    #[cfg(test)]
    pub fn from_rows(name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Sheet::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                sheet.insert(CellCoord::new(r as u32 + 1, c as u32 + 1), value);
            }
        }
        sheet
    }
}

#[cfg(test)]
pub(crate) fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}
