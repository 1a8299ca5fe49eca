//! Parser Module
//!
//! calamineを使用したワークブック解析と、セル値の型分類を提供します。

mod classify;
mod workbook;

pub(crate) use classify::classify;
pub(crate) use workbook::WorkbookParser;
