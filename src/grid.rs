//! Grid Module
//!
//! スパースなセルデータからシートの使用範囲（Used Range）を求めるモジュール。
//! 変換呼び出しごとに再計算され、キャッシュはしません。

use crate::types::{Sheet, UsedRange};

/// シートの使用範囲を計算
///
/// 空でないすべてのセルについて、最大の行インデックスと最大の列インデックスを求めます。
/// 範囲は常に (1, 1) を起点とする矩形です。
///
/// # 戻り値
///
/// * `Some(UsedRange)` - 空でないセルが1つ以上ある場合
/// * `None` - 空でないセルが存在しない場合
pub(crate) fn resolve_used_range(sheet: &Sheet) -> Option<UsedRange> {
    sheet
        .cells()
        .filter(|(_, value)| !value.is_empty())
        .fold(None, |acc: Option<UsedRange>, (coord, _)| {
            Some(match acc {
                Some(range) => UsedRange::new(
                    range.last_row.max(coord.row),
                    range.last_col.max(coord.col),
                ),
                None => UsedRange::new(coord.row, coord.col),
            })
        })
}
