//! ナビゲーションシステム
//!
//! スティック入力による選択キーの移動先を決める純粋関数群。
//! キーは登録順に並んだ位置のスライスとして受け取り、結果はそのインデックスで返す。

use crate::grid::GridPosition;

/// 移動先がどの段階の探索で見つかったか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// 折り返し後の位置にちょうどキーがあった
    Exact,
    /// 同じ行の先頭（登録順）のキー
    Row,
    /// 同じ列の先頭（登録順）のキー
    Column,
}

/// 移動先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTarget {
    /// キースライス内のインデックス
    pub index: usize,
    /// 探索に使った折り返し後の位置
    pub wrapped: GridPosition,
    pub tier: MatchTier,
}

/// 初回選択のキー（原点にあるもの）
pub fn origin_index(keys: &[GridPosition]) -> Option<usize> {
    keys.iter().position(|&pos| pos == GridPosition::ORIGIN)
}

/// `row` 行の列方向の上限（最大列番号 + 1、`i32::MAX` で飽和）
pub fn row_bound(keys: &[GridPosition], row: i32) -> i32 {
    keys.iter()
        .filter(|pos| pos.row == row)
        .map(|pos| pos.column)
        .fold(0, i32::max)
        .saturating_add(1)
}

/// `column` 列の行方向の上限（最大行番号 + 1、`i32::MAX` で飽和）
pub fn column_bound(keys: &[GridPosition], column: i32) -> i32 {
    keys.iter()
        .filter(|pos| pos.column == column)
        .map(|pos| pos.row)
        .fold(0, i32::max)
        .saturating_add(1)
}

/// 各軸を独立に折り返す
///
/// 負方向へはみ出すと上限値そのもの（最後のキーの一つ先）へ移る。
/// 行の上限判定も `max_x` と比較し、`max_y` は負方向の折り返し先にだけ使う。
pub fn wrap_target(target: GridPosition, max_x: i32, max_y: i32) -> GridPosition {
    let column = if target.column < 0 {
        max_x
    } else if target.column >= max_x {
        0
    } else {
        target.column
    };

    let row = if target.row < 0 {
        max_y
    } else if target.row >= max_x {
        0
    } else {
        target.row
    };

    GridPosition::new(column, row)
}

/// `current` から `delta` だけ移動した先のキーを探す
///
/// 完全一致 → 同じ行 → 同じ列 の順に探し、各段階では登録順で最初のキーを採る。
/// どれも無ければ `None`（選択は変えない）。
pub fn next_index(
    keys: &[GridPosition],
    current: GridPosition,
    delta: GridPosition,
) -> Option<NavigationTarget> {
    let target = current + delta;
    let max_x = row_bound(keys, current.row);
    let max_y = column_bound(keys, current.column);
    let wrapped = wrap_target(target, max_x, max_y);

    let found = |tier: MatchTier, index: usize| NavigationTarget {
        index,
        wrapped,
        tier,
    };

    if let Some(index) = keys.iter().position(|&pos| pos == wrapped) {
        return Some(found(MatchTier::Exact, index));
    }

    if let Some(index) = keys.iter().position(|pos| pos.row == wrapped.row) {
        return Some(found(MatchTier::Row, index));
    }

    keys.iter()
        .position(|pos| pos.column == wrapped.column)
        .map(|index| found(MatchTier::Column, index))
}
