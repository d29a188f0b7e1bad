//! グリッド座標
//!
//! キーボード上のキー位置（列・行）と、スティック入力の離散化を扱う。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// キーボード上のグリッド座標（0ベース）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    /// 列番号
    pub column: i32,
    /// 行番号
    pub row: i32,
}

impl GridPosition {
    /// 原点 (0, 0)。初回のナビゲーションで選択される位置
    pub const ORIGIN: GridPosition = GridPosition { column: 0, row: 0 };

    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// スティックの2次元入力を1ステップの移動量に変換する
    ///
    /// 両成分が `deadzone` 以内なら `None`。絶対値の大きい軸を採用し、
    /// 同値なら列方向を優先する。符号はそのまま移動方向になる。
    pub fn from_axis(x: f32, y: f32, deadzone: f32) -> Option<GridPosition> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let (ax, ay) = (x.abs(), y.abs());
        if ax <= deadzone && ay <= deadzone {
            return None;
        }

        if ax >= ay {
            Some(GridPosition::new(x.signum() as i32, 0))
        } else {
            Some(GridPosition::new(0, y.signum() as i32))
        }
    }
}

/// 加算は各成分とも `i32` の範囲で飽和する
impl Add for GridPosition {
    type Output = GridPosition;

    fn add(self, rhs: GridPosition) -> GridPosition {
        GridPosition::new(
            self.column.saturating_add(rhs.column),
            self.row.saturating_add(rhs.row),
        )
    }
}

impl AddAssign for GridPosition {
    fn add_assign(&mut self, rhs: GridPosition) {
        *self = *self + rhs;
    }
}

impl From<(i32, i32)> for GridPosition {
    fn from((column, row): (i32, i32)) -> Self {
        GridPosition::new(column, row)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_addition() {
        let mut pos = GridPosition::new(2, 1) + GridPosition::new(-1, 1);
        assert_eq!(pos, GridPosition::new(1, 2));

        pos += GridPosition::new(0, -2);
        assert_eq!(pos, GridPosition::new(1, 0));
    }

    #[test]
    fn test_position_addition_saturates() {
        let edge = GridPosition::new(i32::MAX, i32::MIN);
        assert_eq!(edge + GridPosition::new(1, -1), edge);
    }

    #[test]
    fn test_axis_inside_deadzone() {
        assert_eq!(GridPosition::from_axis(0.2, -0.3, 0.5), None);
        assert_eq!(GridPosition::from_axis(f32::NAN, 1.0, 0.5), None);
    }

    #[test]
    fn test_axis_dominant_component() {
        assert_eq!(GridPosition::from_axis(0.9, 0.4, 0.5), Some(GridPosition::new(1, 0)));
        assert_eq!(GridPosition::from_axis(-0.1, -0.8, 0.5), Some(GridPosition::new(0, -1)));
        // 同値の場合は列方向
        assert_eq!(GridPosition::from_axis(-0.7, 0.7, 0.5), Some(GridPosition::new(-1, 0)));
    }
}
