//! キー配置
//!
//! 行ごとのキー定義からグリッド座標とアクションを組み立てる。
//! 列番号は行内のインデックス、行番号は行のインデックス。

use crate::error::{layout::Result, LayoutError};
use crate::grid::GridPosition;
use crate::key::KeyAction;
use serde::{Deserialize, Serialize};

/// 特殊キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKey {
    Space,
    Backspace,
    Shift,
    Submit,
}

/// 1つのキーの定義
///
/// JSON では `"q"` のような文字列か、`"shift"` などの特殊キー名で書く。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    Special(SpecialKey),
    Symbol(String),
}

impl KeySpec {
    pub fn symbol(s: &str) -> Self {
        KeySpec::Symbol(s.to_string())
    }

    pub fn to_action(&self) -> KeyAction {
        match self {
            KeySpec::Symbol(symbol) => KeyAction::InsertSymbol(symbol.clone()),
            KeySpec::Special(SpecialKey::Space) => KeyAction::Space,
            KeySpec::Special(SpecialKey::Backspace) => KeyAction::Backspace,
            KeySpec::Special(SpecialKey::Shift) => KeyAction::ToggleShift,
            KeySpec::Special(SpecialKey::Submit) => KeyAction::Submit,
        }
    }
}

/// キーボード全体の配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub rows: Vec<Vec<KeySpec>>,
}

impl LayoutConfig {
    /// 記号だけの行から作成
    pub fn from_symbol_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| KeySpec::symbol(s)).collect())
                .collect(),
        }
    }

    /// 組み込みのQWERTY配置
    pub fn qwerty() -> Self {
        let symbols = |s: &str| -> Vec<KeySpec> {
            s.chars().map(|ch| KeySpec::Symbol(ch.to_string())).collect()
        };

        let mut digits = symbols("1234567890");
        digits.push(KeySpec::Special(SpecialKey::Backspace));

        let mut home = symbols("asdfghjkl");
        home.push(KeySpec::Special(SpecialKey::Submit));

        let mut bottom = vec![KeySpec::Special(SpecialKey::Shift)];
        bottom.extend(symbols("zxcvbnm.,"));

        Self {
            rows: vec![
                digits,
                symbols("qwertyuiop"),
                home,
                bottom,
                vec![KeySpec::Special(SpecialKey::Space)],
            ],
        }
    }

    /// 空行・空記号が無いことを確認
    pub fn validate(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(LayoutError::Empty);
        }

        for (row, keys) in self.rows.iter().enumerate() {
            if keys.is_empty() {
                return Err(LayoutError::EmptyRow { row });
            }
            for (column, key) in keys.iter().enumerate() {
                if matches!(key, KeySpec::Symbol(s) if s.is_empty()) {
                    return Err(LayoutError::EmptySymbol { column, row });
                }
            }
        }

        Ok(())
    }

    /// すべてのキーの座標とアクション（行優先・登録順）
    pub fn positions(&self) -> impl Iterator<Item = (GridPosition, KeyAction)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, keys)| {
            keys.iter().enumerate().map(move |(column, key)| {
                (GridPosition::new(column as i32, row as i32), key.to_action())
            })
        })
    }

    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::qwerty()
    }
}
