//! エラーハンドリングシステム
//!
//! キーボード全体で使用されるエラー型を定義する。
//! 編集・ナビゲーション操作は失敗しても何もしないだけなので、
//! ここに現れるのは設定ファイル・レイアウト・フロントエンド由来のエラーのみ。

use thiserror::Error;

/// ライブラリ全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum KeyboardError {
    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// レイアウトエラー
    #[error("Layout error")]
    Layout(#[from] LayoutError),

    /// 入出力エラー
    #[error("IO error: {message}")]
    Io { message: String },

    /// フロントエンド（端末描画）のエラー
    #[error("Frontend error: {0}")]
    Frontend(String),
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// レイアウト固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Layout has no rows")]
    Empty,

    #[error("Row {row} has no keys")]
    EmptyRow { row: usize },

    #[error("Empty symbol at column {column}, row {row}")]
    EmptySymbol { column: usize, row: usize },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, KeyboardError>;

/// 各モジュール固有のResult型
pub mod layout {
    pub type Result<T> = std::result::Result<T, super::LayoutError>;
}

// std::io::Error から KeyboardError への変換
impl From<std::io::Error> for KeyboardError {
    fn from(error: std::io::Error) -> Self {
        KeyboardError::Io {
            message: error.to_string(),
        }
    }
}
