//! フロントエンド
//!
//! 端末上でキーボードを操作するデモ用の画面。

pub mod tui;

pub use tui::{map_key_event, FrontendCommand, TuiApplication};
