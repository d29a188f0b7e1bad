//! nonnative-keyboard - VR/3D UI 向け仮想キーボード
//!
//! キーの登録、スティックによるグリッド上の選択移動、入力欄への文字入力を提供する。
//! 描画・入力デバイス・入力欄の実体は外部のコラボレーターとして扱う。

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod grid;
pub mod key;
pub mod layout;
pub mod text;

// ロジック層
pub mod events;
pub mod keyboard;

// 表示層
pub mod frontend;

// 公開API
pub use config::KeyboardConfig;
pub use error::{KeyboardError, Result};
pub use events::{KeyboardEvent, KeyboardListener};
pub use grid::GridPosition;
pub use key::{KeyAction, KeyButton, KeyId, KeyView, NullView};
pub use keyboard::Keyboard;
pub use layout::LayoutConfig;
pub use text::{InputField, TextBuffer};
