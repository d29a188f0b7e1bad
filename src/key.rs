//! キーボタン
//!
//! グリッド上の1つのキー。位置・大文字小文字の表示状態・アクションを持つ。
//! テキスト編集のロジックは持たず、アクションはコントローラーが解釈する。

use crate::grid::GridPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 登録されたキーの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub(crate) u64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}

/// キーが押されたときの動作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "symbol", rename_all = "snake_case")]
pub enum KeyAction {
    /// 記号の先頭文字を挿入
    InsertSymbol(String),
    /// 空白を挿入
    Space,
    Backspace,
    ToggleShift,
    /// 入力確定
    Submit,
    NoOp,
}

impl KeyAction {
    /// 表示用ラベル
    pub fn label(&self, upper: bool) -> String {
        match self {
            KeyAction::InsertSymbol(symbol) if upper => symbol.to_uppercase(),
            KeyAction::InsertSymbol(symbol) => symbol.to_lowercase(),
            KeyAction::Space => "Space".to_string(),
            KeyAction::Backspace => "Back".to_string(),
            KeyAction::ToggleShift => "Shift".to_string(),
            KeyAction::Submit => "Enter".to_string(),
            KeyAction::NoOp => String::new(),
        }
    }
}

/// キーの見た目を担当する外部コラボレーター
///
/// テキストバッファには一切触れない。
pub trait KeyView {
    /// 大文字／小文字表示の切り替え
    fn set_case(&mut self, upper: bool);

    /// ナビゲーションで選択された
    fn on_selected(&mut self);

    /// 選択が他のキーへ移った
    fn on_deselected(&mut self) {}
}

/// 何も描画しないビュー
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl KeyView for NullView {
    fn set_case(&mut self, _upper: bool) {}

    fn on_selected(&mut self) {}
}

/// 登録済みのキー
pub struct KeyButton {
    id: KeyId,
    position: GridPosition,
    action: KeyAction,
    upper: bool,
    view: Box<dyn KeyView>,
}

impl KeyButton {
    pub(crate) fn new(
        id: KeyId,
        position: GridPosition,
        action: KeyAction,
        upper: bool,
        view: Box<dyn KeyView>,
    ) -> Self {
        Self {
            id,
            position,
            action,
            upper,
            view,
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn action(&self) -> &KeyAction {
        &self.action
    }

    /// 現在の表示が大文字かどうか
    pub fn is_upper(&self) -> bool {
        self.upper
    }

    /// 現在の表示状態でのラベル
    pub fn label(&self) -> String {
        self.action.label(self.upper)
    }

    pub(crate) fn set_case(&mut self, upper: bool) {
        self.upper = upper;
        self.view.set_case(upper);
    }

    pub(crate) fn select(&mut self) {
        self.view.on_selected();
    }

    pub(crate) fn deselect(&mut self) {
        self.view.on_deselected();
    }
}

impl fmt::Debug for KeyButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyButton")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("action", &self.action)
            .field("upper", &self.upper)
            .finish_non_exhaustive()
    }
}
