//! テスト用コラボレーター
//!
//! 呼び出しを記録する入力欄とキービュー。

#![allow(dead_code)]

use nonnative_keyboard::{GridPosition, KeyAction, KeyId, KeyView, Keyboard, TextBuffer};
use std::cell::RefCell;
use std::rc::Rc;

/// 入力欄への書き込み
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferCall {
    SetText(String),
    SetCaret(usize),
    SetSelection(usize, usize),
}

/// 値をそのまま保持し、書き込みを記録する入力欄
///
/// `InputField` と違い、キャレット設定で選択範囲を畳まない。
#[derive(Debug, Clone, Default)]
pub struct RecordingBuffer {
    pub text: String,
    pub caret: usize,
    pub anchor: usize,
    pub focus: usize,
    pub calls: Vec<BufferCall>,
}

impl RecordingBuffer {
    /// キャレットだけ置いた状態（選択なし）
    pub fn with_caret(text: &str, caret: usize) -> Self {
        Self {
            text: text.to_string(),
            caret,
            anchor: caret,
            focus: caret,
            calls: Vec::new(),
        }
    }

    /// 選択範囲付き。キャレットは focus 側
    pub fn with_selection(text: &str, anchor: usize, focus: usize) -> Self {
        Self {
            text: text.to_string(),
            caret: focus,
            anchor,
            focus,
            calls: Vec::new(),
        }
    }
}

impl TextBuffer for RecordingBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.calls.push(BufferCall::SetText(text.clone()));
        self.text = text;
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, caret: usize) {
        self.calls.push(BufferCall::SetCaret(caret));
        self.caret = caret;
    }

    fn selection_anchor(&self) -> usize {
        self.anchor
    }

    fn selection_focus(&self) -> usize {
        self.focus
    }

    fn set_selection(&mut self, anchor: usize, focus: usize) {
        self.calls.push(BufferCall::SetSelection(anchor, focus));
        self.anchor = anchor;
        self.focus = focus;
    }
}

/// キービューへの呼び出し
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCall {
    SetCase(bool),
    Selected,
    Deselected,
}

/// 呼び出しを共有ログへ記録するキービュー
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub log: Rc<RefCell<Vec<ViewCall>>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// 最後に設定された大文字表示
    pub fn last_case(&self) -> Option<bool> {
        self.log.borrow().iter().rev().find_map(|call| match call {
            ViewCall::SetCase(upper) => Some(*upper),
            _ => None,
        })
    }
}

impl KeyView for RecordingView {
    fn set_case(&mut self, upper: bool) {
        self.log.borrow_mut().push(ViewCall::SetCase(upper));
    }

    fn on_selected(&mut self) {
        self.log.borrow_mut().push(ViewCall::Selected);
    }

    fn on_deselected(&mut self) {
        self.log.borrow_mut().push(ViewCall::Deselected);
    }
}

/// 記号キーを並べたキーボード。ビューのハンドルも返す
pub fn keyboard_with_cells<B: TextBuffer>(
    buffer: B,
    cells: &[(i32, i32)],
) -> (Keyboard<B>, Vec<KeyId>, Vec<RecordingView>) {
    let mut keyboard = Keyboard::new(buffer);
    let mut ids = Vec::new();
    let mut views = Vec::new();

    for &(column, row) in cells {
        let view = RecordingView::default();
        let id = keyboard.register(
            GridPosition::new(column, row),
            KeyAction::InsertSymbol(format!("k{column}{row}")),
            Box::new(view.clone()),
        );
        ids.push(id);
        views.push(view);
    }

    (keyboard, ids, views)
}
