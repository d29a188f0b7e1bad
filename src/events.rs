//! 変更通知
//!
//! 選択・シフト・テキスト変更・確定をリスナーへ配信する。

use crate::grid::GridPosition;
use crate::key::KeyId;

/// キーボードから通知されるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// ナビゲーションでキーが選択された
    Selected { id: KeyId, position: GridPosition },
    /// シフト状態が変わった
    ShiftChanged(bool),
    /// 入力欄のテキストが変わった
    TextChanged { text: String, caret: usize },
    /// 入力が確定された
    Submitted { text: String },
}

/// 変更通知リスナー
pub trait KeyboardListener {
    fn on_event(&mut self, event: &KeyboardEvent);
}

impl<F> KeyboardListener for F
where
    F: FnMut(&KeyboardEvent),
{
    fn on_event(&mut self, event: &KeyboardEvent) {
        self(event)
    }
}

/// 変更通知システム
#[derive(Default)]
pub struct EventNotifier {
    listeners: Vec<Box<dyn KeyboardListener>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// リスナーを追加
    pub fn add_listener(&mut self, listener: Box<dyn KeyboardListener>) {
        self.listeners.push(listener);
    }

    /// 変更を通知
    pub fn notify(&mut self, event: KeyboardEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}
