//! キーボードコントローラー
//!
//! 登録済みキーの管理、スティックによる選択移動、キー動作の実行を行う。
//! すべての操作は失敗しても何もしないだけで、状態を壊さない。

pub mod navigation;

use crate::config::{KeyboardConfig, DEFAULT_AXIS_DEADZONE};
use crate::error::Result;
use crate::events::{EventNotifier, KeyboardEvent, KeyboardListener};
use crate::grid::GridPosition;
use crate::key::{KeyAction, KeyButton, KeyId, KeyView};
use crate::layout::LayoutConfig;
use crate::text::{char_len, insert_char_at, remove_char_range, TextBuffer};
use log::{debug, info, warn};

pub use navigation::{MatchTier, NavigationTarget};

/// 仮想キーボード
///
/// 入力欄 `B` を所有し、キーのアクションをその編集操作に変換する。
pub struct Keyboard<B: TextBuffer> {
    /// 登録順のキー
    buttons: Vec<KeyButton>,
    /// 選択中のキー（必ず `buttons` に含まれる）
    current: Option<KeyId>,
    shifted: bool,
    /// 編集中のキャレット位置（入力欄の値の写し）
    caret_position: usize,
    axis_deadzone: f32,
    next_id: u64,
    buffer: B,
    notifier: EventNotifier,
}

impl<B: TextBuffer> Keyboard<B> {
    /// 新しいキーボードを作成
    pub fn new(buffer: B) -> Self {
        let caret_position = buffer.caret();
        Self {
            buttons: Vec::new(),
            current: None,
            shifted: false,
            caret_position,
            axis_deadzone: DEFAULT_AXIS_DEADZONE,
            next_id: 0,
            buffer,
            notifier: EventNotifier::new(),
        }
    }

    /// 設定を反映して作成
    pub fn with_config(buffer: B, config: &KeyboardConfig) -> Self {
        let mut keyboard = Self::new(buffer);
        keyboard.shifted = config.initial_shift;
        keyboard.axis_deadzone = config.axis_deadzone;
        keyboard
    }

    /// リスナーを追加
    pub fn add_listener(&mut self, listener: Box<dyn KeyboardListener>) {
        self.notifier.add_listener(listener);
    }

    // ---- 登録 ----

    /// キーを登録し、識別子を返す
    ///
    /// 位置の重複は確認しない。表示は現在のシフト状態に合わせる。
    pub fn register(
        &mut self,
        position: GridPosition,
        action: KeyAction,
        view: Box<dyn KeyView>,
    ) -> KeyId {
        let id = KeyId(self.next_id);
        self.next_id += 1;

        let mut button = KeyButton::new(id, position, action, self.shifted, view);
        button.set_case(self.shifted);
        debug!("registered {} at {}", id, position);
        self.buttons.push(button);
        id
    }

    /// キーの登録を解除する
    ///
    /// 選択中のキーだった場合は選択も解除する。未登録なら `false`。
    pub fn unregister(&mut self, id: KeyId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.buttons.remove(index);
        if self.current == Some(id) {
            self.current = None;
        }
        debug!("unregistered {}", id);
        true
    }

    /// 配置定義のキーをすべて登録する
    ///
    /// `factory` は各キーの見た目を作る。
    pub fn load_layout<F>(&mut self, layout: &LayoutConfig, mut factory: F) -> Result<Vec<KeyId>>
    where
        F: FnMut(GridPosition, &KeyAction) -> Box<dyn KeyView>,
    {
        layout.validate()?;

        let ids: Vec<KeyId> = layout
            .positions()
            .map(|(position, action)| {
                let view = factory(position, &action);
                self.register(position, action, view)
            })
            .collect();
        Ok(ids)
    }

    // ---- 参照 ----

    pub fn buttons(&self) -> &[KeyButton] {
        &self.buttons
    }

    pub fn button(&self, id: KeyId) -> Option<&KeyButton> {
        self.buttons.iter().find(|button| button.id() == id)
    }

    /// 指定位置のキー（登録順で最初のもの）
    pub fn button_at(&self, position: GridPosition) -> Option<&KeyButton> {
        self.buttons.iter().find(|button| button.position() == position)
    }

    /// 選択中のキー
    pub fn selected(&self) -> Option<KeyId> {
        self.current
    }

    pub fn selected_position(&self) -> Option<GridPosition> {
        self.current
            .and_then(|id| self.button(id))
            .map(KeyButton::position)
    }

    pub fn is_shifted(&self) -> bool {
        self.shifted
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    fn index_of(&self, id: KeyId) -> Option<usize> {
        self.buttons.iter().position(|button| button.id() == id)
    }

    // ---- ナビゲーション ----

    /// 選択を `delta` 方向へ移動する
    ///
    /// 未選択なら原点のキーを選ぶだけで `delta` は使わない。
    /// 選択が変わった（または選び直された）場合 `true`。
    pub fn move_direction(&mut self, delta: GridPosition) -> bool {
        let positions: Vec<GridPosition> =
            self.buttons.iter().map(KeyButton::position).collect();

        let Some(current) = self.selected_position() else {
            return match navigation::origin_index(&positions) {
                Some(index) => {
                    self.select_index(index);
                    true
                }
                None => {
                    debug!("no key at {}; selection unchanged", GridPosition::ORIGIN);
                    false
                }
            };
        };

        match navigation::next_index(&positions, current, delta) {
            Some(target) => {
                debug!(
                    "move {} by {} -> {} ({:?})",
                    current, delta, positions[target.index], target.tier
                );
                self.select_index(target.index);
                true
            }
            None => {
                debug!("move {} by {}: no key near {}", current, delta, current + delta);
                false
            }
        }
    }

    /// スティックの生の入力で選択を移動する
    pub fn move_axis(&mut self, x: f32, y: f32) -> bool {
        match GridPosition::from_axis(x, y, self.axis_deadzone) {
            Some(delta) => self.move_direction(delta),
            None => false,
        }
    }

    fn select_index(&mut self, index: usize) {
        let id = self.buttons[index].id();

        if let Some(previous) = self.current.filter(|&previous| previous != id) {
            if let Some(prev_index) = self.index_of(previous) {
                self.buttons[prev_index].deselect();
            }
        }

        self.current = Some(id);
        let button = &mut self.buttons[index];
        button.select();
        let position = button.position();
        self.notifier.notify(KeyboardEvent::Selected { id, position });
    }

    // ---- キー動作 ----

    /// 選択中のキーを押す（未選択なら何もしない）
    pub fn confirm_selection(&mut self) -> bool {
        match self.current {
            Some(id) => self.click(id),
            None => false,
        }
    }

    /// 指定キーを押す（ポインタでのクリック）
    pub fn click(&mut self, id: KeyId) -> bool {
        let Some(action) = self.button(id).map(|button| button.action().clone()) else {
            warn!("click on unregistered {}", id);
            return false;
        };
        self.activate(&action)
    }

    /// アクションを実行する。状態が変わった場合 `true`
    pub fn activate(&mut self, action: &KeyAction) -> bool {
        match action {
            KeyAction::InsertSymbol(symbol) => self.insert_symbol(symbol),
            KeyAction::Space => {
                self.insert_space();
                true
            }
            KeyAction::Backspace => self.backspace(),
            KeyAction::ToggleShift => {
                self.toggle_shift();
                true
            }
            KeyAction::Submit => {
                self.submit();
                true
            }
            KeyAction::NoOp => false,
        }
    }

    // ---- テキスト編集 ----

    /// 記号の先頭文字をシフト状態に合わせて挿入する
    ///
    /// 空の記号は無視して `false`。
    pub fn insert_symbol(&mut self, symbol: &str) -> bool {
        let Some(first) = symbol.chars().next() else {
            warn!("ignoring empty symbol");
            return false;
        };

        let ch = fold_case(first, self.shifted);
        self.insert_char(ch);
        true
    }

    /// 空白を挿入
    pub fn insert_space(&mut self) {
        self.insert_char(' ');
    }

    /// シフト状態を反転し、全キーの表示を合わせる
    pub fn toggle_shift(&mut self) {
        self.shifted = !self.shifted;
        for button in &mut self.buttons {
            button.set_case(self.shifted);
        }
        debug!("shift {}", if self.shifted { "on" } else { "off" });
        self.notifier.notify(KeyboardEvent::ShiftChanged(self.shifted));
    }

    /// キャレット前の1文字、または選択範囲を削除する
    ///
    /// 何も変わらなかった（先頭で選択なし）場合 `false`。
    pub fn backspace(&mut self) -> bool {
        let text = self.buffer.text().to_string();
        let len = char_len(&text);
        let caret = clamp_index(self.buffer.caret(), len, "caret");
        let anchor = clamp_index(self.buffer.selection_anchor(), len, "selection anchor");
        let focus = clamp_index(self.buffer.selection_focus(), len, "selection focus");

        if anchor != caret || focus != caret {
            let start = anchor.min(focus);
            let end = anchor.max(focus);

            self.buffer.set_text(remove_char_range(&text, start, end));
            self.caret_position = start;
            self.buffer.set_caret(start);
            self.buffer.set_selection(start, start);
            self.notify_text_changed();
            return true;
        }

        if caret == 0 {
            // 範囲外だったキャレットは収めた値を書き戻す
            if self.buffer.caret() != caret {
                self.caret_position = caret;
                self.buffer.set_caret(caret);
            }
            return false;
        }

        self.caret_position = caret - 1;
        self.buffer
            .set_text(remove_char_range(&text, self.caret_position, caret));
        self.buffer.set_caret(self.caret_position);
        self.notify_text_changed();
        true
    }

    /// 入力の確定を通知する
    pub fn submit(&mut self) {
        let text = self.buffer.text().to_string();
        info!("submitted {} chars", char_len(&text));
        self.notifier.notify(KeyboardEvent::Submitted { text });
    }

    fn insert_char(&mut self, ch: char) {
        let text = self.buffer.text().to_string();
        let caret = clamp_index(self.buffer.caret(), char_len(&text), "caret");

        self.buffer.set_text(insert_char_at(&text, caret, ch));
        self.caret_position = caret + 1;
        self.buffer.set_caret(self.caret_position);
        debug!("inserted {:?} at {}", ch, caret);
        self.notify_text_changed();
    }

    fn notify_text_changed(&mut self) {
        self.notifier.notify(KeyboardEvent::TextChanged {
            text: self.buffer.text().to_string(),
            caret: self.caret_position,
        });
    }
}

/// 入力欄から読んだ位置を `[0, len]` に収める
fn clamp_index(index: usize, len: usize, what: &str) -> usize {
    if index > len {
        warn!("{} {} beyond text length {}; clamped", what, index, len);
        len
    } else {
        index
    }
}

/// 1文字のまま大文字／小文字に変換する
///
/// 変換結果が複数文字になる場合（'ß' など）は元の文字のまま。
fn fold_case(ch: char, upper: bool) -> char {
    let folded: String = if upper {
        ch.to_uppercase().collect()
    } else {
        ch.to_lowercase().collect()
    };

    let mut chars = folded.chars();
    match (chars.next(), chars.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::NullView;
    use crate::text::InputField;

    fn keyboard_with(cells: &[(i32, i32)]) -> (Keyboard<InputField>, Vec<KeyId>) {
        let mut keyboard = Keyboard::new(InputField::new());
        let ids = cells
            .iter()
            .map(|&(c, r)| {
                keyboard.register(
                    GridPosition::new(c, r),
                    KeyAction::InsertSymbol(format!("{c}{r}")),
                    Box::new(NullView),
                )
            })
            .collect();
        (keyboard, ids)
    }

    #[test]
    fn test_first_move_selects_origin() {
        let (mut keyboard, ids) = keyboard_with(&[(1, 0), (0, 0)]);
        assert!(keyboard.move_direction(GridPosition::new(1, 0)));
        assert_eq!(keyboard.selected(), Some(ids[1]));
    }

    #[test]
    fn test_first_move_without_origin_is_noop() {
        let (mut keyboard, _) = keyboard_with(&[(1, 0)]);
        assert!(!keyboard.move_direction(GridPosition::new(1, 0)));
        assert_eq!(keyboard.selected(), None);
        assert!(!keyboard.confirm_selection());
        assert_eq!(keyboard.buffer().text(), "");
    }

    #[test]
    fn test_unregister_clears_selection() {
        let (mut keyboard, ids) = keyboard_with(&[(0, 0), (1, 0)]);
        keyboard.move_direction(GridPosition::new(1, 0));
        assert!(keyboard.unregister(ids[0]));
        assert_eq!(keyboard.selected(), None);
        assert!(!keyboard.unregister(ids[0]));
        assert_eq!(keyboard.buttons().len(), 1);
    }

    #[test]
    fn test_unregister_other_key_keeps_selection() {
        let (mut keyboard, ids) = keyboard_with(&[(0, 0), (1, 0)]);
        keyboard.move_direction(GridPosition::new(1, 0));
        assert!(keyboard.unregister(ids[1]));
        assert_eq!(keyboard.selected(), Some(ids[0]));
    }

    #[test]
    fn test_fold_case_keeps_single_char() {
        assert_eq!(fold_case('a', true), 'A');
        assert_eq!(fold_case('Q', false), 'q');
        assert_eq!(fold_case('1', true), '1');
        assert_eq!(fold_case('ß', true), 'ß');
    }

    #[test]
    fn test_move_axis_respects_deadzone() {
        let (mut keyboard, ids) = keyboard_with(&[(0, 0), (1, 0)]);
        assert!(!keyboard.move_axis(0.1, 0.1));
        assert!(keyboard.move_axis(0.9, 0.0));
        assert_eq!(keyboard.selected(), Some(ids[0]));
        assert!(keyboard.move_axis(0.9, 0.0));
        assert_eq!(keyboard.selected(), Some(ids[1]));
    }

    #[test]
    fn test_with_config_starts_shifted() {
        let config = KeyboardConfig {
            initial_shift: true,
            ..KeyboardConfig::default()
        };
        let mut keyboard = Keyboard::with_config(InputField::new(), &config);
        let id = keyboard.register(
            GridPosition::ORIGIN,
            KeyAction::InsertSymbol("k".to_string()),
            Box::new(NullView),
        );

        assert!(keyboard.button(id).unwrap().is_upper());
        keyboard.click(id);
        assert_eq!(keyboard.buffer().text(), "K");
    }

    #[test]
    fn test_load_layout_registers_every_key() {
        let mut keyboard = Keyboard::new(InputField::new());
        let layout = LayoutConfig::qwerty();
        let ids = keyboard
            .load_layout(&layout, |_, _| Box::new(NullView))
            .unwrap();

        assert_eq!(ids.len(), layout.key_count());
        assert_eq!(
            keyboard.button_at(GridPosition::new(0, 4)).unwrap().action(),
            &KeyAction::Space
        );
    }
}
