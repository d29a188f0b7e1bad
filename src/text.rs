//! テキストバッファ
//!
//! キーボードが文字を書き込む先の入力欄を抽象化する。
//! インデックスはすべて文字単位（Unicodeスカラー値）で、バイト位置ではない。

/// キャレットと選択範囲を持つ入力欄
pub trait TextBuffer {
    /// 現在のテキスト
    fn text(&self) -> &str;

    fn set_text(&mut self, text: String);

    /// キャレット位置（文字単位）
    fn caret(&self) -> usize;

    fn set_caret(&mut self, caret: usize);

    /// 選択開始位置
    fn selection_anchor(&self) -> usize;

    /// 選択終了位置（キャレット側）
    fn selection_focus(&self) -> usize;

    fn set_selection(&mut self, anchor: usize, focus: usize);
}

/// メモリ上の入力欄
///
/// 保持するインデックスは常に `[0, 文字数]` に収まる。
/// キャレットを設定すると選択範囲はその位置に畳まれる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
    caret: usize,
    anchor: usize,
    focus: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列から作成（キャレットは末尾）
    pub fn from_str(s: &str) -> Self {
        let end = char_len(s);
        Self {
            text: s.to_string(),
            caret: end,
            anchor: end,
            focus: end,
        }
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(char_len(&self.text))
    }
}

impl TextBuffer for InputField {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.caret = self.clamp(self.caret);
        self.anchor = self.clamp(self.anchor);
        self.focus = self.clamp(self.focus);
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, caret: usize) {
        let caret = self.clamp(caret);
        self.caret = caret;
        self.anchor = caret;
        self.focus = caret;
    }

    fn selection_anchor(&self) -> usize {
        self.anchor
    }

    fn selection_focus(&self) -> usize {
        self.focus
    }

    fn set_selection(&mut self, anchor: usize, focus: usize) {
        self.anchor = self.clamp(anchor);
        self.focus = self.clamp(focus);
        self.caret = self.focus;
    }
}

/// 文字数
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 文字位置をバイト位置に変換（範囲外は末尾）
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// `char_pos` に1文字挿入した新しい文字列を返す
pub fn insert_char_at(s: &str, char_pos: usize, ch: char) -> String {
    let idx = byte_index(s, char_pos);
    let mut result = String::with_capacity(s.len() + ch.len_utf8());
    result.push_str(&s[..idx]);
    result.push(ch);
    result.push_str(&s[idx..]);
    result
}

/// `[start, end)` の文字を取り除いた新しい文字列を返す
pub fn remove_char_range(s: &str, start: usize, end: usize) -> String {
    let from = byte_index(s, start.min(end));
    let to = byte_index(s, end.max(start));
    let mut result = String::with_capacity(s.len() - (to - from));
    result.push_str(&s[..from]);
    result.push_str(&s[to..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_multibyte() {
        let s = "añb";
        assert_eq!(insert_char_at(s, 2, 'X'), "añXb");
        assert_eq!(insert_char_at(s, 10, 'X'), "añbX");
        assert_eq!(remove_char_range(s, 1, 2), "ab");
        assert_eq!(remove_char_range(s, 2, 0), "b");
    }

    #[test]
    fn test_input_field_clamps_indices() {
        let mut field = InputField::from_str("abc");
        assert_eq!(field.caret(), 3);

        field.set_caret(10);
        assert_eq!(field.caret(), 3);

        field.set_selection(1, 7);
        assert_eq!((field.selection_anchor(), field.selection_focus()), (1, 3));

        field.set_text("a".to_string());
        assert_eq!(field.caret(), 1);
        assert_eq!(field.selection_anchor(), 1);
    }

    #[test]
    fn test_set_caret_collapses_selection() {
        let mut field = InputField::from_str("hello");
        field.set_selection(0, 4);
        assert_eq!((field.selection_anchor(), field.selection_focus()), (0, 4));

        field.set_caret(2);
        assert_eq!((field.selection_anchor(), field.selection_focus()), (2, 2));
    }
}
