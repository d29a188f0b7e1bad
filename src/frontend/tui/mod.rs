use crate::config::KeyboardConfig;
use crate::error::{KeyboardError, Result};
use crate::events::KeyboardEvent;
use crate::grid::GridPosition;
use crate::key::{KeyAction, KeyButton, KeyId, NullView};
use crate::keyboard::Keyboard;
use crate::text::{insert_char_at, InputField, TextBuffer};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// キー1つ分の表示幅
const KEY_CELL_WIDTH: usize = 5;

/// 端末入力から変換した操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendCommand {
    /// 矢印キーで選択を移動
    Move(GridPosition),
    /// 選択中のキーを押す
    Confirm,
    /// 対応する記号キーを直接押す
    Press(char),
    Backspace,
    Quit,
}

/// crossterm のキーイベントを操作に変換する
pub fn map_key_event(event: &KeyEvent) -> Option<FrontendCommand> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    match event.code {
        KeyCode::Esc => Some(FrontendCommand::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(FrontendCommand::Quit)
        }
        KeyCode::Left => Some(FrontendCommand::Move(GridPosition::new(-1, 0))),
        KeyCode::Right => Some(FrontendCommand::Move(GridPosition::new(1, 0))),
        // 行番号は上から数えるので上矢印は行を減らす
        KeyCode::Up => Some(FrontendCommand::Move(GridPosition::new(0, -1))),
        KeyCode::Down => Some(FrontendCommand::Move(GridPosition::new(0, 1))),
        KeyCode::Enter => Some(FrontendCommand::Confirm),
        KeyCode::Backspace => Some(FrontendCommand::Backspace),
        KeyCode::Char(ch) => Some(FrontendCommand::Press(ch)),
        _ => None,
    }
}

pub struct TuiApplication {
    keyboard: Keyboard<InputField>,
    running: bool,
    last_submitted: Rc<RefCell<Option<String>>>,
}

impl TuiApplication {
    pub fn new(config: &KeyboardConfig) -> Result<Self> {
        let mut keyboard = Keyboard::with_config(InputField::new(), config);
        keyboard.load_layout(&config.layout(), |_, _| Box::new(NullView))?;
        Ok(Self::with_keyboard(keyboard))
    }

    /// 組み立て済みのキーボードから作成
    pub fn with_keyboard(mut keyboard: Keyboard<InputField>) -> Self {
        let last_submitted = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_submitted);
        keyboard.add_listener(Box::new(move |event: &KeyboardEvent| {
            if let KeyboardEvent::Submitted { text } = event {
                *sink.borrow_mut() = Some(text.clone());
            }
        }));

        Self {
            keyboard,
            running: true,
            last_submitted,
        }
    }

    pub fn keyboard(&self) -> &Keyboard<InputField> {
        &self.keyboard
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 最後に確定されたテキスト
    pub fn last_submitted(&self) -> Option<String> {
        self.last_submitted.borrow().clone()
    }

    /// 操作を1つ適用する
    pub fn handle_command(&mut self, command: FrontendCommand) {
        match command {
            FrontendCommand::Move(delta) => {
                self.keyboard.move_direction(delta);
            }
            FrontendCommand::Confirm => {
                self.keyboard.confirm_selection();
            }
            FrontendCommand::Press(ch) => {
                if let Some(id) = self.find_key_for(ch) {
                    self.keyboard.click(id);
                }
            }
            FrontendCommand::Backspace => {
                self.keyboard.backspace();
            }
            FrontendCommand::Quit => self.running = false,
        }
    }

    fn find_key_for(&self, ch: char) -> Option<KeyId> {
        self.keyboard
            .buttons()
            .iter()
            .find(|button| match button.action() {
                KeyAction::Space => ch == ' ',
                KeyAction::InsertSymbol(symbol) => symbol
                    .chars()
                    .next()
                    .is_some_and(|first| first.to_lowercase().eq(ch.to_lowercase())),
                _ => false,
            })
            .map(KeyButton::id)
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).map_err(|err| terminal_error("terminal init", err))?;
        terminal.hide_cursor().map_err(|err| terminal_error("hide cursor", err))?;

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            terminal
                .draw(|frame| self.render(frame))
                .map_err(|err| terminal_error("render", err))?;

            if event::poll(Duration::from_millis(16)).map_err(|err| terminal_error("event poll", err))? {
                if let Event::Key(key_event) = event::read().map_err(|err| terminal_error("event read", err))? {
                    if let Some(command) = map_key_event(&key_event) {
                        self.handle_command(command);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let buffer = self.keyboard.buffer();
        let shown = insert_char_at(buffer.text(), buffer.caret(), '|');
        let input = Paragraph::new(Line::from(shown))
            .block(Block::default().borders(Borders::ALL).title("input"));
        frame.render_widget(input, areas[0]);

        let keys = Paragraph::new(self.key_lines())
            .block(Block::default().borders(Borders::ALL).title("keyboard"));
        frame.render_widget(keys, areas[1]);

        let status = format!(
            "shift: {}  submitted: {}  (arrows move, Enter press, Esc quit)",
            if self.keyboard.is_shifted() { "on" } else { "off" },
            self.last_submitted().unwrap_or_default(),
        );
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Cyan)),
            areas[2],
        );
    }

    /// 行ごとのキー表示
    fn key_lines(&self) -> Vec<Line<'static>> {
        let buttons = self.keyboard.buttons();
        let max_row = buttons.iter().map(|b| b.position().row).max().unwrap_or(-1);
        let selected = self.keyboard.selected();

        (0..=max_row)
            .map(|row| {
                let mut in_row: Vec<&KeyButton> =
                    buttons.iter().filter(|b| b.position().row == row).collect();
                in_row.sort_by_key(|b| b.position().column);

                let spans: Vec<Span<'static>> = in_row
                    .into_iter()
                    .map(|button| {
                        let style = if Some(button.id()) == selected {
                            Style::default().add_modifier(Modifier::REVERSED)
                        } else {
                            Style::default()
                        };
                        Span::styled(key_cell(&button.label()), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// ラベルを固定幅のセルに収める
fn key_cell(label: &str) -> String {
    let width = UnicodeWidthStr::width(label);
    let padding = KEY_CELL_WIDTH.saturating_sub(width);
    format!("[{}{}]", label, " ".repeat(padding))
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen).map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> KeyboardError {
    KeyboardError::Frontend(format!("{}: {}", context, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;

    fn app() -> TuiApplication {
        let config = KeyboardConfig {
            layout: Some(LayoutConfig::from_symbol_rows(&[&["a", "b", "c"], &["d"]])),
            ..KeyboardConfig::default()
        };
        TuiApplication::new(&config).unwrap()
    }

    #[test]
    fn test_map_arrow_and_control_keys() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(map_key_event(&up), Some(FrontendCommand::Move(GridPosition::new(0, -1))));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key_event(&ctrl_c), Some(FrontendCommand::Quit));

        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(map_key_event(&plain_c), Some(FrontendCommand::Press('c')));

        assert_eq!(map_key_event(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_navigate_and_confirm() {
        let mut app = app();
        app.handle_command(FrontendCommand::Move(GridPosition::new(1, 0)));
        app.handle_command(FrontendCommand::Move(GridPosition::new(1, 0)));
        app.handle_command(FrontendCommand::Confirm);
        assert_eq!(app.keyboard().buffer().text(), "b");

        app.handle_command(FrontendCommand::Press('D'));
        assert_eq!(app.keyboard().buffer().text(), "bd");

        app.handle_command(FrontendCommand::Press('z'));
        app.handle_command(FrontendCommand::Backspace);
        assert_eq!(app.keyboard().buffer().text(), "b");

        app.handle_command(FrontendCommand::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_key_lines_mark_selection() {
        let mut app = app();
        app.handle_command(FrontendCommand::Move(GridPosition::new(0, 1)));

        let lines = app.key_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[0].content, "[a    ]");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::REVERSED));
        assert!(!lines[1].spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }
}
