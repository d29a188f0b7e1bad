//! ロギングシステム
//!
//! ライブラリ本体は `log` クレートのマクロで出力し、
//! ここで定義する `Logger` がそれを stderr／ファイルへ書き出す。

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// `log` クレートのフィルタに変換
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

/// ロガー
///
/// stderr への出力が基本。フロントエンドが端末を占有している間は
/// stderr を切ってファイル出力だけにする。
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<Mutex<File>>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// ファイル出力を設定
    ///
    /// 親ディレクトリが無ければ作成し、追記モードで一度だけ開いたハンドルを保持する。
    pub fn with_file_output(mut self, path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.output_file = Some(Mutex::new(file));
        Ok(self)
    }

    /// 標準エラー出力を無効化
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(file) = &self.output_file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", message);
            }
        }
    }

    /// 任意のログレベルでメッセージを出力
    pub fn log_message(&self, level: LogLevel, target: &str, message: impl AsRef<str>) {
        if self.should_log(level) {
            self.write_line(&format!("{}: {} in {}", level.tag(), message.as_ref(), target));
        }
    }

    /// グローバルロガーとして登録する
    ///
    /// 既に登録済みの場合は `false` を返し、何も変更しない。
    pub fn install(self) -> bool {
        let filter = self.level.to_filter();
        let logger: &'static Logger = Box::leak(Box::new(self));
        match log::set_logger(logger) {
            Ok(()) => {
                log::set_max_level(filter);
                true
            }
            Err(_) => false,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.log_message(record.level().into(), record.target(), record.args().to_string());
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.output_file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
