//! 設定
//!
//! JSON の設定ファイルからキーボードの初期状態・入力の遊び・ログレベル・配置を読み込む。
//! 未指定の項目は既定値で埋める。

use crate::error::{ConfigError, KeyboardError, Result};
use crate::layout::LayoutConfig;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// スティック入力の遊びの既定値
pub const DEFAULT_AXIS_DEADZONE: f32 = 0.5;

/// キーボード設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// 起動時にシフト状態にするか
    pub initial_shift: bool,
    /// この値以下のスティック入力は無視する
    pub axis_deadzone: f32,
    pub log_level: LogLevel,
    /// 未指定時は組み込みのQWERTY配置
    pub layout: Option<LayoutConfig>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            initial_shift: false,
            axis_deadzone: DEFAULT_AXIS_DEADZONE,
            log_level: LogLevel::Info,
            layout: None,
        }
    }
}

impl KeyboardConfig {
    /// 既定の設定ファイルパス（`<config_dir>/nonnative-keyboard/config.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nonnative-keyboard").join("config.json"))
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KeyboardConfig =
            serde_json::from_str(&content).map_err(|err| ConfigError::InvalidFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        log::debug!("loaded keyboard config from {}", path.display());
        Ok(config)
    }

    /// 指定パス、無ければ既定パスから読み込む。どちらも無ければ既定値
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    /// 値の範囲を確認
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.axis_deadzone) {
            return Err(ConfigError::InvalidValue {
                key: "axis_deadzone".to_string(),
                value: self.axis_deadzone.to_string(),
            }
            .into());
        }

        if let Some(layout) = &self.layout {
            layout.validate().map_err(KeyboardError::from)?;
        }

        Ok(())
    }

    /// 使用する配置
    pub fn layout(&self) -> LayoutConfig {
        self.layout.clone().unwrap_or_else(LayoutConfig::qwerty)
    }
}
