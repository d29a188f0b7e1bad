use anyhow::Context;
use nonnative_keyboard::frontend::TuiApplication;
use nonnative_keyboard::logging::Logger;
use nonnative_keyboard::KeyboardConfig;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = KeyboardConfig::load_or_default(config_path.as_deref())
        .context("failed to load keyboard config")?;

    // 端末を占有するのでログはファイルにだけ出す
    let mut logger = Logger::new(config.log_level).without_stderr();
    let log_path = dirs::cache_dir().map(|dir| dir.join("nonnative-keyboard").join("keyboard.log"));
    if let Some(path) = log_path {
        logger = logger
            .with_file_output(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }
    logger.install();

    let mut app = TuiApplication::new(&config).context("failed to build keyboard")?;
    app.run().context("terminal session failed")?;

    if let Some(text) = app.last_submitted() {
        println!("{}", text);
    }

    Ok(())
}
