// log4rs setup: console always, plus a timestamped file when a log directory is set

use std::path::{Path, PathBuf};

use chrono::Local;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} - {l} - {m}{n}";

/// `<log_dir>/<YYYY-mm-dd-HH_MM>.log`
pub fn timestamped_log_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d-%H_%M").to_string();
    log_dir.join(format!("{timestamp}.log"))
}

pub fn build_config(level: LevelFilter, log_dir: Option<&Path>) -> anyhow::Result<Config> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(timestamped_log_path(dir))?;
        config = config.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    Ok(config.build(root.build(level))?)
}

pub fn setup_logging(level: LevelFilter, log_dir: Option<&Path>) -> anyhow::Result<()> {
    log4rs::init_config(build_config(level, log_dir)?)?;
    Ok(())
}
