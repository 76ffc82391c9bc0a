use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelPadding, SharedLogger, SimpleLogger,
    TermLogger, TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io;

use crate::config::LoggingConfig;

fn line_format() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_level_padding(LevelPadding::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build()
}

/// Console + append-only file logger. Nothing is installed globally.
pub fn build(cfg: &LoggingConfig) -> io::Result<Box<CombinedLogger>> {
    let level = cfg.level_filter()?;

    if let Some(parent) = cfg.logging_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.logging_path)?;

    Ok(CombinedLogger::new(vec![
        TermLogger::new(level, line_format(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, line_format(), file),
    ]))
}

/// Install the process-wide logger. Without a logging section only the
/// console is used.
pub fn init(cfg: Option<&LoggingConfig>) -> Result<(), Box<dyn Error>> {
    match cfg {
        Some(cfg) => {
            let logger = build(cfg)?;
            log::set_max_level(logger.level());
            log::set_boxed_logger(logger)?;
            log::info!("Logging to {:?}", cfg.logging_path);
        }
        None => SimpleLogger::init(LevelFilter::Info, Config::default())?,
    }
    Ok(())
}
