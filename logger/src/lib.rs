use std::fs::File;

use colored::Colorize;
use middleware::logger::LoggerMiddleware;

pub mod middleware {
    pub mod logger;
}

/// Routes `log` records to stdout and to `log_file`, truncating the file first.
///
/// Production keeps `Info` and above, other environments also get `Debug`.
pub fn setup(log_file: &str, production: bool) -> Result<(), fern::InitError> {
    File::create(log_file).map_err(fern::InitError::Io)?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            let level = match record.level() {
                log::Level::Error => "ERROR".red(),
                log::Level::Warn => "WARN".yellow(),
                log::Level::Info => "INFO".green(),
                log::Level::Debug => "DEBUG".magenta(),
                log::Level::Trace => "TRACE".bright_black(),
            };
            out.finish(format_args!(
                "{} {} {} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level,
                record.target().bright_black(),
                message
            ))
        })
        .level(level_filter(production))
        // reqwest reports every pooled connection at debug
        .level_for("reqwest", log::LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(fern::log_file(log_file)?)
        .apply()?;
    Ok(())
}

fn level_filter(production: bool) -> log::LevelFilter {
    if production {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Debug
    }
}

pub fn middleware(console_logging_enabled: bool) -> LoggerMiddleware {
    LoggerMiddleware::new(console_logging_enabled)
}
