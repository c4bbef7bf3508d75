use std::io::Write;

use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

/// Env var with an env_logger filter spec that overrides `-v`.
pub const LOG_ENV: &str = "GIT_AI_LOG";

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error, // default: only errors
        1 => LevelFilter::Info,  // -v: info and up
        2 => LevelFilter::Debug, // -vv: debug and up
        _ => LevelFilter::Trace, // -vvv: trace and up
    }
}

pub fn init_logger(verbosity: u8) {
    let mut builder = Builder::new();
    // dependencies (reqwest, hyper) stay quiet unless asked for via GIT_AI_LOG
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("git_ai", level_for(verbosity))
        .target(Target::Stderr)
        .parse_env(LOG_ENV);

    builder.format(|buf, record| {
        let level = record.level();

        let level_label = match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn  => "WARN ".yellow().bold(),
            Level::Info  => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        writeln!(buf, "{} {}", level_label, record.args())
    });

    builder.init();
}
