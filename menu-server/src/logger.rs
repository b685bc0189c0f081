//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise `menu_server` and `tower_http` log at
//! the configured level. With a log directory, output goes to a daily rolling
//! file instead of stdout. The directory is created when missing.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub fn init_logger(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.log_level;
        format!("menu_server={level},tower_http={level}").into()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let file_appender = config
        .log_dir
        .as_deref()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| tracing_appender::rolling::daily(dir, "menu-server"));

    match (file_appender, config.log_json) {
        (Some(appender), true) => builder.json().with_writer(appender).with_ansi(false).init(),
        (Some(appender), false) => builder.with_writer(appender).with_ansi(false).init(),
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
}
