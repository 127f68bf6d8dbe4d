use std::str::FromStr;
use tracing::Level;

/// Installs the JSON formatter used by every function.
pub fn init(max_level: Level) {
    tracing_subscriber::fmt()
        .json()
        .with_max_level(max_level)
        .with_current_span(false)
        .with_span_list(false)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_line_number(true)
        .init();
}

/// Parses a level name such as `debug`, falling back to INFO.
pub fn level_or_info(name: Option<&str>) -> Level {
    name.and_then(|name| Level::from_str(name.trim()).ok())
        .unwrap_or(Level::INFO)
}
