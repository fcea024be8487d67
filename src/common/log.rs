//! Logging setup emitting JSON lines through the `log` facade.

use std::io::Write;

use log::{Level, LevelFilter};
use serde_json::json;

use crate::common::error::DispatchCode;

/// Install the process logger. Later calls are ignored so tests and hosts
/// may both call this.
pub fn init(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            let line = json!({
                "ts": chrono::Utc::now().timestamp_millis(),
                "level": record.level().as_str(),
                "mod": record.target(),
                "msg": record.args().to_string(),
            });
            writeln!(buf, "{line}")
        })
        .try_init();
}

/// Emit an operation event matching the documented schema.
pub fn event(module: &str, event: &str, code: DispatchCode, dur_ms: u128) {
    let level = if code == DispatchCode::Ok {
        Level::Info
    } else {
        Level::Warn
    };
    log::log!(
        target: module,
        level,
        "ev={event} code={} dur_ms={dur_ms}",
        code as u32
    );
}
