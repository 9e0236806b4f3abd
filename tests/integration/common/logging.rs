//! Test logging initialization
//!
//! Uses `std::sync::Once` so the logger is installed once per test binary.
//! The level comes from `LOG_LEVEL` and defaults to `warn`.

use simplelog::{Config, LevelFilter, TestLogger};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Warn);
        let _ = TestLogger::init(level, Config::default());
    });
}
