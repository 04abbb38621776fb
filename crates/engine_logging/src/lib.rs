#![deny(missing_docs)]
//! Shared logging utilities for the attachment downloader workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.
//!
//! Every macro accepts an optional `region = <index>;` prefix. Messages logged
//! that way carry a `[region N]` tag so interleaved jobs from several regions
//! stay readable in one log.

/// Formats the tag prepended to region-scoped messages.
pub fn region_tag(region: usize) -> String {
    format!("[region {region}]")
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    (region = $region:expr; $($arg:tt)*) => {{
        log::trace!("{} {}", $crate::region_tag($region), format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    (region = $region:expr; $($arg:tt)*) => {{
        log::info!("{} {}", $crate::region_tag($region), format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    (region = $region:expr; $($arg:tt)*) => {{
        log::debug!("{} {}", $crate::region_tag($region), format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    (region = $region:expr; $($arg:tt)*) => {{
        log::warn!("{} {}", $crate::region_tag($region), format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    (region = $region:expr; $($arg:tt)*) => {{
        log::error!("{} {}", $crate::region_tag($region), format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
