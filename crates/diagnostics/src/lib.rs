//! Lightweight structured logging for the kvfs workspace.
//!
//! Usage:
//! - Set KVFS_LOG=off (default) - no logs
//! - Set KVFS_LOG=info - basic operation logs
//! - Set KVFS_LOG=debug - detailed diagnostic logs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the KVFS_LOG environment variable.
///
/// Call once at startup. Safe to call multiple times - subsequent calls
/// are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("KVFS_LOG").unwrap_or_else(|_| "off".to_string());

        let rt = match log_level.as_str() {
            "off" => return,
            "debug" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Debug))
                .init(),
            "info" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Info))
                .init(),
            "warn" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Warn))
                .init(),
            "error" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Error))
                .init(),
            _ => {
                let rt = emit::setup()
                    .emit_to(emit_term::stderr())
                    .emit_when(emit::level::min_filter(emit::Level::Info))
                    .init();
                eprintln!("Warning: Unknown KVFS_LOG value '{}', using 'info'", log_level);
                rt
            }
        };

        // The emit runtime must live for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Log basic operations (listings, marker creation, store transactions).
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (entry counts, per-segment walk steps).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable conditions (skipped backfills, lost create races).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that prevent an operation from completing.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
