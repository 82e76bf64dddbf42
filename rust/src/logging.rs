//! Verbosity-gated diagnostics for the planner, written to stderr.
//!
//! Nothing is formatted when the configured verbosity is below a message's level.
//! Levels:
//! - 0: SILENT (nothing)
//! - 1: CHANGES (jobs placed, cursor anchored)
//! - 2: CHECKS (skipped days, safety cap hits)
//! - 3: DEBUG (per-shift capacity consumption)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Whether a message at `level` is emitted under `verbosity`.
#[inline]
pub fn enabled(verbosity: u8, level: u8) -> bool {
    level > VERBOSITY_SILENT && verbosity >= level
}

/// Job placements and anchor resolution.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $crate::logging::enabled($verbosity, $crate::logging::VERBOSITY_CHANGES) {
            eprintln!("[shiftplan] {}", format_args!($($arg)*));
        }
    };
}

/// Non-working days, days without shifts, exhausted limits.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $crate::logging::enabled($verbosity, $crate::logging::VERBOSITY_CHECKS) {
            eprintln!("[shiftplan] {}", format_args!($($arg)*));
        }
    };
}

/// Shift-by-shift simulation steps.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $crate::logging::enabled($verbosity, $crate::logging::VERBOSITY_DEBUG) {
            eprintln!("[shiftplan] {}", format_args!($($arg)*));
        }
    };
}
