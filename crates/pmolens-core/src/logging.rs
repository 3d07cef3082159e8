#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature the usual macros are re-exported from `tracing`.
//! Without it, no-op macros with the same names are exported at the crate root
//! so call sites never need a `cfg`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

// The no-op bodies expand to `{}` so a call stays valid in expression
// position, e.g. as a match arm.
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {{}};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {{}};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_work_as_match_arms() {
        for level in 0..3 {
            let () = match level {
                0 => crate::debug!("debug arm"),
                1 => crate::warn!(level, "warn arm"),
                _ => crate::trace!(%level, "trace arm"),
            };
        }
    }
}
