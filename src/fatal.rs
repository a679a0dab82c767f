//! Process termination capability
//!
//! Only the `/chaos/crash` handler holds a reference to this. Nothing else in
//! the crate can end the process.

/// Terminates the process without unwinding
pub trait FatalAbort: Send + Sync {
    fn abort(&self, reason: &str) -> !;
}

/// Aborts the real process; no response is sent and no destructors run
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessAbort;

impl FatalAbort for ProcessAbort {
    fn abort(&self, reason: &str) -> ! {
        tracing::error!(reason, "Aborting process");
        std::process::abort()
    }
}
