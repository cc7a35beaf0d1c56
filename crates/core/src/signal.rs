//! Ctrl-C handling around blocking child processes
//!
//! The terminal delivers SIGINT to the whole foreground process group, so the
//! child and this process see it together. [`InterruptGuard`] records the
//! signal instead of letting it terminate us, which lets the caller report a
//! distinct exit status once the child has finished.

use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

// One guard at a time, so a dropping guard never restores the default
// disposition underneath another running child.
static GUARD_LOCK: Mutex<()> = Mutex::new(());

/// Records SIGINT while alive and restores the previous disposition on drop
pub struct InterruptGuard {
    #[cfg(unix)]
    previous: Option<nix::sys::signal::SigAction>,
    _lock: MutexGuard<'static, ()>,
}

#[cfg(unix)]
extern "C" fn record_interrupt(_sig: std::os::raw::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

impl InterruptGuard {
    /// Start recording Ctrl-C
    #[cfg(unix)]
    pub fn install() -> Result<Self> {
        use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

        let lock = GUARD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        INTERRUPTED.store(false, Ordering::SeqCst);

        let action = SigAction::new(
            SigHandler::Handler(record_interrupt),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );
        // SAFETY: the handler only stores to an atomic.
        let previous = unsafe { signal::sigaction(Signal::SIGINT, &action) }.map_err(|e| {
            crate::Error::process(format!("Failed to register SIGINT handler: {}", e))
        })?;

        Ok(Self {
            previous: Some(previous),
            _lock: lock,
        })
    }

    /// Start recording Ctrl-C
    #[cfg(not(unix))]
    pub fn install() -> Result<Self> {
        let lock = GUARD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        INTERRUPTED.store(false, Ordering::SeqCst);
        Ok(Self { _lock: lock })
    }

    /// Whether Ctrl-C arrived since the guard was installed
    pub fn interrupted(&self) -> bool {
        INTERRUPTED.load(Ordering::SeqCst)
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(previous) = self.previous.take() {
            // SAFETY: restores the disposition returned by the earlier sigaction call.
            if let Err(e) = unsafe {
                nix::sys::signal::sigaction(nix::sys::signal::Signal::SIGINT, &previous)
            } {
                tracing::warn!(error = %e, "failed to restore SIGINT handler");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_starts_clear() {
        let guard = InterruptGuard::install().unwrap();
        assert!(!guard.interrupted());
    }

    #[cfg(unix)]
    #[test]
    fn test_guard_records_sigint() {
        let guard = InterruptGuard::install().unwrap();
        nix::sys::signal::raise(nix::sys::signal::Signal::SIGINT).unwrap();
        assert!(guard.interrupted());
    }
}
