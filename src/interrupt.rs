//! SIGINT/SIGTERM handling during a rewrite.
//!
//! While an [`InterruptGuard`] is alive the signals no longer terminate the
//! process. They raise an [`Interrupt`] flag instead, which the rewriter
//! checks between files and before committing. The run then returns
//! [`TrustError::Interrupted`] and its staged temporary files are removed
//! when the transaction is dropped.

use crate::error::{Result, TrustError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Shared "stop before committing" flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(TrustError::Interrupted)` once the flag has been raised.
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(TrustError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Routes SIGINT and SIGTERM to an [`Interrupt`] until dropped.
pub struct InterruptGuard {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: Option<std::thread::JoinHandle<()>>,
}

impl InterruptGuard {
    #[cfg(unix)]
    pub fn install(interrupt: &Interrupt) -> Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(|e| {
            TrustError::IoError(format!("failed to register signal handlers: {}", e))
        })?;
        let handle = signals.handle();
        let flag = interrupt.clone();
        let thread = std::thread::spawn(move || {
            for _ in signals.forever() {
                flag.raise();
            }
        });

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    #[cfg(not(unix))]
    pub fn install(_interrupt: &Interrupt) -> Result<Self> {
        Ok(Self {})
    }
}

impl Drop for InterruptGuard {
    #[cfg(unix)]
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    #[cfg(not(unix))]
    fn drop(&mut self) {}
}
