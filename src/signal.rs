//! Signal handling for graceful shutdown.
//!
//! Centralized Ctrl+C handling: an `AtomicBool` flag shared across
//! threads signals when shutdown has been requested. The walker stops
//! enumerating, the hashing pool skips its remaining files, and the
//! run loop reports whatever was confirmed before the interrupt,
//! writes no export artifact, and exits with code 130 (128 + SIGINT).
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupescan::signal::install_handler;
//!
//! let handler = install_handler();
//!
//! // Check if shutdown was requested anywhere in your code
//! if handler.is_shutdown_requested() {
//!     // Render the partial report and stop
//! }
//!
//! // Get the flag to pass to worker threads
//! let shutdown_flag = handler.get_flag();
//! // Pass shutdown_flag to DuplicateFinder via ScanConfig
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Centralized shutdown handler for graceful application termination.
///
/// Wraps an `AtomicBool` flag that is set when a Ctrl+C signal is
/// received. The flag can be shared with worker threads to enable
/// coordinated shutdown; all access goes through atomic operations.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    /// The shared atomic flag indicating shutdown was requested.
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with the flag initially set to `false`.
    ///
    /// No signal hook is installed; use this directly when managing the
    /// flag manually (for example in tests), or [`install_handler`] to
    /// also hook Ctrl+C.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    ///
    /// Sets the flag to `true`, which will be observed by any code
    /// checking `is_shutdown_requested()` or holding `get_flag()`.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shutdown flag for passing to worker threads.
    ///
    /// This is the primary way to share the shutdown signal with
    /// `DuplicateFinder` and `Walker`.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the shutdown flag to `false`.
    ///
    /// Primarily useful when a handler is reused across test runs.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag on interrupt.
///
/// Call once, early in startup, before any long-running operation. The
/// process-wide handler is installed exactly once; later calls (and
/// calls racing another installer, as parallel tests do) get a reset
/// copy of the existing handler or an unhooked fallback that still
/// supports `request_shutdown()`. Installation therefore never fails.
///
/// When Ctrl+C is pressed:
/// 1. The shutdown flag is set to `true`
/// 2. "Interrupted. Cleaning up..." is printed to stderr
/// 3. Any code checking `is_shutdown_requested()` will see `true`
pub fn install_handler() -> ShutdownHandler {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return handler.clone();
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);

        // stderr is line-buffered, flush explicitly
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Cleaning up...");
        let _ = std::io::stderr().flush();

        log::info!("Shutdown signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            handler
        }
        Err(_) => {
            // Another caller won the race, or a hook was registered
            // elsewhere in the process
            if let Some(handler) = GLOBAL_HANDLER.get() {
                handler.reset();
                handler.clone()
            } else {
                log::debug!("Ctrl+C handler already registered, using unhooked handler");
                let fallback = ShutdownHandler::new();
                let _ = GLOBAL_HANDLER.set(fallback.clone());
                fallback
            }
        }
    }
}
