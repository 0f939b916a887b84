//! Ctrl+C handling.
//!
//! One `AtomicBool` is shared between the signal handler and every loop
//! that touches the filesystem: collection, hashing and deletion check it
//! between files and stop with an `Interrupted` outcome. The run log is then
//! flushed and the process exits with status 0.
//!
//! The confirmation prompt blocks on stdin, where nothing polls the flag.
//! While a [`PromptGuard`] is alive an interrupt exits the process directly.
//!
//! ```rust,no_run
//! use dupsweep::signal::install_handler;
//!
//! let interrupt = install_handler().expect("Failed to install signal handler");
//! let flag = interrupt.flag();
//! // Hand `flag` to the Collector, DuplicateFinder and DeleteConfig.
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared interrupt flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
    hooked: bool,
}

impl Interrupt {
    /// A flag that is not hooked to any signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C raises this flag.
    #[must_use]
    pub fn is_hooked(&self) -> bool {
        self.hooked
    }

    /// Whether the flag has been raised.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag as if Ctrl+C had been pressed.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Lower the flag for a new run.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// The underlying flag, for components that poll it.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// The OS refused the Ctrl+C hook.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static INSTALLED: Mutex<Option<Interrupt>> = Mutex::new(None);
static EXIT_NOW: AtomicBool = AtomicBool::new(false);

/// Install the process-wide Ctrl+C handler.
///
/// The OS hook is registered once. Later calls (several runs in one test
/// binary, for instance) get the same flag back, cleared.
///
/// If another component already owns the Ctrl+C hook, the returned flag is
/// not hooked (see [`Interrupt::is_hooked`]) and a warning is logged: the
/// run then can't be cancelled between files.
///
/// # Errors
///
/// Returns `InstallFailed` if the hook can't be registered.
pub fn install_handler() -> Result<Interrupt, SignalError> {
    let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(ref interrupt) = *installed {
        interrupt.clear();
        return Ok(interrupt.clone());
    }

    let mut interrupt = Interrupt::new();
    let flag = interrupt.flag();
    let result = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupt signal received");
        let _ = stderr.flush();
        if EXIT_NOW.load(Ordering::SeqCst) {
            std::process::exit(0);
        }
    });

    match result {
        Ok(()) => interrupt.hooked = true,
        Err(ctrlc::Error::MultipleHandlers) => {
            log::warn!("Ctrl+C is handled elsewhere; this run can't be interrupted cleanly");
        }
        Err(e) => return Err(e.into()),
    }
    *installed = Some(interrupt.clone());
    Ok(interrupt)
}

/// While alive, Ctrl+C exits the process with status 0.
///
/// Flush anything worth keeping before creating one.
#[derive(Debug)]
pub struct PromptGuard(());

impl PromptGuard {
    /// Switch Ctrl+C to exit-now until the guard is dropped.
    #[must_use]
    pub fn new() -> Self {
        EXIT_NOW.store(true, Ordering::SeqCst);
        Self(())
    }
}

impl Default for PromptGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        EXIT_NOW.store(false, Ordering::SeqCst);
    }
}
