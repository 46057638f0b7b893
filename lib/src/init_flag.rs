//! One-shot and toggling atomic flags for startup bookkeeping.
//!
//! `InitFlag` answers "has this happened yet?" and only ever moves from unset
//! to set outside of tests. `StateFlag` answers "is this live right now?" and
//! toggles, e.g. whether a library image currently has constructed globals.

use core::sync::atomic::{AtomicBool, Ordering};

/// Monotonic init-once flag.
///
/// ```ignore
/// static PROCESS_STARTED: InitFlag = InitFlag::new();
///
/// if !PROCESS_STARTED.init_once() {
///     // entry reached twice
/// }
/// ```
#[repr(transparent)]
pub struct InitFlag {
    flag: AtomicBool,
}

impl InitFlag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Returns `true` for exactly one caller: the one that set the flag.
    #[inline]
    pub fn init_once(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    /// Uses `Acquire` so side effects published before the flag was set are
    /// visible.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// For guards that do not read anything the initializer wrote.
    #[inline]
    pub fn is_set_relaxed(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn mark_set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Only for tests and subsystems that support re-initialization.
    #[inline]
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Default for InitFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Toggling "currently active" flag.
#[repr(transparent)]
pub struct StateFlag {
    flag: AtomicBool,
}

impl StateFlag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Returns `true` if this call moved the flag from inactive to active.
    #[inline]
    pub fn enter(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn leave(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Clears the flag, returning whether it was active.
    #[inline]
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

impl Default for StateFlag {
    fn default() -> Self {
        Self::new()
    }
}
