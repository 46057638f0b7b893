//! Deferred finalizer registry.
//!
//! Finalizers registered while the program runs are drained once at orderly
//! shutdown, most recent first, before the pre-terminate table. A finalizer
//! may register further finalizers; those run in the same drain.

use core::ffi::c_int;

use crtstart_abi::DeferredFinalizers;
use spin::Mutex;

/// Registrations the registry always accepts (the C library minimum).
pub const AT_EXIT_CAPACITY: usize = 32;

pub type AtExitFn = extern "C" fn();

/// `_onexit` callback shape. The return value is ignored.
pub type OnExitFn = extern "C" fn() -> c_int;

#[derive(Clone, Copy)]
enum Finalizer {
    AtExit(AtExitFn),
    OnExit(OnExitFn),
}

impl Finalizer {
    fn call(self) {
        match self {
            Finalizer::AtExit(func) => func(),
            Finalizer::OnExit(func) => {
                let _ = func();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtExitError {
    Full,
}

struct Slots {
    funcs: [Option<Finalizer>; AT_EXIT_CAPACITY],
    len: usize,
}

impl Slots {
    const fn new() -> Self {
        Self {
            funcs: [None; AT_EXIT_CAPACITY],
            len: 0,
        }
    }

    fn pop(&mut self) -> Option<Finalizer> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.funcs[self.len].take()
    }
}

pub struct AtExitRegistry {
    slots: Mutex<Slots>,
}

impl AtExitRegistry {
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(Slots::new()),
        }
    }

    pub fn register(&self, func: AtExitFn) -> Result<(), AtExitError> {
        self.push(Finalizer::AtExit(func))
    }

    /// Same as [`register`](Self::register) for `_onexit` style callbacks.
    pub fn register_onexit(&self, func: OnExitFn) -> Result<(), AtExitError> {
        self.push(Finalizer::OnExit(func))
    }

    fn push(&self, finalizer: Finalizer) -> Result<(), AtExitError> {
        let mut slots = self.slots.lock();
        if slots.len == AT_EXIT_CAPACITY {
            return Err(AtExitError::Full);
        }
        let idx = slots.len;
        slots.funcs[idx] = Some(finalizer);
        slots.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs and removes every registered finalizer, newest first. Returns how
    /// many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            // The lock is dropped before the call so finalizers can register.
            let next = self.slots.lock().pop();
            let Some(finalizer) = next else {
                break;
            };
            finalizer.call();
            ran += 1;
        }
        ran
    }
}

impl Default for AtExitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredFinalizers for AtExitRegistry {
    fn drain(&self) {
        let ran = self.run_all();
        crate::klog_debug!("[crt:exit] drained {} deferred finalizers", ran);
    }
}
