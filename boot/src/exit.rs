//! Process-wide deferred finalizers.
//!
//! Every image links one registry. Executables drain it during teardown
//! before the pre-terminate table; libraries drain it on process detach.
//! C code reaches the same registry through `crt_atexit`/`crt_onexit`, which
//! the Windows bindings export as `atexit` and `_onexit`.

use core::ffi::c_int;

use crtstart_lib::{AtExitError, AtExitFn, AtExitRegistry, OnExitFn, klog_warn};

pub static AT_EXIT: AtExitRegistry = AtExitRegistry::new();

/// Register `func` to run at orderly shutdown, newest first.
pub fn at_exit(func: AtExitFn) -> Result<(), AtExitError> {
    AT_EXIT.register(func).inspect_err(report_full)
}

/// C `atexit`: 0 on success, -1 when the registry is full.
pub extern "C" fn crt_atexit(func: AtExitFn) -> c_int {
    atexit_status(&AT_EXIT, func)
}

/// C `_onexit`: `func` back on success, null when the registry is full.
pub extern "C" fn crt_onexit(func: OnExitFn) -> Option<OnExitFn> {
    onexit_status(&AT_EXIT, func)
}

fn atexit_status(registry: &AtExitRegistry, func: AtExitFn) -> c_int {
    match registry.register(func) {
        Ok(()) => 0,
        Err(err) => {
            report_full(&err);
            -1
        }
    }
}

fn onexit_status(registry: &AtExitRegistry, func: OnExitFn) -> Option<OnExitFn> {
    match registry.register_onexit(func) {
        Ok(()) => Some(func),
        Err(err) => {
            report_full(&err);
            None
        }
    }
}

fn report_full(_: &AtExitError) {
    klog_warn!("[crt:exit] at_exit registry full");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use crtstart_lib::AT_EXIT_CAPACITY;

    extern "C" fn noop() {
        record("noop");
    }

    extern "C" fn noop_onexit() -> c_int {
        0
    }

    #[test]
    fn atexit_status_reports_minus_one_once_full() {
        let registry = AtExitRegistry::new();
        for _ in 0..AT_EXIT_CAPACITY {
            assert_eq!(atexit_status(&registry, noop), 0);
        }
        assert_eq!(atexit_status(&registry, noop), -1);
        assert_eq!(registry.len(), AT_EXIT_CAPACITY);
    }

    #[test]
    fn onexit_status_echoes_the_callback_until_full() {
        let registry = AtExitRegistry::new();
        for _ in 0..AT_EXIT_CAPACITY {
            assert!(onexit_status(&registry, noop_onexit).is_some());
        }
        assert!(onexit_status(&registry, noop_onexit).is_none());
    }
}
