//! Library attach/detach dispatch.
//!
//! Unlike an executable, a library image never owns the process lifetime:
//! the host loader delivers events and gets a boolean back.
//! - process attach: construct, then ask the handler
//! - process detach, or an attach the handler refused: tear down
//! - thread attach/detach and unknown reasons: forward only

use core::ffi::c_void;

use crtstart_abi::{AttachReason, AttachReasonCode, DeferredFinalizers, HInstance, LibraryEntry};
use crtstart_lib::{StateFlag, klog_debug, klog_warn};

use crate::initterm::{CrtTables, run_constructors, run_terminators};

pub struct LibraryImage<'a, F: DeferredFinalizers + ?Sized> {
    tables: &'a CrtTables,
    finalizers: &'a F,
    constructed: StateFlag,
}

impl<'a, F: DeferredFinalizers + ?Sized> LibraryImage<'a, F> {
    pub const fn new(tables: &'a CrtTables, finalizers: &'a F) -> Self {
        Self {
            tables,
            finalizers,
            constructed: StateFlag::new(),
        }
    }

    /// Whether constructors have run without a matching teardown.
    pub fn is_constructed(&self) -> bool {
        self.constructed.is_active()
    }

    /// Handle one loader notification and return the handler's verdict.
    pub fn dispatch<H>(
        &self,
        handler: &mut H,
        instance: HInstance,
        reason: AttachReasonCode,
        reserved: *mut c_void,
    ) -> bool
    where
        H: LibraryEntry + ?Sized,
    {
        let event = AttachReason::from_raw(reason);

        if event == Some(AttachReason::ProcessAttach) {
            run_constructors(self.tables);
            if !self.constructed.enter() {
                klog_warn!("[crt:dll] process attach while already constructed");
            }
        }

        let accepted = handler.dll_main(instance, reason, reserved);

        match event {
            Some(AttachReason::ProcessDetach) => self.teardown("process_detach"),
            Some(AttachReason::ProcessAttach) if !accepted => {
                klog_debug!("[crt:dll] attach refused by handler");
                self.teardown("attach_refused");
            }
            Some(other) => {
                klog_debug!(
                    "[crt:dll] {} ({}) forwarded ({})",
                    other.name(),
                    other.as_raw(),
                    accepted
                );
            }
            None => {
                klog_debug!("[crt:dll] unknown reason {} forwarded", reason);
            }
        }

        accepted
    }

    fn teardown(&self, why: &str) {
        if !self.constructed.take() {
            klog_warn!("[crt:dll] teardown ({}) without live constructors", why);
        }
        run_terminators(self.tables, self.finalizers);
    }
}
