//! Host boundary traits - what the sequencer consumes from the platform.
//!
//! These traits are defined in `abi` (no dependencies) so that:
//! - `boot` can sequence startup without naming a concrete platform
//! - `boot`'s Windows bindings implement them over kernel32 and the C runtime
//! - tests implement them with recording fakes
//!
//! Methods mirror the underlying calls one-to-one, including their C status
//! conventions, so the materializer owns every decision about failure.

use core::ffi::c_int;

use crate::attach::HInstance;
use crate::image::{ArgvMode, CharWidth, ImageType, TextPtr, TextVec};
use crate::startup_info::StartupInfo;

/// Process-level services available before any runtime initialization.
pub trait ProcessServices {
    /// Register the application subsystem type with the OS.
    fn set_app_type(&self, image: ImageType);

    /// Startup-info block the creating process supplied.
    fn startup_info(&self) -> StartupInfo;

    /// Instance handle of the running image (its load base).
    fn image_base(&self) -> HInstance;

    /// Terminate the process. Never returns.
    fn exit_process(&self, code: c_int) -> !;
}

/// Runner for finalizers registered at runtime (at-exit style).
pub trait DeferredFinalizers {
    /// Run every registered finalizer once, most recent first.
    fn drain(&self);
}

/// Mode-carrying struct handed to the legacy hook. Always zeroed.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyStartupInfo {
    pub mode: c_int,
}

/// Legacy runtime: one combined call fills argc, argv and envp.
pub trait LegacyMainArgs<W: CharWidth> {
    /// Returns 0 on success. Any other value means the environment could not
    /// be constructed.
    fn get_main_args(
        &self,
        argc: &mut c_int,
        argv: &mut TextVec<W>,
        envp: &mut TextVec<W>,
        glob: c_int,
        info: &mut LegacyStartupInfo,
    ) -> c_int;

    /// Raw process command line as the OS recorded it.
    fn command_line(&self) -> TextPtr<W>;
}

/// Modern runtime: independent configure / initialize / fetch calls.
///
/// Each call assumes the previous ones succeeded.
pub trait ModernMainArgs<W: CharWidth> {
    /// Returns 0 on success.
    fn configure_argv(&self, mode: ArgvMode) -> c_int;

    /// Returns 0 on success.
    fn initialize_environment(&self) -> c_int;

    /// Null when the environment block is unavailable.
    fn initial_environment(&self) -> TextVec<W>;

    /// Command line with the program name stripped. Null on failure.
    fn winmain_command_line(&self) -> TextPtr<W>;

    /// argc/argv as populated by `configure_argv`.
    fn arguments(&self) -> (c_int, TextVec<W>);
}
