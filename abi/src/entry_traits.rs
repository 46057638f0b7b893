//! User entry contracts.
//!
//! Console and windowed entries are implemented for plain closures so a host
//! can hand `main`/`WinMain` style functions straight to the dispatcher.

use core::ffi::{c_int, c_void};

use crate::attach::{AttachReasonCode, HInstance};
use crate::image::{CharWidth, TextPtr, TextVec};

/// `main(argc, argv, envp)` / `wmain(...)`.
pub trait ConsoleEntry<W: CharWidth> {
    fn main(&mut self, argc: c_int, argv: TextVec<W>, envp: TextVec<W>) -> c_int;
}

impl<W, F> ConsoleEntry<W> for F
where
    W: CharWidth,
    F: FnMut(c_int, TextVec<W>, TextVec<W>) -> c_int,
{
    fn main(&mut self, argc: c_int, argv: TextVec<W>, envp: TextVec<W>) -> c_int {
        self(argc, argv, envp)
    }
}

/// `WinMain(instance, prev_instance, command_line, show)` / `wWinMain(...)`.
///
/// `prev_instance` is always null.
pub trait WindowedEntry<W: CharWidth> {
    fn win_main(
        &mut self,
        instance: HInstance,
        prev_instance: HInstance,
        command_line: TextPtr<W>,
        show: c_int,
    ) -> c_int;
}

impl<W, F> WindowedEntry<W> for F
where
    W: CharWidth,
    F: FnMut(HInstance, HInstance, TextPtr<W>, c_int) -> c_int,
{
    fn win_main(
        &mut self,
        instance: HInstance,
        prev_instance: HInstance,
        command_line: TextPtr<W>,
        show: c_int,
    ) -> c_int {
        self(instance, prev_instance, command_line, show)
    }
}

/// `DllMain(instance, reason, reserved)`.
///
/// Images that have nothing to do on attach/detach keep the default, which
/// reports success for every event.
pub trait LibraryEntry {
    fn dll_main(
        &mut self,
        instance: HInstance,
        reason: AttachReasonCode,
        reserved: *mut c_void,
    ) -> bool {
        let _ = (instance, reason, reserved);
        true
    }
}

/// Handler used when the image supplies none of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLibraryEntry;

impl LibraryEntry for DefaultLibraryEntry {}

/// Adapts a plain function with the `DllMain` shape.
pub struct LibraryFn<F>(pub F);

impl<F> LibraryEntry for LibraryFn<F>
where
    F: FnMut(HInstance, AttachReasonCode, *mut c_void) -> bool,
{
    fn dll_main(
        &mut self,
        instance: HInstance,
        reason: AttachReasonCode,
        reserved: *mut c_void,
    ) -> bool {
        (self.0)(instance, reason, reserved)
    }
}
