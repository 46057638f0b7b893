//! Exported `*CRTStartup` symbols.
//!
//! Exactly one of these is compiled, picked by the image and width
//! features. Each hands the user's `main`/`WinMain`/`DllMain` to the
//! matching dispatcher.

#[cfg(not(any(feature = "library", feature = "wide")))]
use core::ffi::c_char;
use core::ffi::c_int;
#[cfg(feature = "library")]
use core::ffi::c_void;

#[cfg(any(feature = "windowed", feature = "library"))]
use crtstart_abi::HInstance;
#[cfg(feature = "library")]
use crtstart_abi::{AttachReasonCode, DefaultLibraryEntry, LibraryEntry, LibraryFn};
#[cfg(not(feature = "library"))]
use crtstart_abi::{ProcessServices, STARTUP_FAILURE_EXIT_CODE};
use crtstart_lib::{AtExitFn, AtExitRegistry, OnExitFn};
#[cfg(not(feature = "library"))]
use crtstart_lib::{InitFlag, klog_error};

#[cfg(feature = "library")]
use super::LINKED_TABLES;
use crate::exit::{AT_EXIT, crt_atexit, crt_onexit};

#[cfg(not(feature = "library"))]
mod executable {
    use super::*;
    use crate::dispatch::Bootstrap;
    use crate::initterm::CrtTables;
    use crate::selector::{SELECTED_CONFIG, SelectedWidth};
    use crate::win32::Win32Process;

    #[cfg(feature = "legacy-msvcrt")]
    type Runtime = crate::win32::Msvcrt;
    #[cfg(not(feature = "legacy-msvcrt"))]
    type Runtime = crate::win32::Ucrt;

    #[cfg(feature = "legacy-msvcrt")]
    type Source = crate::materialize::LegacyArgs<'static, Runtime>;
    #[cfg(not(feature = "legacy-msvcrt"))]
    type Source = crate::materialize::ModernArgs<'static, Runtime>;

    static PROCESS: Win32Process = Win32Process;
    #[cfg(feature = "legacy-msvcrt")]
    static RUNTIME: Runtime = crate::win32::Msvcrt;
    #[cfg(not(feature = "legacy-msvcrt"))]
    static RUNTIME: Runtime = crate::win32::Ucrt;

    static PROCESS_STARTED: InitFlag = InitFlag::new();

    pub(super) fn bootstrap()
    -> Bootstrap<'static, SelectedWidth, Win32Process, Source, AtExitRegistry> {
        if !PROCESS_STARTED.init_once() {
            klog_error!("[crt:entry] startup entry reached twice");
            PROCESS.exit_process(STARTUP_FAILURE_EXIT_CODE);
        }
        Bootstrap::new(
            CrtTables::linked(),
            &PROCESS,
            Source::new(&RUNTIME),
            &AT_EXIT,
            SELECTED_CONFIG,
        )
    }
}

#[cfg(not(feature = "library"))]
use executable::bootstrap;

// =============================================================================
// Deferred finalizers
// =============================================================================

/// C `atexit`, backed by the image's registry.
#[unsafe(no_mangle)]
pub extern "C" fn atexit(func: AtExitFn) -> c_int {
    crt_atexit(func)
}

/// C `_onexit`, backed by the image's registry.
#[unsafe(no_mangle)]
pub extern "C" fn _onexit(func: OnExitFn) -> Option<OnExitFn> {
    crt_onexit(func)
}

// =============================================================================
// Console
// =============================================================================

#[cfg(all(feature = "console", not(feature = "wide")))]
unsafe extern "C" {
    fn main(argc: c_int, argv: *mut *mut c_char, envp: *mut *mut c_char) -> c_int;
}

#[cfg(all(feature = "console", not(feature = "wide")))]
#[unsafe(no_mangle)]
pub extern "C" fn mainCRTStartup() -> ! {
    let mut entry = |argc: c_int, argv: *mut *mut c_char, envp: *mut *mut c_char| unsafe {
        main(argc, argv, envp)
    };
    bootstrap().start_console(&mut entry)
}

#[cfg(all(feature = "console", feature = "wide"))]
unsafe extern "C" {
    fn wmain(argc: c_int, argv: *mut *mut u16, envp: *mut *mut u16) -> c_int;
}

#[cfg(all(feature = "console", feature = "wide"))]
#[unsafe(no_mangle)]
pub extern "C" fn wmainCRTStartup() -> ! {
    let mut entry =
        |argc: c_int, argv: *mut *mut u16, envp: *mut *mut u16| unsafe { wmain(argc, argv, envp) };
    bootstrap().start_console(&mut entry)
}

// =============================================================================
// Windowed
// =============================================================================

#[cfg(all(feature = "windowed", not(feature = "wide")))]
unsafe extern "system" {
    fn WinMain(
        instance: HInstance,
        prev_instance: HInstance,
        command_line: *mut c_char,
        show: c_int,
    ) -> c_int;
}

#[cfg(all(feature = "windowed", not(feature = "wide")))]
#[unsafe(no_mangle)]
pub extern "C" fn WinMainCRTStartup() -> ! {
    let mut entry =
        |instance: HInstance, prev: HInstance, command_line: *mut c_char, show: c_int| unsafe {
            WinMain(instance, prev, command_line, show)
        };
    bootstrap().start_windowed(&mut entry)
}

#[cfg(all(feature = "windowed", feature = "wide"))]
unsafe extern "system" {
    fn wWinMain(
        instance: HInstance,
        prev_instance: HInstance,
        command_line: *mut u16,
        show: c_int,
    ) -> c_int;
}

#[cfg(all(feature = "windowed", feature = "wide"))]
#[unsafe(no_mangle)]
pub extern "C" fn wWinMainCRTStartup() -> ! {
    let mut entry =
        |instance: HInstance, prev: HInstance, command_line: *mut u16, show: c_int| unsafe {
            wWinMain(instance, prev, command_line, show)
        };
    bootstrap().start_windowed(&mut entry)
}

// =============================================================================
// Library
// =============================================================================

#[cfg(feature = "library")]
static LIBRARY: crate::library::LibraryImage<'static, AtExitRegistry> =
    crate::library::LibraryImage::new(&LINKED_TABLES, &AT_EXIT);

#[cfg(feature = "library")]
unsafe extern "system" {
    fn DllMain(instance: HInstance, reason: AttachReasonCode, reserved: *mut c_void) -> i32;
}

#[cfg(feature = "library")]
#[unsafe(no_mangle)]
pub extern "system" fn _DllMainCRTStartup(
    instance: HInstance,
    reason: AttachReasonCode,
    reserved: *mut c_void,
) -> i32 {
    let mut handler = LibraryFn(
        |instance: HInstance, reason: AttachReasonCode, reserved: *mut c_void| unsafe {
            DllMain(instance, reason, reserved) != 0
        },
    );
    LIBRARY.dispatch(&mut handler, instance, reason, reserved) as i32
}

/// Fallback `DllMain` for images that do not define one.
#[cfg(feature = "library")]
#[unsafe(no_mangle)]
pub extern "system" fn __DefaultDllMain(
    instance: HInstance,
    reason: AttachReasonCode,
    reserved: *mut c_void,
) -> i32 {
    DefaultLibraryEntry.dll_main(instance, reason, reserved) as i32
}

#[cfg(all(feature = "library", target_env = "msvc", not(target_arch = "x86")))]
#[used]
#[unsafe(link_section = ".drectve")]
static DEFAULT_DLL_MAIN: [u8; 41] = *b" /alternatename:DllMain=__DefaultDllMain ";

#[cfg(all(feature = "library", target_env = "msvc", target_arch = "x86"))]
#[used]
#[unsafe(link_section = ".drectve")]
static DEFAULT_DLL_MAIN: [u8; 49] = *b" /alternatename:_DllMain@12=___DefaultDllMain@12 ";
