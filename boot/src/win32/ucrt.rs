//! Universal CRT argument and environment calls.

use core::ffi::{c_char, c_int};
use core::ptr;

use crtstart_abi::{ArgvMode, ModernMainArgs, Narrow, TextPtr, TextVec, Wide};

#[link(name = "ucrt")]
unsafe extern "C" {
    fn _configure_narrow_argv(mode: c_int) -> c_int;
    fn _configure_wide_argv(mode: c_int) -> c_int;
    fn _initialize_narrow_environment() -> c_int;
    fn _initialize_wide_environment() -> c_int;
    fn _get_initial_narrow_environment() -> *mut *mut c_char;
    fn _get_initial_wide_environment() -> *mut *mut u16;
    fn _get_narrow_winmain_command_line() -> *mut c_char;
    fn _get_wide_winmain_command_line() -> *mut u16;
    fn __p___argc() -> *mut c_int;
    fn __p___argv() -> *mut *mut *mut c_char;
    fn __p___wargv() -> *mut *mut *mut u16;
}

pub struct Ucrt;

/// Reads a runtime-owned global through its accessor, null-safe.
fn read_global<T: Copy>(slot: *mut T, fallback: T) -> T {
    if slot.is_null() {
        fallback
    } else {
        unsafe { *slot }
    }
}

impl ModernMainArgs<Narrow> for Ucrt {
    fn configure_argv(&self, mode: ArgvMode) -> c_int {
        unsafe { _configure_narrow_argv(mode.as_c_int()) }
    }

    fn initialize_environment(&self) -> c_int {
        unsafe { _initialize_narrow_environment() }
    }

    fn initial_environment(&self) -> TextVec<Narrow> {
        unsafe { _get_initial_narrow_environment() }
    }

    fn winmain_command_line(&self) -> TextPtr<Narrow> {
        unsafe { _get_narrow_winmain_command_line() }
    }

    fn arguments(&self) -> (c_int, TextVec<Narrow>) {
        let argc = read_global(unsafe { __p___argc() }, 0);
        let argv = read_global(unsafe { __p___argv() }, ptr::null_mut());
        (argc, argv)
    }
}

impl ModernMainArgs<Wide> for Ucrt {
    fn configure_argv(&self, mode: ArgvMode) -> c_int {
        unsafe { _configure_wide_argv(mode.as_c_int()) }
    }

    fn initialize_environment(&self) -> c_int {
        unsafe { _initialize_wide_environment() }
    }

    fn initial_environment(&self) -> TextVec<Wide> {
        unsafe { _get_initial_wide_environment() }
    }

    fn winmain_command_line(&self) -> TextPtr<Wide> {
        unsafe { _get_wide_winmain_command_line() }
    }

    fn arguments(&self) -> (c_int, TextVec<Wide>) {
        let argc = read_global(unsafe { __p___argc() }, 0);
        let argv = read_global(unsafe { __p___wargv() }, ptr::null_mut());
        (argc, argv)
    }
}
