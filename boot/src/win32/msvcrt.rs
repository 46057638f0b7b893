//! Pre-UCRT runtime: the combined main-args hook.

use core::ffi::{c_char, c_int};

use crtstart_abi::{LegacyMainArgs, LegacyStartupInfo, Narrow, TextPtr, TextVec, Wide};

#[link(name = "msvcrt")]
unsafe extern "C" {
    fn __getmainargs(
        argc: *mut c_int,
        argv: *mut *mut *mut c_char,
        envp: *mut *mut *mut c_char,
        glob: c_int,
        info: *mut LegacyStartupInfo,
    ) -> c_int;
    fn __wgetmainargs(
        argc: *mut c_int,
        argv: *mut *mut *mut u16,
        envp: *mut *mut *mut u16,
        glob: c_int,
        info: *mut LegacyStartupInfo,
    ) -> c_int;
}

#[link(name = "kernel32")]
unsafe extern "system" {
    fn GetCommandLineA() -> *mut c_char;
    fn GetCommandLineW() -> *mut u16;
}

pub struct Msvcrt;

impl LegacyMainArgs<Narrow> for Msvcrt {
    fn get_main_args(
        &self,
        argc: &mut c_int,
        argv: &mut TextVec<Narrow>,
        envp: &mut TextVec<Narrow>,
        glob: c_int,
        info: &mut LegacyStartupInfo,
    ) -> c_int {
        unsafe { __getmainargs(argc, argv, envp, glob, info) }
    }

    fn command_line(&self) -> TextPtr<Narrow> {
        unsafe { GetCommandLineA() }
    }
}

impl LegacyMainArgs<Wide> for Msvcrt {
    fn get_main_args(
        &self,
        argc: &mut c_int,
        argv: &mut TextVec<Wide>,
        envp: &mut TextVec<Wide>,
        glob: c_int,
        info: &mut LegacyStartupInfo,
    ) -> c_int {
        unsafe { __wgetmainargs(argc, argv, envp, glob, info) }
    }

    fn command_line(&self) -> TextPtr<Wide> {
        unsafe { GetCommandLineW() }
    }
}
