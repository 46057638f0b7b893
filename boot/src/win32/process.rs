//! kernel32 process services.

use core::ffi::{c_char, c_int, c_void};
use core::ptr;

use crtstart_abi::{HInstance, ImageType, ProcessServices, StartupFlags, StartupInfo};

/// `STARTUPINFOA` as `GetStartupInfoA` fills it.
#[repr(C)]
#[allow(dead_code)]
struct RawStartupInfo {
    cb: u32,
    reserved: *mut c_char,
    desktop: *mut c_char,
    title: *mut c_char,
    x: u32,
    y: u32,
    x_size: u32,
    y_size: u32,
    x_count_chars: u32,
    y_count_chars: u32,
    fill_attribute: u32,
    flags: u32,
    show_window: u16,
    reserved2_len: u16,
    reserved2: *mut u8,
    std_input: *mut c_void,
    std_output: *mut c_void,
    std_error: *mut c_void,
}

impl RawStartupInfo {
    const fn zeroed() -> Self {
        Self {
            cb: core::mem::size_of::<Self>() as u32,
            reserved: ptr::null_mut(),
            desktop: ptr::null_mut(),
            title: ptr::null_mut(),
            x: 0,
            y: 0,
            x_size: 0,
            y_size: 0,
            x_count_chars: 0,
            y_count_chars: 0,
            fill_attribute: 0,
            flags: 0,
            show_window: 0,
            reserved2_len: 0,
            reserved2: ptr::null_mut(),
            std_input: ptr::null_mut(),
            std_output: ptr::null_mut(),
            std_error: ptr::null_mut(),
        }
    }
}

#[link(name = "kernel32")]
unsafe extern "system" {
    fn GetStartupInfoA(info: *mut RawStartupInfo);
    fn ExitProcess(code: u32) -> !;
}

unsafe extern "C" {
    /// Linker-synthesized symbol at the image load base.
    static __ImageBase: u8;
}

#[cfg_attr(not(feature = "legacy-msvcrt"), link(name = "ucrt"))]
#[cfg_attr(feature = "legacy-msvcrt", link(name = "msvcrt"))]
unsafe extern "C" {
    #[cfg_attr(not(feature = "legacy-msvcrt"), link_name = "_set_app_type")]
    #[cfg_attr(feature = "legacy-msvcrt", link_name = "__set_app_type")]
    fn crt_set_app_type(app_type: c_int);
}

pub struct Win32Process;

impl ProcessServices for Win32Process {
    fn set_app_type(&self, image: ImageType) {
        unsafe { crt_set_app_type(image.as_c_int()) }
    }

    fn startup_info(&self) -> StartupInfo {
        let mut raw = RawStartupInfo::zeroed();
        unsafe { GetStartupInfoA(&mut raw) };
        StartupInfo::new(StartupFlags::from_bits_retain(raw.flags), raw.show_window)
    }

    fn image_base(&self) -> HInstance {
        (&raw const __ImageBase) as HInstance
    }

    fn exit_process(&self, code: c_int) -> ! {
        unsafe { ExitProcess(code as u32) }
    }
}
