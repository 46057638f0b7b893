//! OS startup-info subset consumed by windowed images.

use core::ffi::c_int;

use bitflags::bitflags;

bitflags! {
    /// `STARTUPINFO.dwFlags` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StartupFlags: u32 {
        const USE_SHOW_WINDOW = 0x0000_0001;
        const USE_SIZE = 0x0000_0002;
        const USE_POSITION = 0x0000_0004;
        const USE_COUNT_CHARS = 0x0000_0008;
        const USE_FILL_ATTRIBUTE = 0x0000_0010;
        const RUN_FULL_SCREEN = 0x0000_0020;
        const FORCE_ON_FEEDBACK = 0x0000_0040;
        const FORCE_OFF_FEEDBACK = 0x0000_0080;
        const USE_STD_HANDLES = 0x0000_0100;
        const USE_HOTKEY = 0x0000_0200;
        const TITLE_IS_LINK_NAME = 0x0000_0800;
        const TITLE_IS_APP_ID = 0x0000_1000;
        const PREVENT_PINNING = 0x0000_2000;
        const UNTRUSTED_SOURCE = 0x0000_8000;
    }
}

/// Show-window command handed to a windowed entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ShowCommand(pub c_int);

impl ShowCommand {
    pub const HIDE: Self = Self(0);
    pub const SHOW_NORMAL: Self = Self(1);
    pub const SHOW_MINIMIZED: Self = Self(2);
    pub const SHOW_MAXIMIZED: Self = Self(3);
    pub const SHOW_NO_ACTIVATE: Self = Self(4);
    pub const SHOW: Self = Self(5);
    pub const MINIMIZE: Self = Self(6);
    pub const SHOW_MIN_NO_ACTIVE: Self = Self(7);
    pub const SHOW_NA: Self = Self(8);
    pub const RESTORE: Self = Self(9);
    /// Platform default, used when the creator did not ask for a mode.
    pub const SHOW_DEFAULT: Self = Self(10);
    pub const FORCE_MINIMIZE: Self = Self(11);

    #[inline]
    pub const fn raw(self) -> c_int {
        self.0
    }
}

/// The two startup-info fields the sequencer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartupInfo {
    pub flags: StartupFlags,
    pub show_window: u16,
}

impl StartupInfo {
    pub const fn new(flags: StartupFlags, show_window: u16) -> Self {
        Self { flags, show_window }
    }

    /// Show mode for the windowed entry: the creator's explicit request if
    /// `USE_SHOW_WINDOW` is set, `SHOW_DEFAULT` otherwise.
    pub fn show_command(&self) -> ShowCommand {
        if self.flags.contains(StartupFlags::USE_SHOW_WINDOW) {
            ShowCommand(self.show_window as c_int)
        } else {
            ShowCommand::SHOW_DEFAULT
        }
    }
}
