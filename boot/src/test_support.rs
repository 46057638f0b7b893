//! Recording fakes for the host boundary.
//!
//! Every fake and every table callback appends to one per-thread event log,
//! so a test can assert on the global order of calls. Tests run on separate
//! threads, so logs never mix.

use core::cell::{Cell, RefCell};
use core::ffi::c_int;
use std::thread_local;
use std::vec::Vec;

use crtstart_abi::{
    ArgvMode, CharWidth, DeferredFinalizers, HInstance, ImageType, LegacyMainArgs,
    LegacyStartupInfo, ModernMainArgs, ProcessServices, StartupFlags, StartupInfo, TextPtr,
    TextVec,
};

thread_local! {
    static EVENTS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

pub fn record(event: &'static str) {
    EVENTS.with(|e| e.borrow_mut().push(event));
}

pub fn take_events() -> Vec<&'static str> {
    EVENTS.with(|e| core::mem::take(&mut *e.borrow_mut()))
}

pub fn count(events: &[&'static str], name: &str) -> usize {
    events.iter().filter(|e| **e == name).count()
}

pub const FAKE_ARGC: c_int = 3;
pub const FAKE_IMAGE_BASE: usize = 0x1_4000_0000;

pub fn fake_vec<W: CharWidth>(addr: usize) -> TextVec<W> {
    addr as TextVec<W>
}

pub fn fake_text<W: CharWidth>(addr: usize) -> TextPtr<W> {
    addr as TextPtr<W>
}

pub fn fake_argv<W: CharWidth>() -> TextVec<W> {
    fake_vec::<W>(0xa000)
}

pub fn fake_envp<W: CharWidth>() -> TextVec<W> {
    fake_vec::<W>(0xe000)
}

pub fn fake_command_line<W: CharWidth>() -> TextPtr<W> {
    fake_text::<W>(0xc000)
}

pub struct RecordingFinalizers;

impl DeferredFinalizers for RecordingFinalizers {
    fn drain(&self) {
        record("drain");
    }
}

pub struct FakeProcess {
    pub app_type: Cell<Option<ImageType>>,
    pub info: StartupInfo,
}

impl FakeProcess {
    pub fn new() -> Self {
        Self::with_startup_info(StartupInfo::default())
    }

    pub fn with_startup_info(info: StartupInfo) -> Self {
        Self {
            app_type: Cell::new(None),
            info,
        }
    }

    pub fn showing(show_window: u16) -> Self {
        Self::with_startup_info(StartupInfo::new(StartupFlags::USE_SHOW_WINDOW, show_window))
    }
}

impl ProcessServices for FakeProcess {
    fn set_app_type(&self, image: ImageType) {
        record("set_app_type");
        self.app_type.set(Some(image));
    }

    fn startup_info(&self) -> StartupInfo {
        record("startup_info");
        self.info
    }

    fn image_base(&self) -> HInstance {
        FAKE_IMAGE_BASE as HInstance
    }

    fn exit_process(&self, code: c_int) -> ! {
        record("exit_process");
        panic!("exit_process({code})");
    }
}

/// Which modern call should report failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModernFailure {
    None,
    Configure,
    InitEnvironment,
    GetEnvironment,
    CommandLine,
}

pub struct FakeUcrt {
    pub fail: ModernFailure,
    pub mode: Cell<Option<ArgvMode>>,
}

impl FakeUcrt {
    pub fn new() -> Self {
        Self::failing(ModernFailure::None)
    }

    pub fn failing(fail: ModernFailure) -> Self {
        Self {
            fail,
            mode: Cell::new(None),
        }
    }
}

impl<W: CharWidth> ModernMainArgs<W> for FakeUcrt {
    fn configure_argv(&self, mode: ArgvMode) -> c_int {
        record("configure_argv");
        self.mode.set(Some(mode));
        if self.fail == ModernFailure::Configure { -1 } else { 0 }
    }

    fn initialize_environment(&self) -> c_int {
        record("initialize_environment");
        if self.fail == ModernFailure::InitEnvironment { 1 } else { 0 }
    }

    fn initial_environment(&self) -> TextVec<W> {
        record("initial_environment");
        if self.fail == ModernFailure::GetEnvironment {
            core::ptr::null_mut()
        } else {
            fake_envp::<W>()
        }
    }

    fn winmain_command_line(&self) -> TextPtr<W> {
        record("winmain_command_line");
        if self.fail == ModernFailure::CommandLine {
            core::ptr::null_mut()
        } else {
            fake_command_line::<W>()
        }
    }

    fn arguments(&self) -> (c_int, TextVec<W>) {
        (FAKE_ARGC, fake_argv::<W>())
    }
}

pub struct FakeMsvcrt {
    pub status: c_int,
    pub seen_glob: Cell<Option<c_int>>,
    pub seen_info: Cell<Option<LegacyStartupInfo>>,
}

impl FakeMsvcrt {
    pub fn returning(status: c_int) -> Self {
        Self {
            status,
            seen_glob: Cell::new(None),
            seen_info: Cell::new(None),
        }
    }
}

impl<W: CharWidth> LegacyMainArgs<W> for FakeMsvcrt {
    fn get_main_args(
        &self,
        argc: &mut c_int,
        argv: &mut TextVec<W>,
        envp: &mut TextVec<W>,
        glob: c_int,
        info: &mut LegacyStartupInfo,
    ) -> c_int {
        record("get_main_args");
        self.seen_glob.set(Some(glob));
        self.seen_info.set(Some(*info));
        if self.status == 0 {
            *argc = FAKE_ARGC;
            *argv = fake_argv::<W>();
            *envp = fake_envp::<W>();
        }
        self.status
    }

    fn command_line(&self) -> TextPtr<W> {
        record("command_line");
        fake_command_line::<W>()
    }
}
