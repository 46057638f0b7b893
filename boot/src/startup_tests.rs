//! End-to-end startup and shutdown sequencing tests.
//!
//! These drive the dispatcher and the library image against recording fakes
//! and assert on the global order of events:
//! - constructor and teardown table ordering
//! - exit code threading and the single-entry guarantee
//! - configuration failure short-circuiting
//! - library attach/detach liveness rules

use core::ffi::{c_int, c_void};
use core::ptr;
use std::cell::Cell;

use crtstart_abi::{
    DLL_PROCESS_ATTACH, DLL_PROCESS_DETACH, DLL_THREAD_ATTACH, DLL_THREAD_DETACH,
    DefaultLibraryEntry, HInstance, ImageType, LibraryFn, Narrow, STARTUP_FAILURE_EXIT_CODE,
    ShowCommand, StartupError, StartupFlags, StartupInfo, TextPtr, TextVec, Wide,
};
use crtstart_lib::AtExitRegistry;

use crate::dispatch::{Bootstrap, DispatchState, Outcome};
use crate::initterm::{CallbackTable, CrtTables, TableSlot};
use crate::library::LibraryImage;
use crate::materialize::{LegacyArgs, ModernArgs};
use crate::selector::StartupConfig;
use crate::test_support::*;

// =============================================================================
// Tables
// =============================================================================

extern "C" fn c_init_0() {
    record("c_init_0");
}
extern "C" fn c_init_1() {
    record("c_init_1");
}
extern "C" fn cxx_init_0() {
    record("cxx_init_0");
}
extern "C" fn cxx_init_1() {
    record("cxx_init_1");
}
extern "C" fn pre_term_0() {
    record("pre_term_0");
}
extern "C" fn term_0() {
    record("term_0");
}
extern "C" fn term_1() {
    record("term_1");
}

static C_INIT: [TableSlot; 3] = [None, Some(c_init_0), Some(c_init_1)];
static CXX_INIT: [TableSlot; 2] = [Some(cxx_init_0), Some(cxx_init_1)];
static PRE_TERM: [TableSlot; 2] = [Some(pre_term_0), None];
static TERM: [TableSlot; 2] = [Some(term_0), Some(term_1)];

static TABLES: CrtTables = CrtTables {
    c_init: CallbackTable::from_slice(&C_INIT),
    cxx_init: CallbackTable::from_slice(&CXX_INIT),
    pre_terminate: CallbackTable::from_slice(&PRE_TERM),
    terminate: CallbackTable::from_slice(&TERM),
};

const CONSTRUCTION: [&str; 4] = ["c_init_0", "c_init_1", "cxx_init_0", "cxx_init_1"];
const TEARDOWN: [&str; 4] = ["drain", "pre_term_0", "term_0", "term_1"];

fn position(events: &[&'static str], name: &str) -> usize {
    events
        .iter()
        .position(|e| *e == name)
        .unwrap_or_else(|| panic!("{name} missing from {events:?}"))
}

fn assert_subsequence(events: &[&'static str], expected: &[&str]) {
    let mut last = None;
    for name in expected {
        let pos = position(events, name);
        if let Some(prev) = last {
            assert!(pos > prev, "{name} out of order in {events:?}");
        }
        last = Some(pos);
    }
}

// =============================================================================
// Console images
// =============================================================================

#[test]
fn console_modern_narrow_scenario_exits_zero_after_full_teardown() {
    let process = FakeProcess::new();
    let crt = FakeUcrt::new();
    let mut boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        ModernArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );

    let mut calls = 0;
    let mut entry = |argc: c_int, argv: TextVec<Narrow>, envp: TextVec<Narrow>| {
        record("main");
        calls += 1;
        assert_eq!(argc, FAKE_ARGC);
        assert_eq!(argv, fake_argv::<Narrow>());
        assert_eq!(envp, fake_envp::<Narrow>());
        0
    };
    let outcome = boot.run_console(&mut entry);

    assert_eq!(outcome, Outcome::Exited(0));
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(calls, 1);
    assert_eq!(boot.state(), DispatchState::TerminatorsRun);
    assert_eq!(process.app_type.get(), Some(ImageType::Console));

    let events = take_events();
    assert_eq!(events[0], "set_app_type");
    assert_subsequence(
        &events,
        &[
            "set_app_type",
            "configure_argv",
            "initialize_environment",
            "initial_environment",
        ],
    );
    assert_subsequence(&events, &["initial_environment", "c_init_0"]);
    assert_subsequence(&events, &CONSTRUCTION);
    assert_subsequence(&events, &["cxx_init_1", "main", "drain"]);
    assert_subsequence(&events, &TEARDOWN);
    for name in CONSTRUCTION.iter().chain(TEARDOWN.iter()) {
        assert_eq!(count(&events, name), 1, "{name} should run exactly once");
    }
}

#[test]
fn entry_return_value_becomes_the_exit_code_and_teardown_still_runs() {
    for code in [1, -1, 42, c_int::MAX] {
        let process = FakeProcess::new();
        let crt = FakeUcrt::new();
        let mut boot = Bootstrap::<Wide, _, _, _>::new(
            &TABLES,
            &process,
            ModernArgs::new(&crt),
            &RecordingFinalizers,
            StartupConfig::DEFAULT,
        );
        let mut entry = |_: c_int, _: TextVec<Wide>, _: TextVec<Wide>| code;
        assert_eq!(boot.run_console(&mut entry).exit_code(), code);

        let events = take_events();
        assert_subsequence(&events, &TEARDOWN);
    }
}

#[test]
fn console_legacy_failure_exits_without_running_user_code() {
    let process = FakeProcess::new();
    let crt = FakeMsvcrt::returning(1);
    let mut boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        LegacyArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );

    let mut entered = false;
    let mut entry = |_: c_int, _: TextVec<Narrow>, _: TextVec<Narrow>| {
        entered = true;
        0
    };
    let outcome = boot.run_console(&mut entry);

    assert!(!entered);
    assert_eq!(outcome, Outcome::ConfigurationFailed(StartupError::MainArgs));
    assert_eq!(outcome.exit_code(), STARTUP_FAILURE_EXIT_CODE);
    assert_eq!(boot.state(), DispatchState::TypeTagged);
    assert_eq!(take_events(), ["set_app_type", "get_main_args"]);
}

#[test]
#[should_panic(expected = "exit_process(255)")]
fn configuration_failure_requests_exit_with_the_sentinel() {
    let process = FakeProcess::new();
    let crt = FakeUcrt::failing(ModernFailure::InitEnvironment);
    let boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        ModernArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );
    let mut entry = |_: c_int, _: TextVec<Narrow>, _: TextVec<Narrow>| 0;
    boot.start_console(&mut entry);
}

#[test]
#[should_panic(expected = "exit_process(7)")]
fn start_console_hands_the_entry_result_to_exit_process() {
    let process = FakeProcess::new();
    let crt = FakeMsvcrt::returning(0);
    let boot = Bootstrap::<Wide, _, _, _>::new(
        &TABLES,
        &process,
        LegacyArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );
    let mut entry = |_: c_int, _: TextVec<Wide>, _: TextVec<Wide>| 7;
    boot.start_console(&mut entry);
}

#[test]
fn a_bootstrap_runs_the_user_entry_only_once() {
    let process = FakeProcess::new();
    let crt = FakeUcrt::new();
    let mut boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        ModernArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );

    let calls = Cell::new(0);
    let mut entry = |_: c_int, _: TextVec<Narrow>, _: TextVec<Narrow>| {
        calls.set(calls.get() + 1);
        5
    };
    assert_eq!(boot.run_console(&mut entry), Outcome::Exited(5));
    take_events();

    let again = boot.run_console(&mut entry);
    assert_eq!(again, Outcome::ConfigurationFailed(StartupError::Reentered));
    assert_eq!(calls.get(), 1);
    assert!(take_events().is_empty());
}

#[test]
fn registered_deferred_finalizers_drain_before_the_pre_terminate_table() {
    static REGISTRY: AtExitRegistry = AtExitRegistry::new();
    extern "C" fn registered_late() {
        record("at_exit");
    }

    let process = FakeProcess::new();
    let crt = FakeUcrt::new();
    let mut boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        ModernArgs::new(&crt),
        &REGISTRY,
        StartupConfig::DEFAULT,
    );
    let mut entry = |_: c_int, _: TextVec<Narrow>, _: TextVec<Narrow>| {
        REGISTRY.register(registered_late).unwrap();
        0
    };
    boot.run_console(&mut entry);

    let events = take_events();
    assert_subsequence(&events, &["at_exit", "pre_term_0", "term_0"]);
    assert!(REGISTRY.is_empty());
}

// The only test touching the process-wide registry.
#[test]
fn c_registrations_reach_the_process_registry_and_drain_in_teardown() {
    use crate::exit::{AT_EXIT, at_exit, crt_atexit, crt_onexit};

    extern "C" fn c_atexit() {
        record("c_atexit");
    }
    extern "C" fn c_onexit() -> c_int {
        record("c_onexit");
        0
    }
    extern "C" fn rust_at_exit() {
        record("rust_at_exit");
    }

    let process = FakeProcess::new();
    let crt = FakeUcrt::new();
    let mut boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        ModernArgs::new(&crt),
        &AT_EXIT,
        StartupConfig::DEFAULT,
    );
    let mut entry = |_: c_int, _: TextVec<Narrow>, _: TextVec<Narrow>| {
        assert_eq!(crt_atexit(c_atexit), 0);
        assert!(crt_onexit(c_onexit).is_some());
        at_exit(rust_at_exit).unwrap();
        0
    };
    assert_eq!(boot.run_console(&mut entry), Outcome::Exited(0));

    let events = take_events();
    assert_subsequence(
        &events,
        &["rust_at_exit", "c_onexit", "c_atexit", "pre_term_0", "term_0"],
    );
    assert!(AT_EXIT.is_empty());
}

// =============================================================================
// Windowed images
// =============================================================================

#[test]
fn windowed_entry_receives_image_base_null_prev_and_explicit_show_mode() {
    let process = FakeProcess::showing(ShowCommand::SHOW_MAXIMIZED.raw() as u16);
    let crt = FakeUcrt::new();
    let mut boot = Bootstrap::<Wide, _, _, _>::new(
        &TABLES,
        &process,
        ModernArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );

    let mut entry =
        |instance: HInstance, prev: HInstance, command_line: TextPtr<Wide>, show: c_int| {
            record("win_main");
            assert_eq!(instance as usize, FAKE_IMAGE_BASE);
            assert!(prev.is_null());
            assert_eq!(command_line, fake_command_line::<Wide>());
            assert_eq!(show, ShowCommand::SHOW_MAXIMIZED.raw());
            17
        };
    assert_eq!(boot.run_windowed(&mut entry), Outcome::Exited(17));
    assert_eq!(process.app_type.get(), Some(ImageType::Windowed));

    let events = take_events();
    assert_subsequence(&events, &["set_app_type", "winmain_command_line", "c_init_0"]);
    assert_subsequence(&events, &["cxx_init_1", "win_main", "drain", "pre_term_0"]);
}

#[test]
fn windowed_entry_gets_the_default_show_mode_without_an_explicit_request() {
    let process = FakeProcess::with_startup_info(StartupInfo::new(StartupFlags::USE_SIZE, 2));
    let crt = FakeMsvcrt::returning(0);
    let mut boot = Bootstrap::<Narrow, _, _, _>::new(
        &TABLES,
        &process,
        LegacyArgs::new(&crt),
        &RecordingFinalizers,
        StartupConfig::DEFAULT,
    );

    let mut seen = None;
    let mut entry = |_: HInstance, _: HInstance, _: TextPtr<Narrow>, show: c_int| {
        seen = Some(show);
        0
    };
    boot.run_windowed(&mut entry);
    assert_eq!(seen, Some(ShowCommand::SHOW_DEFAULT.raw()));
    take_events();
}

// =============================================================================
// Library images
// =============================================================================

fn recording_handler(
    accept_attach: bool,
) -> LibraryFn<impl FnMut(HInstance, u32, *mut c_void) -> bool> {
    LibraryFn(move |_: HInstance, reason: u32, _: *mut c_void| {
        record("dll_main");
        reason != DLL_PROCESS_ATTACH || accept_attach
    })
}

#[test]
fn library_attach_refused_tears_down_before_returning_false() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = recording_handler(false);

    let ok = image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_ATTACH, ptr::null_mut());

    assert!(!ok);
    assert!(!image.is_constructed());
    let events = take_events();
    assert_subsequence(&events, &CONSTRUCTION);
    assert_subsequence(&events, &["cxx_init_1", "dll_main", "drain"]);
    assert_subsequence(&events, &TEARDOWN);
    assert_eq!(count(&events, "term_1"), 1);
}

#[test]
fn detach_after_refused_attach_runs_teardown_again() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = recording_handler(false);
    assert!(!image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_ATTACH, ptr::null_mut()));
    take_events();

    // The loader still delivers detach to an image whose attach failed.
    assert!(image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_DETACH, ptr::null_mut()));
    assert!(!image.is_constructed());
    assert_eq!(
        take_events(),
        ["dll_main", "drain", "pre_term_0", "term_0", "term_1"]
    );
}

#[test]
fn library_attach_accepted_runs_no_teardown() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = recording_handler(true);

    assert!(image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_ATTACH, ptr::null_mut()));
    assert!(image.is_constructed());

    let events = take_events();
    assert_eq!(
        events,
        ["c_init_0", "c_init_1", "cxx_init_0", "cxx_init_1", "dll_main"]
    );
}

#[test]
fn library_detach_forwards_then_tears_down() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = recording_handler(true);
    image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_ATTACH, ptr::null_mut());
    take_events();

    assert!(image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_DETACH, ptr::null_mut()));
    assert!(!image.is_constructed());
    assert_eq!(
        take_events(),
        ["dll_main", "drain", "pre_term_0", "term_0", "term_1"]
    );
}

#[test]
fn thread_events_never_run_tables() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = recording_handler(true);
    image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_ATTACH, ptr::null_mut());
    take_events();

    for _ in 0..3 {
        for reason in [DLL_THREAD_ATTACH, DLL_THREAD_DETACH] {
            assert!(image.dispatch(&mut handler, ptr::null_mut(), reason, ptr::null_mut()));
        }
    }
    // Unknown reason codes are forwarded the same way.
    assert!(image.dispatch(&mut handler, ptr::null_mut(), 4, ptr::null_mut()));

    let events = take_events();
    assert_eq!(events.len(), 7);
    assert!(events.iter().all(|e| *e == "dll_main"));
    assert!(image.is_constructed());
}

#[test]
fn thread_event_handler_result_is_returned_verbatim() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = LibraryFn(|_: HInstance, _: u32, _: *mut c_void| false);
    assert!(!image.dispatch(&mut handler, ptr::null_mut(), DLL_THREAD_ATTACH, ptr::null_mut()));
    assert!(take_events().is_empty());
}

#[test]
fn default_library_entry_accepts_attach_and_keeps_globals_alive() {
    let image = LibraryImage::new(&TABLES, &RecordingFinalizers);
    let mut handler = DefaultLibraryEntry;
    assert!(image.dispatch(&mut handler, ptr::null_mut(), DLL_PROCESS_ATTACH, ptr::null_mut()));

    let events = take_events();
    assert_eq!(events.as_slice(), CONSTRUCTION.as_slice());
}
