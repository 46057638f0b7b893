//! crtstart process/module bootstrap sequencer.
//!
//! Runs between the loader handing control to an image and the image's own
//! entry point, and again on the way out:
//! - `selector`: build-time choice of image type, text width and runtime
//! - `initterm`: the four initializer/finalizer tables and their order
//! - `materialize`: argc/argv/envp, command line and show mode
//! - `dispatch`: the executable state machine and process exit
//! - `library`: attach/detach sequencing for library images
//!
//! Windows bindings and the exported `*CRTStartup` symbols live in `win32`.

#![no_std]

#[cfg(test)]
extern crate std;

#[doc(hidden)]
pub use paste;

pub mod dispatch;
pub mod exit;
pub mod initterm;
pub mod library;
pub mod materialize;
pub mod selector;

#[cfg(all(windows, not(test)))]
pub mod win32;

#[cfg(test)]
mod startup_tests;
#[cfg(test)]
mod test_support;

pub use dispatch::{Bootstrap, DispatchState, Outcome};
pub use exit::{AT_EXIT, at_exit, crt_atexit, crt_onexit};
pub use initterm::{
    CallbackTable, CrtTables, Pvfv, TablePhase, TableSlot, run_constructors, run_ordered,
    run_phase, run_terminators,
};
pub use library::LibraryImage;
pub use materialize::{
    ArgumentSource, LegacyArgs, MainArgs, ModernArgs, StartupContext, WindowedArgs, materialize,
    tag_subsystem,
};
pub use selector::{
    SELECTED_CONFIG, SELECTED_GENERATION, SELECTED_IMAGE, SELECTED_WIDTH, SelectedWidth,
    StartupConfig,
};
