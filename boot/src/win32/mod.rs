//! Windows bindings and the exported entry symbols.
//!
//! Everything here talks to the real loader and C runtime, so it is only
//! compiled for Windows targets outside of unit tests.

#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

mod entry;
mod process;
mod tables;

#[cfg(feature = "legacy-msvcrt")]
mod msvcrt;
#[cfg(not(feature = "legacy-msvcrt"))]
mod ucrt;

pub use process::Win32Process;
pub use tables::LINKED_TABLES;

#[cfg(feature = "legacy-msvcrt")]
pub use msvcrt::Msvcrt;
#[cfg(not(feature = "legacy-msvcrt"))]
pub use ucrt::Ucrt;
