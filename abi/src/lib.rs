//! crtstart startup ABI types
//!
//! This crate provides the definitions shared between the startup sequencer,
//! the platform bindings that feed it, and the user entry points it invokes.
//! Keeping them in one dependency-free place means:
//! - the `boot` crate can dispatch through traits without knowing the platform
//! - host-side tests can supply fake platforms that implement the same traits
//! - the numeric values handed to the OS live next to their names
//!
//! Types crossing the OS boundary are `#[repr(C)]` or `#[repr(i32)]`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod attach;
pub mod entry_traits;
pub mod error;
pub mod host_traits;
pub mod image;
pub mod startup_info;

pub use attach::*;
pub use entry_traits::*;
pub use error::*;
pub use host_traits::*;
pub use image::*;
pub use startup_info::*;
