//! Build-time image classification.
//!
//! Image type, text width and runtime generation are fixed when the binary is
//! linked. Text width is carried by the sealed [`CharWidth`] marker types so
//! that argv/envp pointers of the wrong width cannot be handed to an entry.

use core::ffi::{c_char, c_int};

/// Subsystem type registered with the OS before anything else runs.
///
/// The discriminants are the values passed to the subsystem-type call.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    /// Unknown subsystem. Used for dynamically loaded libraries.
    Unknown = 0,
    Console = 1,
    Windowed = 2,
}

impl ImageType {
    #[inline]
    pub fn as_c_int(self) -> c_int {
        self as c_int
    }

    /// True for the two executable shapes.
    #[inline]
    pub fn is_executable(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "library",
            Self::Console => "console",
            Self::Windowed => "windowed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextWidth {
    Narrow,
    Wide,
}

/// Which runtime calling convention materializes argv/envp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeGeneration {
    /// Single combined "get main args" hook.
    Legacy,
    /// Separate configure / initialize / fetch calls.
    Modern,
}

/// Argument expansion mode for the modern configure-argv call.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgvMode {
    NoArguments = 0,
    #[default]
    Unexpanded = 1,
    Expanded = 2,
}

impl ArgvMode {
    #[inline]
    pub fn as_c_int(self) -> c_int {
        self as c_int
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Text width selected at build time.
///
/// Implemented only by [`Narrow`] and [`Wide`].
pub trait CharWidth: sealed::Sealed + 'static {
    /// One code unit of the platform string type.
    type Char: Copy + 'static;

    const WIDTH: TextWidth;
}

/// `char`-based argv/envp/command line.
#[derive(Debug, Clone, Copy)]
pub enum Narrow {}

/// UTF-16 (`wchar_t`) argv/envp/command line.
#[derive(Debug, Clone, Copy)]
pub enum Wide {}

impl sealed::Sealed for Narrow {}
impl sealed::Sealed for Wide {}

impl CharWidth for Narrow {
    type Char = c_char;
    const WIDTH: TextWidth = TextWidth::Narrow;
}

impl CharWidth for Wide {
    type Char = u16;
    const WIDTH: TextWidth = TextWidth::Wide;
}

/// Pointer to a NUL-terminated string of the selected width.
pub type TextPtr<W> = *mut <W as CharWidth>::Char;

/// Pointer to a NULL-terminated vector of strings of the selected width.
pub type TextVec<W> = *mut *mut <W as CharWidth>::Char;
