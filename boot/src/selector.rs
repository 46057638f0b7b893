//! Build-time image selection.
//!
//! Cargo features pick the image type, text width and runtime generation.
//! Nothing here branches at run time: the dispatcher variant and the exported
//! entry symbol are chosen by what gets compiled.

use core::ffi::c_int;

use crtstart_abi::{ArgvMode, CharWidth, ImageType, RuntimeGeneration, TextWidth};

#[cfg(any(
    all(feature = "console", feature = "windowed"),
    all(feature = "console", feature = "library"),
    all(feature = "windowed", feature = "library"),
))]
compile_error!("crtstart-boot: enable exactly one of `console`, `windowed`, `library`");

#[cfg(not(any(feature = "console", feature = "windowed", feature = "library")))]
compile_error!("crtstart-boot: no image type selected; enable `console`, `windowed` or `library`");

pub const SELECTED_IMAGE: ImageType = if cfg!(feature = "library") {
    ImageType::Unknown
} else if cfg!(feature = "windowed") {
    ImageType::Windowed
} else {
    ImageType::Console
};

#[cfg(not(feature = "wide"))]
pub type SelectedWidth = crtstart_abi::Narrow;
#[cfg(feature = "wide")]
pub type SelectedWidth = crtstart_abi::Wide;

pub const SELECTED_WIDTH: TextWidth = <SelectedWidth as CharWidth>::WIDTH;

pub const SELECTED_GENERATION: RuntimeGeneration = if cfg!(feature = "legacy-msvcrt") {
    RuntimeGeneration::Legacy
} else {
    RuntimeGeneration::Modern
};

/// Knobs passed through to the argument materialization calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupConfig {
    /// Expansion mode for the modern configure-argv call.
    pub argv_mode: ArgvMode,
    /// Wildcard-expansion flag for the legacy hook.
    pub glob: c_int,
    /// `mode` field of the legacy startup-info struct.
    pub legacy_mode: c_int,
}

impl StartupConfig {
    pub const DEFAULT: Self = Self {
        argv_mode: ArgvMode::Unexpanded,
        glob: 0,
        legacy_mode: 0,
    };

    pub const fn with_argv_mode(mut self, mode: ArgvMode) -> Self {
        self.argv_mode = mode;
        self
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub const SELECTED_CONFIG: StartupConfig = StartupConfig::DEFAULT;
