//! Startup error codes.

use core::ffi::c_int;

/// Exit code used when the environment could not be materialized.
///
/// Matches the status the platform runtime uses for its own fatal
/// "not enough space for arguments/environment" message, so a startup failure
/// stays distinguishable from ordinary small exit codes.
pub const STARTUP_FAILURE_EXIT_CODE: c_int = 255;

/// Implement common methods for startup error enums.
///
/// Generates `as_c_int()`, `from_c_int()`, `is_success()`, and `is_error()`
/// for `#[repr(i32)]` enums that reserve `0` for success.
macro_rules! impl_startup_error {
    ($ty:ty, fallback: $fallback:ident, variants: { $($val:literal => $variant:ident),* $(,)? }) => {
        impl $ty {
            #[inline]
            pub fn as_c_int(self) -> c_int {
                self as c_int
            }

            #[inline]
            pub fn from_c_int(val: c_int) -> Self {
                match val {
                    $($val => Self::$variant,)*
                    _ => Self::$fallback,
                }
            }

            #[inline]
            pub fn is_success(self) -> bool {
                matches!(self, Self::Success)
            }

            #[inline]
            pub fn is_error(self) -> bool {
                !self.is_success()
            }
        }
    };
}

pub type StartupResult<T> = Result<T, StartupError>;

/// Which materialization step failed.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupError {
    #[default]
    Success = 0,
    /// Legacy combined hook returned nonzero
    MainArgs = -1,
    /// Modern configure-argv call failed
    ArgvConfiguration = -2,
    /// Modern environment initialization failed
    EnvironmentInit = -3,
    /// Modern environment fetch returned no block
    EnvironmentFetch = -4,
    /// Raw command line unavailable for a windowed image
    CommandLine = -5,
    /// Entry symbol reached a second time in one process
    Reentered = -6,
}

impl_startup_error!(StartupError, fallback: MainArgs, variants: {
    0 => Success,
    -1 => MainArgs,
    -2 => ArgvConfiguration,
    -3 => EnvironmentInit,
    -4 => EnvironmentFetch,
    -5 => CommandLine,
    -6 => Reentered,
});

impl StartupError {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::MainArgs => "main argument hook failed",
            Self::ArgvConfiguration => "argv configuration failed",
            Self::EnvironmentInit => "environment initialization failed",
            Self::EnvironmentFetch => "initial environment unavailable",
            Self::CommandLine => "command line unavailable",
            Self::Reentered => "startup entry re-entered",
        }
    }

    /// Process exit code for this failure.
    #[inline]
    pub fn exit_code(self) -> c_int {
        STARTUP_FAILURE_EXIT_CODE
    }
}

/// Helper for converting a C status code into a `Result`.
#[inline]
pub fn check_status(status: c_int, err: StartupError) -> StartupResult<()> {
    if status == 0 { Ok(()) } else { Err(err) }
}
