//! Argument & environment materialization.
//!
//! Produces the startup context handed to the user entry. The runtime
//! generation decides how argv/envp are obtained:
//! - legacy: one combined hook fills argc, argv and envp
//! - modern: configure argv, initialize the environment, fetch it, and for
//!   windowed images fetch the entry command line
//!
//! Modern calls depend on their predecessors, so the first failure ends the
//! sequence.

use core::ffi::c_int;
use core::ptr;

use crtstart_abi::{
    CharWidth, ImageType, LegacyMainArgs, LegacyStartupInfo, ModernMainArgs, ProcessServices,
    RuntimeGeneration, ShowCommand, StartupError, StartupResult, TextPtr, TextVec, check_status,
};
use crtstart_lib::{klog_debug, klog_error};

use crate::selector::StartupConfig;

/// argc/argv/envp as the runtime produced them.
#[derive(Debug, Clone, Copy)]
pub struct MainArgs<W: CharWidth> {
    pub argc: c_int,
    pub argv: TextVec<W>,
    pub envp: TextVec<W>,
}

/// Extra inputs of a windowed entry.
#[derive(Debug, Clone, Copy)]
pub struct WindowedArgs<W: CharWidth> {
    pub command_line: TextPtr<W>,
    pub show: ShowCommand,
}

/// Everything the user entry receives. Built once per process start.
#[derive(Debug, Clone, Copy)]
pub struct StartupContext<W: CharWidth> {
    pub args: MainArgs<W>,
    pub windowed: Option<WindowedArgs<W>>,
}

/// One runtime generation's way of producing arguments.
pub trait ArgumentSource<W: CharWidth> {
    const GENERATION: RuntimeGeneration;

    fn main_args(&self, config: &StartupConfig) -> StartupResult<MainArgs<W>>;

    /// Raw command line for a windowed entry.
    fn command_line(&self) -> StartupResult<TextPtr<W>>;
}

/// Legacy runtime adapter over the combined hook.
pub struct LegacyArgs<'a, C: ?Sized> {
    crt: &'a C,
}

impl<'a, C: ?Sized> LegacyArgs<'a, C> {
    pub const fn new(crt: &'a C) -> Self {
        Self { crt }
    }
}

impl<W, C> ArgumentSource<W> for LegacyArgs<'_, C>
where
    W: CharWidth,
    C: LegacyMainArgs<W> + ?Sized,
{
    const GENERATION: RuntimeGeneration = RuntimeGeneration::Legacy;

    fn main_args(&self, config: &StartupConfig) -> StartupResult<MainArgs<W>> {
        let mut argc: c_int = 0;
        let mut argv: TextVec<W> = ptr::null_mut();
        let mut envp: TextVec<W> = ptr::null_mut();
        let mut info = LegacyStartupInfo {
            mode: config.legacy_mode,
        };

        let status = self
            .crt
            .get_main_args(&mut argc, &mut argv, &mut envp, config.glob, &mut info);
        if status != 0 {
            klog_error!("[crt:args] main argument hook failed: status {}", status);
            return Err(StartupError::MainArgs);
        }
        Ok(MainArgs { argc, argv, envp })
    }

    fn command_line(&self) -> StartupResult<TextPtr<W>> {
        non_null(self.crt.command_line(), StartupError::CommandLine)
    }
}

/// Modern runtime adapter over the configure/initialize/fetch calls.
pub struct ModernArgs<'a, C: ?Sized> {
    crt: &'a C,
}

impl<'a, C: ?Sized> ModernArgs<'a, C> {
    pub const fn new(crt: &'a C) -> Self {
        Self { crt }
    }
}

impl<W, C> ArgumentSource<W> for ModernArgs<'_, C>
where
    W: CharWidth,
    C: ModernMainArgs<W> + ?Sized,
{
    const GENERATION: RuntimeGeneration = RuntimeGeneration::Modern;

    fn main_args(&self, config: &StartupConfig) -> StartupResult<MainArgs<W>> {
        check_status(
            self.crt.configure_argv(config.argv_mode),
            StartupError::ArgvConfiguration,
        )
        .inspect_err(report)?;
        check_status(
            self.crt.initialize_environment(),
            StartupError::EnvironmentInit,
        )
        .inspect_err(report)?;
        let envp = non_null(self.crt.initial_environment(), StartupError::EnvironmentFetch)?;
        let (argc, argv) = self.crt.arguments();
        Ok(MainArgs { argc, argv, envp })
    }

    fn command_line(&self) -> StartupResult<TextPtr<W>> {
        non_null(self.crt.winmain_command_line(), StartupError::CommandLine)
    }
}

fn report(err: &StartupError) {
    klog_error!("[crt:args] {}", err.describe());
}

fn non_null<T>(value: *mut T, err: StartupError) -> StartupResult<*mut T> {
    if value.is_null() {
        report(&err);
        Err(err)
    } else {
        Ok(value)
    }
}

/// Register the subsystem type. Always the first call made at startup.
pub fn tag_subsystem<P: ProcessServices + ?Sized>(process: &P, image: ImageType) {
    klog_debug!("[crt:args] subsystem -> {}", image.name());
    process.set_app_type(image);
}

/// Build the startup context for `image`.
pub fn materialize<W, P, S>(
    process: &P,
    source: &S,
    image: ImageType,
    config: &StartupConfig,
) -> StartupResult<StartupContext<W>>
where
    W: CharWidth,
    P: ProcessServices + ?Sized,
    S: ArgumentSource<W> + ?Sized,
{
    let args = source.main_args(config)?;
    klog_debug!("[crt:args] argc={} ({:?} runtime)", args.argc, S::GENERATION);

    let windowed = if image == ImageType::Windowed {
        let command_line = source.command_line()?;
        let show = process.startup_info().show_command();
        klog_debug!("[crt:args] show mode {}", show.raw());
        Some(WindowedArgs { command_line, show })
    } else {
        None
    };

    Ok(StartupContext { args, windowed })
}
