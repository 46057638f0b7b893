//! Executable entry/exit dispatch.
//!
//! The dispatcher owns the startup sequence of a console or windowed image:
//!
//! `Entered -> TypeTagged -> ArgsReady -> ConstructorsRun -> UserCodeRunning
//!  -> TerminatorsRun -> Exited`
//!
//! Every transition happens at most once per process. A materialization
//! failure leaves the linear path and goes straight to process exit with the
//! startup failure code; constructors, the user entry and teardown are skipped.

use core::ffi::c_int;
use core::marker::PhantomData;
use core::ptr;

use crtstart_abi::{
    CharWidth, ConsoleEntry, DeferredFinalizers, ImageType, ProcessServices, StartupError,
    WindowedEntry,
};
use crtstart_lib::{klog_debug, klog_error, klog_warn};

use crate::initterm::{CrtTables, run_constructors, run_terminators};
use crate::materialize::{ArgumentSource, StartupContext, materialize, tag_subsystem};
use crate::selector::StartupConfig;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchState {
    Entered = 0,
    TypeTagged = 1,
    ArgsReady = 2,
    ConstructorsRun = 3,
    UserCodeRunning = 4,
    TerminatorsRun = 5,
    Exited = 6,
}

impl DispatchState {
    pub fn name(self) -> &'static str {
        match self {
            DispatchState::Entered => "entered",
            DispatchState::TypeTagged => "type_tagged",
            DispatchState::ArgsReady => "args_ready",
            DispatchState::ConstructorsRun => "constructors_run",
            DispatchState::UserCodeRunning => "user_code_running",
            DispatchState::TerminatorsRun => "terminators_run",
            DispatchState::Exited => "exited",
        }
    }
}

/// How the executable sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user entry returned this value and teardown ran.
    Exited(c_int),
    /// Startup never reached user code.
    ConfigurationFailed(StartupError),
}

impl Outcome {
    pub fn exit_code(self) -> c_int {
        match self {
            Outcome::Exited(code) => code,
            Outcome::ConfigurationFailed(err) => err.exit_code(),
        }
    }
}

/// Process bootstrap context for an executable image.
///
/// Holds every process-wide input of the startup sequence explicitly: the
/// linked tables, the OS services, the argument source and the deferred
/// finalizer runner.
pub struct Bootstrap<'a, W, P, S, F>
where
    W: CharWidth,
    P: ProcessServices + ?Sized,
    S: ArgumentSource<W>,
    F: DeferredFinalizers + ?Sized,
{
    tables: &'a CrtTables,
    process: &'a P,
    source: S,
    finalizers: &'a F,
    config: StartupConfig,
    state: DispatchState,
    _width: PhantomData<fn() -> W>,
}

impl<'a, W, P, S, F> Bootstrap<'a, W, P, S, F>
where
    W: CharWidth,
    P: ProcessServices + ?Sized,
    S: ArgumentSource<W>,
    F: DeferredFinalizers + ?Sized,
{
    pub fn new(
        tables: &'a CrtTables,
        process: &'a P,
        source: S,
        finalizers: &'a F,
        config: StartupConfig,
    ) -> Self {
        Self {
            tables,
            process,
            source,
            finalizers,
            config,
            state: DispatchState::Entered,
            _width: PhantomData,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    fn advance(&mut self, next: DispatchState) {
        debug_assert_eq!(
            next as u8,
            self.state as u8 + 1,
            "startup transition {} -> {} out of order",
            self.state.name(),
            next.name()
        );
        klog_debug!("[crt:dispatch] {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Steps 1-3: tag, materialize, construct.
    fn prepare(&mut self, image: ImageType) -> Result<StartupContext<W>, StartupError> {
        debug_assert!(image.is_executable(), "{} image has no dispatcher", image.name());
        if self.state != DispatchState::Entered {
            klog_warn!("[crt:dispatch] startup re-entered in {}", self.state.name());
            return Err(StartupError::Reentered);
        }

        tag_subsystem(self.process, image);
        self.advance(DispatchState::TypeTagged);

        let ctx = materialize(self.process, &self.source, image, &self.config)?;
        self.advance(DispatchState::ArgsReady);

        run_constructors(self.tables);
        self.advance(DispatchState::ConstructorsRun);
        Ok(ctx)
    }

    /// Step 5. Runs whatever the user entry returned.
    fn teardown(&mut self) {
        run_terminators(self.tables, self.finalizers);
        self.advance(DispatchState::TerminatorsRun);
    }

    /// Run a console image up to (not including) process exit.
    pub fn run_console<E>(&mut self, entry: &mut E) -> Outcome
    where
        E: ConsoleEntry<W> + ?Sized,
    {
        let ctx = match self.prepare(ImageType::Console) {
            Ok(ctx) => ctx,
            Err(err) => return Outcome::ConfigurationFailed(err),
        };

        self.advance(DispatchState::UserCodeRunning);
        let code = entry.main(ctx.args.argc, ctx.args.argv, ctx.args.envp);
        klog_debug!("[crt:dispatch] entry returned {}", code);

        self.teardown();
        Outcome::Exited(code)
    }

    /// Run a windowed image up to (not including) process exit.
    pub fn run_windowed<E>(&mut self, entry: &mut E) -> Outcome
    where
        E: WindowedEntry<W> + ?Sized,
    {
        let ctx = match self.prepare(ImageType::Windowed) {
            Ok(ctx) => ctx,
            Err(err) => return Outcome::ConfigurationFailed(err),
        };
        let Some(windowed) = ctx.windowed else {
            return Outcome::ConfigurationFailed(StartupError::CommandLine);
        };

        self.advance(DispatchState::UserCodeRunning);
        let code = entry.win_main(
            self.process.image_base(),
            ptr::null_mut(),
            windowed.command_line,
            windowed.show.raw(),
        );
        klog_debug!("[crt:dispatch] entry returned {}", code);

        self.teardown();
        Outcome::Exited(code)
    }

    /// Step 6: hand the exit code to the OS. Does not return.
    pub fn exit(mut self, outcome: Outcome) -> ! {
        if let Outcome::ConfigurationFailed(err) = outcome {
            klog_error!("[crt:dispatch] startup failed: {}", err.describe());
        }
        klog_debug!("[crt:dispatch] {} -> {}", self.state.name(), DispatchState::Exited.name());
        self.state = DispatchState::Exited;
        self.process.exit_process(outcome.exit_code())
    }

    pub fn start_console<E>(mut self, entry: &mut E) -> !
    where
        E: ConsoleEntry<W> + ?Sized,
    {
        let outcome = self.run_console(entry);
        self.exit(outcome)
    }

    pub fn start_windowed<E>(mut self, entry: &mut E) -> !
    where
        E: WindowedEntry<W> + ?Sized,
    {
        let outcome = self.run_windowed(entry);
        self.exit(outcome)
    }
}
