//! Launch sequence.
//!
//! `Start -> ConfigResolved -> ModuleBound -> InstanceCreated ->
//! SignalsInstalled -> Running`. The launcher stops at the first stage that
//! decides the process should exit and reports why; the binary turns the
//! report into console output and an exit code.

use crate::cli::{ArgOutcome, ArgumentMapper, IncompatibleFlags};
use crate::config::{ConfigLoader, ConfigTable, Resolution, TableParser};
use crate::error::{LoadError, SignalError};
use crate::module::{MODULE_NAME, Module, ModuleSource};
use crate::signals::{SignalBridge, TerminationListener};
use std::ffi::OsString;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Launch stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    ConfigResolved,
    ModuleBound,
    InstanceCreated,
    SignalsInstalled,
    Running,
}

/// Why the launcher stopped.
#[derive(Debug)]
pub enum Exit {
    /// `-h`, an unknown flag, or a flag missing its argument.
    Usage,
    /// `-v`.
    Version,
    /// dmenu-only flags outside dmenu mode.
    IncompatibleFlags(IncompatibleFlags),
    /// No config file and no command-line override (strict builds only).
    NoConfig,
    /// The front-end module or one of its entry points is missing.
    BindFailed(LoadError),
    /// Signal forwarding could not be installed.
    SignalsFailed(SignalError),
    /// The event loop could not run.
    LoopFailed(SignalError),
    /// The event loop returned normally.
    Shutdown,
}

impl Exit {
    /// Process exit code for this outcome.
    pub fn code(&self) -> u8 {
        match self {
            Exit::Usage | Exit::Version | Exit::IncompatibleFlags(_) | Exit::Shutdown => 0,
            Exit::NoConfig
            | Exit::BindFailed(_)
            | Exit::SignalsFailed(_)
            | Exit::LoopFailed(_) => 1,
        }
    }
}

/// What happened during a launch.
pub struct LaunchReport {
    /// Last stage reached.
    pub stage: Stage,
    pub exit: Exit,
    /// File resolution, once `ConfigResolved` is reached.
    pub resolution: Option<Resolution>,
    /// Effective configuration, once it is final.
    pub config: Option<ConfigTable>,
    /// Whether signal forwarding was skipped for dmenu mode.
    pub signals_skipped: bool,
    /// The bound module, kept alive for as long as the report is held.
    pub module: Option<Arc<dyn Module>>,
}

impl std::fmt::Debug for LaunchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchReport")
            .field("stage", &self.stage)
            .field("exit", &self.exit)
            .field("resolution", &self.resolution)
            .field("config", &self.config)
            .field("signals_skipped", &self.signals_skipped)
            .field("module_bound", &self.module.is_some())
            .finish()
    }
}

/// Runs the front-end once everything is wired.
pub trait EventLoop {
    fn run(&mut self, config: &ConfigTable) -> Result<(), SignalError>;
}

/// Blocks until the process is asked to terminate.
///
/// The front-end drives its own UI from its creation entry point; the
/// launcher only keeps the process alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitForTermination;

impl EventLoop for WaitForTermination {
    fn run(&mut self, _config: &ConfigTable) -> Result<(), SignalError> {
        let mut listener = TerminationListener::new()?;
        listener.wait();
        Ok(())
    }
}

/// Whether a launch without any config file may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPolicy {
    /// Refuse to start with neither a file nor a command-line override.
    Strict,
    /// Always continue, possibly with an empty table.
    Lenient,
}

impl ConfigPolicy {
    /// The policy selected at build time.
    pub fn active() -> Self {
        if cfg!(feature = "strict-config") {
            ConfigPolicy::Strict
        } else {
            ConfigPolicy::Lenient
        }
    }
}

/// Owns every launch collaborator and drives the stages.
pub struct Launcher<S, E, P> {
    loader: ConfigLoader<P>,
    mapper: ArgumentMapper,
    modules: S,
    event_loop: E,
    policy: ConfigPolicy,
    module_name: String,
}

impl<S: ModuleSource, E: EventLoop, P: TableParser> Launcher<S, E, P> {
    pub fn new(loader: ConfigLoader<P>, modules: S, event_loop: E) -> Self {
        Self {
            loader,
            mapper: ArgumentMapper::default(),
            modules,
            event_loop,
            policy: ConfigPolicy::active(),
            module_name: MODULE_NAME.to_string(),
        }
    }

    pub fn with_mapper(mut self, mapper: ArgumentMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_policy(mut self, policy: ConfigPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Run the whole launch sequence with `args` (without the program name).
    pub fn run<I, T>(mut self, args: I) -> LaunchReport
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut report = LaunchReport {
            stage: Stage::Start,
            exit: Exit::Shutdown,
            resolution: None,
            config: None,
            signals_skipped: false,
            module: None,
        };

        // Start: flags are parsed before any file is touched.
        let overrides = match self.mapper.parse(args) {
            ArgOutcome::Launch(overrides) => overrides,
            ArgOutcome::Usage => return report.stop(Exit::Usage),
            ArgOutcome::Version => return report.stop(Exit::Version),
        };

        // ConfigResolved
        let resolution = self.loader.load();
        report.stage = Stage::ConfigResolved;
        if !resolution.has_any_source() {
            if overrides.is_empty() && self.policy == ConfigPolicy::Strict {
                error!("No config available, something ain't right here");
                report.resolution = Some(resolution);
                return report.stop(Exit::NoConfig);
            }
            warn!("No config file available, continuing with command-line settings");
        }

        let mut config = resolution.table.clone();
        overrides.apply_to(&mut config);
        report.resolution = Some(resolution);
        if let Err(incompatible) = self.mapper.settle(&mut config, &overrides) {
            debug!(flags = ?incompatible.0, "{incompatible}");
            return report.stop(Exit::IncompatibleFlags(incompatible));
        }
        debug!(
            config = %serde_json::to_string(&config).unwrap_or_default(),
            "Effective configuration"
        );

        // ModuleBound
        let module = match self.modules.bind(&self.module_name) {
            Ok(module) => module,
            Err(e) => {
                debug!(module = %self.module_name, error = %e, "Failed to bind front-end module");
                report.config = Some(config);
                return report.stop(Exit::BindFailed(e));
            }
        };
        report.stage = Stage::ModuleBound;

        // InstanceCreated: the configuration is frozen from here on.
        let handle = module.create(&config);
        report.stage = Stage::InstanceCreated;
        report.module = Some(Arc::clone(&module));
        info!(handle = ?handle.as_raw(), "Front-end instance created");

        // SignalsInstalled
        let bridge = if self.mapper.dmenu_mode(&config) {
            info!("dmenu mode, not forwarding signals");
            report.signals_skipped = true;
            None
        } else {
            match SignalBridge::install(module, handle) {
                Ok(bridge) => Some(bridge),
                Err(e) => {
                    error!(error = %e, "Failed to install signal forwarding");
                    report.config = Some(config);
                    return report.stop(Exit::SignalsFailed(e));
                }
            }
        };
        report.stage = Stage::SignalsInstalled;

        // Running
        report.stage = Stage::Running;
        let result = self.event_loop.run(&config);
        drop(bridge);
        report.config = Some(config);
        match result {
            Ok(()) => report.stop(Exit::Shutdown),
            Err(e) => {
                error!(error = %e, "Event loop failed");
                report.stop(Exit::LoopFailed(e))
            }
        }
    }
}

impl LaunchReport {
    fn stop(mut self, exit: Exit) -> Self {
        self.exit = exit;
        self
    }
}
