//! sysmenu
//!
//! Resolves the menu configuration, loads `libsysmenu.so` and keeps it fed
//! with signals until the process is asked to stop.

use anyhow::Result;
use std::process::ExitCode;
use sysmenu::cli::{Dialect, usage, version};
use sysmenu::config::ConfigLoader;
use sysmenu::logging;
use sysmenu::module::ModuleBridge;
use sysmenu::orchestrator::{Exit, Launcher, WaitForTermination};

fn main() -> Result<ExitCode> {
    logging::init()?;

    let launcher = Launcher::new(ConfigLoader::new(), ModuleBridge, WaitForTermination);
    let report = launcher.run(std::env::args_os().skip(1));

    let dialect = Dialect::active();
    match &report.exit {
        Exit::Usage => print!("{}", usage(dialect)),
        Exit::Version => print!("{}", version()),
        Exit::IncompatibleFlags(e) => {
            println!("{e}");
            print!("{}", usage(dialect));
        }
        Exit::BindFailed(e) => eprintln!("{e}"),
        // Already reported through the log.
        Exit::NoConfig | Exit::SignalsFailed(_) | Exit::LoopFailed(_) | Exit::Shutdown => {}
    }

    Ok(ExitCode::from(report.exit.code()))
}
