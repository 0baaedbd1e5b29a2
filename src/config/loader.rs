//! Configuration loader with tier-based merging.
//!
//! Reads the system-wide and per-user config files and merges them key by
//! key. Missing files are expected and never an error.

use super::merge::merge_all;
use super::parser::{IniParser, TableParser};
use super::types::ConfigTable;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Primary system-wide config file.
pub const SYSTEM_CONFIG: &str = "/usr/share/sys64/menu/config.conf";

/// Secondary system-wide config file, used only when the primary is absent.
pub const SYSTEM_FALLBACK_CONFIG: &str = "/usr/local/share/sys64/menu/config.conf";

/// Per-user config file, relative to the home directory.
pub const USER_CONFIG: &str = ".config/sys64/menu/config.conf";

/// Environment variable overriding the per-user config file.
pub const USER_CONFIG_ENV: &str = "SYSMENU_USER_CONFIG";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// `/usr/share/...`
    System = 0,
    /// `/usr/local/share/...`
    SystemFallback = 1,
    /// `~/.config/...`
    User = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::System => write!(f, "system"),
            ConfigTier::SystemFallback => write!(f, "system (fallback)"),
            ConfigTier::User => write!(f, "user"),
        }
    }
}

/// Candidate locations for each configuration tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub system: PathBuf,
    pub system_fallback: PathBuf,
    /// `None` when no home directory could be determined.
    pub user: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // User file: SYSMENU_USER_CONFIG or ~/.config/sys64/menu/config.conf
        let user = std::env::var_os(USER_CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(USER_CONFIG)));

        Self {
            system: PathBuf::from(SYSTEM_CONFIG),
            system_fallback: PathBuf::from(SYSTEM_FALLBACK_CONFIG),
            user,
        }
    }

    /// Create paths with explicit locations.
    pub fn with_paths(
        system: impl Into<PathBuf>,
        system_fallback: impl Into<PathBuf>,
        user: Option<PathBuf>,
    ) -> Self {
        Self {
            system: system.into(),
            system_fallback: system_fallback.into(),
            user,
        }
    }
}

/// A non-fatal condition noticed while resolving sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Neither system-wide file exists; defaults are missing.
    NoSystemSource,
    /// The per-user file does not exist.
    NoUserSource,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::NoSystemSource => {
                write!(f, "No default config found, things will get funky!")
            }
            ConfigWarning::NoUserSource => write!(f, "No user config found"),
        }
    }
}

/// A source that was found and merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub tier: ConfigTier,
    pub path: PathBuf,
}

/// Outcome of resolving every file tier.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The merged table.
    pub table: ConfigTable,
    /// Sources that contributed, lowest priority first.
    pub sources: Vec<LoadedSource>,
    pub warnings: Vec<ConfigWarning>,
}

impl Resolution {
    /// True when no system-wide source contributed.
    pub fn is_degraded(&self) -> bool {
        self.warnings.contains(&ConfigWarning::NoSystemSource)
    }

    /// True when at least one file contributed.
    pub fn has_any_source(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Read one candidate location.
///
/// Returns `None` if there is no readable file at `path`. A missing file is
/// logged at info level; a file that exists but cannot be read is logged as a
/// warning and treated the same way.
pub fn read_source(parser: &impl TableParser, path: &Path) -> Option<ConfigTable> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let table = parser.parse(&content);
            debug!(path = %path.display(), keys = table.len(), "Read config source");
            Some(table)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "Config source absent");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config source unreadable, skipping");
            None
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader<P = IniParser> {
    /// Paths for each tier
    pub paths: ConfigPaths,
    parser: P,
}

impl ConfigLoader<IniParser> {
    /// Loader over the discovered default locations.
    pub fn new() -> Self {
        Self::with_paths(ConfigPaths::discover())
    }

    /// Loader over explicit locations.
    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self {
            paths,
            parser: IniParser,
        }
    }
}

impl Default for ConfigLoader<IniParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TableParser> ConfigLoader<P> {
    /// Loader with a custom file format.
    pub fn with_parser(paths: ConfigPaths, parser: P) -> Self {
        Self { paths, parser }
    }

    /// Load and merge every tier.
    ///
    /// Precedence: the primary system file, or the fallback system file if
    /// the primary is absent, then the user file on top.
    pub fn load(&self) -> Resolution {
        let mut layers: Vec<(LoadedSource, ConfigTable)> = Vec::new();
        let mut warnings = Vec::new();

        // Tier 1: system defaults, primary preferred
        let system = [
            (ConfigTier::System, &self.paths.system),
            (ConfigTier::SystemFallback, &self.paths.system_fallback),
        ]
        .into_iter()
        .find_map(|(tier, path)| {
            read_source(&self.parser, path).map(|table| {
                let source = LoadedSource {
                    tier,
                    path: path.clone(),
                };
                (source, table)
            })
        });
        match system {
            Some(layer) => layers.push(layer),
            None => {
                warn!(
                    primary = %self.paths.system.display(),
                    fallback = %self.paths.system_fallback.display(),
                    "{}",
                    ConfigWarning::NoSystemSource
                );
                warnings.push(ConfigWarning::NoSystemSource);
            }
        }

        // Tier 2: user overrides
        let user = self.paths.user.as_ref().and_then(|path| {
            read_source(&self.parser, path).map(|table| {
                let source = LoadedSource {
                    tier: ConfigTier::User,
                    path: path.clone(),
                };
                (source, table)
            })
        });
        match user {
            Some(layer) => layers.push(layer),
            None => {
                info!("{}", ConfigWarning::NoUserSource);
                warnings.push(ConfigWarning::NoUserSource);
            }
        }

        let table = merge_all(layers.iter().map(|(_, table)| table));
        let sources = layers.into_iter().map(|(source, _)| source).collect();

        Resolution {
            table,
            sources,
            warnings,
        }
    }
}
