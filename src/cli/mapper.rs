//! Command-line flags as configuration overrides.
//!
//! The clap command is generated from the active dialect table, so a letter
//! is only ever interpreted the way that one table says. Parsing is split
//! from applying: arguments are parsed before any file is read, and the
//! resulting [`Overrides`] are laid over the merged file configuration.

use super::dialect::{DOCK_ANCHORS, Dialect, DmenuOnly, FlagEffect, FlagSpec};
use crate::config::{ConfigTable, keys};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use tracing::debug;

/// Id of the catch-all for non-flag operands.
const OPERANDS: &str = "operands";

/// A single flag occurrence, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub spec: &'static FlagSpec,
    pub value: Option<String>,
}

/// Ordered overrides produced by a successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    ops: Vec<Override>,
    unsupported: Vec<DmenuOnly>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.unsupported.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.ops.iter()
    }

    /// dmenu-only flags that were accepted but cannot be honoured.
    pub fn unsupported(&self) -> &[DmenuOnly] {
        &self.unsupported
    }

    /// Write every override into `table`, left to right.
    pub fn apply_to(&self, table: &mut ConfigTable) {
        for op in &self.ops {
            match (op.spec.effect, op.value.as_deref()) {
                (FlagEffect::Set { key, value }, _) => table.set_main(key, value),
                (FlagEffect::Value { key }, Some(value)) => table.set_main(key, value),
                (FlagEffect::DockItems, Some(value)) => {
                    table.set_main(keys::DOCK_ITEMS, value);
                    table.set_main(keys::LAYER_SHELL, "true");
                    table.set_main(keys::ANCHORS, DOCK_ANCHORS);
                }
                _ => {}
            }
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgOutcome {
    /// Continue launching with these overrides.
    Launch(Overrides),
    /// Print usage and exit 0.
    Usage,
    /// Print version and exit 0.
    Version,
}

/// dmenu-only flags were given while dmenu mode is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompatibleFlags(pub Vec<DmenuOnly>);

impl std::fmt::Display for IncompatibleFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dmenu args used, but not in dmenu mode")
    }
}

impl std::error::Error for IncompatibleFlags {}

/// Interprets flags according to exactly one dialect.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentMapper {
    dialect: &'static Dialect,
}

impl Default for ArgumentMapper {
    fn default() -> Self {
        Self::new(Dialect::active())
    }
}

impl ArgumentMapper {
    pub fn new(dialect: &'static Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Build the clap command for this dialect.
    fn command(&self) -> Command {
        let mut cmd = Command::new("sysmenu")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);

        for spec in self.dialect.flags() {
            let arg = Arg::new(spec.id).short(spec.letter).help(spec.help);
            let arg = if spec.effect.takes_value() {
                arg.action(ArgAction::Append)
                    .num_args(1)
                    .allow_hyphen_values(true)
            } else {
                arg.action(ArgAction::Count)
            };
            cmd = cmd.arg(arg);
        }

        cmd.arg(
            Arg::new(OPERANDS)
                .num_args(0..)
                .action(ArgAction::Append)
                .hide(true),
        )
    }

    /// Parse arguments (without the program name).
    ///
    /// Unknown flags and flags missing their argument yield
    /// [`ArgOutcome::Usage`], as does `-h`. `-v` yields
    /// [`ArgOutcome::Version`]; whichever of the two comes first wins.
    pub fn parse<I, T>(&self, args: I) -> ArgOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let matches = match self.command().try_get_matches_from(&args) {
            Ok(matches) => matches,
            Err(e) => {
                debug!(error = %e, "Argument parsing stopped");
                return self.early_exit(&args);
            }
        };

        if let Some(operands) = matches.get_many::<String>(OPERANDS) {
            for operand in operands {
                debug!(operand = %operand, "Ignoring non-flag argument");
            }
        }

        let mut seen = self.occurrences(&matches);
        seen.sort_by_key(|(index, _)| *index);

        let mut overrides = Overrides::default();
        for (_, op) in seen {
            match op.spec.effect {
                FlagEffect::Help => return ArgOutcome::Usage,
                FlagEffect::Version => return ArgOutcome::Version,
                FlagEffect::Unsupported(which) => {
                    debug!(flag = %op.spec.letter, "Recorded unsupported dmenu flag");
                    if !overrides.unsupported.contains(&which) {
                        overrides.unsupported.push(which);
                    }
                }
                _ => overrides.ops.push(op),
            }
        }

        ArgOutcome::Launch(overrides)
    }

    /// Walk the raw tokens up to the first one that cannot be parsed.
    ///
    /// A `-h` or `-v` before the bad token still decides the outcome, since
    /// flags are handled strictly left to right.
    fn early_exit(&self, args: &[OsString]) -> ArgOutcome {
        let mut tokens = args.iter();
        while let Some(token) = tokens.next() {
            let Some(token) = token.to_str() else {
                continue;
            };
            if token == "--" {
                break;
            }
            let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) else {
                continue;
            };
            for (at, letter) in cluster.char_indices() {
                let Some(spec) = self.dialect.lookup(letter) else {
                    return ArgOutcome::Usage;
                };
                match spec.effect {
                    FlagEffect::Help => return ArgOutcome::Usage,
                    FlagEffect::Version => return ArgOutcome::Version,
                    effect if effect.takes_value() => {
                        // An attached value ends the cluster; otherwise the
                        // next token is the value.
                        if at + letter.len_utf8() == cluster.len() && tokens.next().is_none() {
                            return ArgOutcome::Usage;
                        }
                        break;
                    }
                    _ => {}
                }
            }
        }
        ArgOutcome::Usage
    }

    /// Every flag occurrence tagged with its position on the command line.
    fn occurrences(&self, matches: &ArgMatches) -> Vec<(usize, Override)> {
        let mut seen = Vec::new();
        for spec in self.dialect.flags() {
            if spec.effect.takes_value() {
                let (Some(values), Some(indices)) = (
                    matches.get_many::<String>(spec.id),
                    matches.indices_of(spec.id),
                ) else {
                    continue;
                };
                for (index, value) in indices.zip(values) {
                    let op = Override {
                        spec,
                        value: Some(value.clone()),
                    };
                    seen.push((index, op));
                }
            } else if matches.get_count(spec.id) > 0 {
                // Switches are idempotent, so only the last occurrence matters.
                if let Some(index) = matches.indices_of(spec.id).and_then(|i| i.max()) {
                    seen.push((index, Override { spec, value: None }));
                }
            }
        }
        seen
    }

    /// Parse `args` and lay them over `table`.
    ///
    /// Returns `Err` with the outcome to act on instead when the command line
    /// asks for usage or version output.
    pub fn apply<I, T>(&self, mut table: ConfigTable, args: I) -> Result<ConfigTable, ArgOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.parse(args) {
            ArgOutcome::Launch(overrides) => {
                overrides.apply_to(&mut table);
                Ok(table)
            }
            other => Err(other),
        }
    }

    /// Whether the effective table puts the front-end into dmenu mode.
    pub fn dmenu_mode(&self, table: &ConfigTable) -> bool {
        self.dialect.supports_dmenu() && table.main_is_true(keys::DMENU)
    }

    /// Post-process the effective table once files and flags are merged.
    ///
    /// In dmenu mode the window must never start hidden. Outside dmenu mode,
    /// dmenu-only flags are an error the caller reports with usage text.
    pub fn settle(&self, table: &mut ConfigTable, overrides: &Overrides) -> Result<(), IncompatibleFlags> {
        if self.dmenu_mode(table) {
            table.set_main(keys::START_HIDDEN, "false");
        } else if !overrides.unsupported().is_empty() {
            return Err(IncompatibleFlags(overrides.unsupported().to_vec()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::dialect::{EXTENDED, LEGACY};

    fn launch(mapper: ArgumentMapper, args: &[&str]) -> ConfigTable {
        mapper
            .apply(ConfigTable::new(), args)
            .expect("expected launch")
    }

    #[test]
    fn test_value_flags_copy_argument() {
        let table = launch(
            ArgumentMapper::new(&LEGACY),
            &["-i", "64", "-I", "32", "-n", "20", "-W", "400", "-H", "300"],
        );
        assert_eq!(table.main(keys::ICON_SIZE), Some("64"));
        assert_eq!(table.main(keys::DOCK_ICON_SIZE), Some("32"));
        assert_eq!(table.main(keys::NAME_LENGTH), Some("20"));
        assert_eq!(table.main(keys::WIDTH), Some("400"));
        assert_eq!(table.main(keys::HEIGHT), Some("300"));
    }

    #[test]
    fn test_switches_set_fixed_values() {
        let table = launch(ArgumentMapper::new(&LEGACY), &["-S", "-s", "-u", "-b", "-l"]);
        assert_eq!(table.main(keys::START_HIDDEN), Some("true"));
        assert_eq!(table.main(keys::SEARCHBAR), Some("false"));
        assert_eq!(table.main(keys::NAME_UNDER_ICON), Some("true"));
        assert_eq!(table.main(keys::SCROLL_BARS), Some("true"));
        assert_eq!(table.main(keys::LAYER_SHELL), Some("false"));
    }

    #[test]
    fn test_clustered_and_attached_forms() {
        let table = launch(ArgumentMapper::new(&LEGACY), &["-Su", "-i64"]);
        assert_eq!(table.main(keys::START_HIDDEN), Some("true"));
        assert_eq!(table.main(keys::NAME_UNDER_ICON), Some("true"));
        assert_eq!(table.main(keys::ICON_SIZE), Some("64"));
    }

    #[test]
    fn test_value_may_start_with_dash() {
        let table = launch(ArgumentMapper::new(&LEGACY), &["-m", "-5"]);
        assert_eq!(table.main(keys::APP_MARGIN), Some("-5"));
    }

    #[test]
    fn test_dock_items_writes_three_keys() {
        let mut base = ConfigTable::new();
        base.set_main(keys::LAYER_SHELL, "false");
        base.set_main(keys::ANCHORS, "top");
        let table = ArgumentMapper::new(&LEGACY)
            .apply(base, ["-D", "mydockitems"])
            .unwrap();
        assert_eq!(table.main(keys::DOCK_ITEMS), Some("mydockitems"));
        assert_eq!(table.main(keys::LAYER_SHELL), Some("true"));
        assert_eq!(table.main(keys::ANCHORS), Some("top right bottom left"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_later_flag_overrides_earlier() {
        let table = launch(ArgumentMapper::new(&LEGACY), &["-i", "16", "-i", "64"]);
        assert_eq!(table.main(keys::ICON_SIZE), Some("64"));
    }

    #[test]
    fn test_interleaving_follows_command_line_order() {
        let mapper = ArgumentMapper::new(&LEGACY);

        let table = launch(mapper, &["-D", "x", "-a", "left"]);
        assert_eq!(table.main(keys::ANCHORS), Some("left"));

        let table = launch(mapper, &["-a", "left", "-D", "x"]);
        assert_eq!(table.main(keys::ANCHORS), Some(DOCK_ANCHORS));

        let table = launch(mapper, &["-l", "-D", "x"]);
        assert_eq!(table.main(keys::LAYER_SHELL), Some("true"));

        let table = launch(mapper, &["-D", "x", "-l"]);
        assert_eq!(table.main(keys::LAYER_SHELL), Some("false"));
    }

    #[test]
    fn test_help_and_unknown_flags_request_usage() {
        let mapper = ArgumentMapper::new(&LEGACY);
        assert_eq!(mapper.parse(["-h"]), ArgOutcome::Usage);
        assert_eq!(mapper.parse(["-Z"]), ArgOutcome::Usage);
        assert_eq!(mapper.parse(["-i"]), ArgOutcome::Usage);
        assert_eq!(mapper.parse(["-S", "-h", "-i", "64"]), ArgOutcome::Usage);
    }

    #[test]
    fn test_version_flag() {
        let mapper = ArgumentMapper::new(&LEGACY);
        assert_eq!(mapper.parse(["-v"]), ArgOutcome::Version);
        assert_eq!(mapper.parse(["-v", "-h"]), ArgOutcome::Version);
        assert_eq!(mapper.parse(["-h", "-v"]), ArgOutcome::Usage);
    }

    #[test]
    fn test_first_exit_flag_wins_over_later_errors() {
        let mapper = ArgumentMapper::new(&LEGACY);
        assert_eq!(mapper.parse(["-v", "-Z"]), ArgOutcome::Version);
        assert_eq!(mapper.parse(["-v", "-i"]), ArgOutcome::Version);
        assert_eq!(mapper.parse(["-Sv", "-Z"]), ArgOutcome::Version);
        assert_eq!(mapper.parse(["-i", "64", "-v", "-Z"]), ArgOutcome::Version);
        assert_eq!(mapper.parse(["-h", "-Z"]), ArgOutcome::Usage);
    }

    #[test]
    fn test_error_before_exit_flag_requests_usage() {
        let mapper = ArgumentMapper::new(&LEGACY);
        assert_eq!(mapper.parse(["-Z", "-v"]), ArgOutcome::Usage);
        // "-v" is the value of -i here, so the trailing -Z is what fails.
        assert_eq!(mapper.parse(["-i", "-v", "-Z"]), ArgOutcome::Usage);
        assert_eq!(mapper.parse(["-i-v", "-Z"]), ArgOutcome::Usage);
    }

    #[test]
    fn test_apply_reports_early_exit() {
        let result = ArgumentMapper::new(&LEGACY).apply(ConfigTable::new(), ["-v"]);
        assert_eq!(result, Err(ArgOutcome::Version));
    }

    #[test]
    fn test_no_args_is_empty_launch() {
        let empty: [&str; 0] = [];
        match ArgumentMapper::new(&LEGACY).parse(empty) {
            ArgOutcome::Launch(overrides) => assert!(overrides.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_operands_are_ignored() {
        let table = launch(ArgumentMapper::new(&LEGACY), &["stray", "-i", "8"]);
        assert_eq!(table.main(keys::ICON_SIZE), Some("8"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_legacy_letters() {
        let table = launch(
            ArgumentMapper::new(&LEGACY),
            &["-m", "10", "-M", "1", "-p", "5"],
        );
        assert_eq!(table.main(keys::APP_MARGIN), Some("10"));
        assert_eq!(table.main(keys::MONITOR), Some("1"));
        assert_eq!(table.main(keys::ITEMS_PER_ROW), Some("5"));
        assert_eq!(table.main(keys::PROMPT), None);
    }

    #[test]
    fn test_extended_letters() {
        let table = launch(
            ArgumentMapper::new(&EXTENDED),
            &["-m", "1", "-M", "10", "-p", "Run:", "-P", "5", "-L", "-d"],
        );
        assert_eq!(table.main(keys::MONITOR), Some("1"));
        assert_eq!(table.main(keys::APP_MARGIN), Some("10"));
        assert_eq!(table.main(keys::PROMPT), Some("Run:"));
        assert_eq!(table.main(keys::ITEMS_PER_ROW), Some("5"));
        assert_eq!(table.main(keys::LAYER_SHELL), Some("false"));
        assert_eq!(table.main(keys::DMENU), Some("true"));
    }

    #[test]
    fn test_dialects_never_mix() {
        let legacy = launch(ArgumentMapper::new(&LEGACY), &["-m", "2"]);
        assert_eq!(legacy.main(keys::APP_MARGIN), Some("2"));
        assert_eq!(legacy.main(keys::MONITOR), None);

        let extended = launch(ArgumentMapper::new(&EXTENDED), &["-m", "2"]);
        assert_eq!(extended.main(keys::MONITOR), Some("2"));
        assert_eq!(extended.main(keys::APP_MARGIN), None);
    }

    #[test]
    fn test_extended_only_flags_unknown_in_legacy() {
        let mapper = ArgumentMapper::new(&LEGACY);
        for flag in ["-d", "-L", "-P", "-w"] {
            assert_eq!(mapper.parse([flag, "1"]), ArgOutcome::Usage, "{flag}");
        }
    }

    #[test]
    fn test_legacy_l_does_not_swallow_next_flag() {
        let table = launch(ArgumentMapper::new(&LEGACY), &["-l", "-S"]);
        assert_eq!(table.main(keys::LAYER_SHELL), Some("false"));
        assert_eq!(table.main(keys::START_HIDDEN), Some("true"));
    }

    #[test]
    fn test_unsupported_flags_recorded_not_applied() {
        let mapper = ArgumentMapper::new(&EXTENDED);
        let ArgOutcome::Launch(overrides) = mapper.parse(["-l", "10", "-w", "0x1", "-l", "3"]) else {
            panic!("expected launch");
        };
        assert_eq!(
            overrides.unsupported(),
            &[DmenuOnly::Lines, DmenuOnly::WindowId]
        );
        assert_eq!(overrides.iter().count(), 0);
        assert!(!overrides.is_empty());

        let mut table = ConfigTable::new();
        overrides.apply_to(&mut table);
        assert!(table.is_empty());
    }

    #[test]
    fn test_settle_dmenu_forces_visible() {
        let mapper = ArgumentMapper::new(&EXTENDED);
        let ArgOutcome::Launch(overrides) = mapper.parse(["-S", "-d", "-l", "10"]) else {
            panic!("expected launch");
        };
        let mut table = ConfigTable::new();
        overrides.apply_to(&mut table);
        assert_eq!(table.main(keys::START_HIDDEN), Some("true"));

        mapper.settle(&mut table, &overrides).unwrap();
        assert_eq!(table.main(keys::START_HIDDEN), Some("false"));
        assert!(mapper.dmenu_mode(&table));
    }

    #[test]
    fn test_settle_dmenu_from_config_file() {
        let mapper = ArgumentMapper::new(&EXTENDED);
        let mut table = ConfigTable::new();
        table.set_main(keys::DMENU, "true");
        table.set_main(keys::START_HIDDEN, "true");
        mapper.settle(&mut table, &Overrides::default()).unwrap();
        assert_eq!(table.main(keys::START_HIDDEN), Some("false"));
    }

    #[test]
    fn test_settle_rejects_dmenu_flags_outside_dmenu_mode() {
        let mapper = ArgumentMapper::new(&EXTENDED);
        let ArgOutcome::Launch(overrides) = mapper.parse(["-w", "42"]) else {
            panic!("expected launch");
        };
        let mut table = ConfigTable::new();
        overrides.apply_to(&mut table);
        let err = mapper.settle(&mut table, &overrides).unwrap_err();
        assert_eq!(err.0, vec![DmenuOnly::WindowId]);
        assert_eq!(err.to_string(), "Dmenu args used, but not in dmenu mode");
    }

    #[test]
    fn test_legacy_ignores_dmenu_key() {
        let mapper = ArgumentMapper::new(&LEGACY);
        let mut table = ConfigTable::new();
        table.set_main(keys::DMENU, "true");
        table.set_main(keys::START_HIDDEN, "true");
        mapper.settle(&mut table, &Overrides::default()).unwrap();
        assert!(!mapper.dmenu_mode(&table));
        assert_eq!(table.main(keys::START_HIDDEN), Some("true"));
    }
}
