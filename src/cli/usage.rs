//! Usage and version text.

use super::dialect::Dialect;

const COMMIT_MESSAGE: &str = env!("SYSMENU_GIT_COMMIT_MESSAGE");
const COMMIT_DATE: &str = env!("SYSMENU_GIT_COMMIT_DATE");

/// Usage text listing exactly the flags of `dialect`.
pub fn usage(dialect: &Dialect) -> String {
    let mut text = String::from("usage:\n  sysmenu [argument...]:\n\narguments:\n");
    for spec in dialect.flags() {
        let arg = if spec.effect.takes_value() { " <value>" } else { "" };
        text.push_str(&format!("  -{}{arg}\t{}\n", spec.letter, spec.help));
    }
    text
}

/// Commit metadata captured at build time.
pub fn version() -> String {
    format!("Commit: {COMMIT_MESSAGE}\nDate: {COMMIT_DATE}\n")
}
