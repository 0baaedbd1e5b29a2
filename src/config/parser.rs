//! Parser for the sys64 `config.conf` format.
//!
//! ```text
//! # comment
//! [main]
//! icon-size=32
//! anchors = top left
//! ```

use super::types::ConfigTable;
use tracing::debug;

/// Turns the text of one config file into a table.
///
/// Malformed content is the parser's concern: implementations skip what they
/// cannot understand rather than failing the whole file.
pub trait TableParser {
    fn parse(&self, content: &str) -> ConfigTable;
}

/// Line-oriented `[section]` / `key=value` parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniParser;

impl TableParser for IniParser {
    fn parse(&self, content: &str) -> ConfigTable {
        let mut table = ConfigTable::new();
        let mut section: Option<&str> = None;

        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                debug!(line = lineno + 1, "Ignoring config line without '='");
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                debug!(line = lineno + 1, "Ignoring config line with empty key");
                continue;
            }
            match section {
                Some(section) => table.set(section, key, value.trim()),
                None => debug!(line = lineno + 1, key, "Ignoring key outside of any section"),
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_keys() {
        let content = "\
[main]
icon-size=32
anchors=top left

[style]
theme=dark
";
        let table = IniParser.parse(content);
        assert_eq!(table.get("main", "icon-size"), Some("32"));
        assert_eq!(table.get("main", "anchors"), Some("top left"));
        assert_eq!(table.get("style", "theme"), Some("dark"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let table = IniParser.parse("  [ main ]  \n   width =  400  \n");
        assert_eq!(table.get("main", "width"), Some("400"));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let content = "# leading comment\n\n[main]\n; another\n#icon-size=1\nicon-size=2\n";
        let table = IniParser.parse(content);
        assert_eq!(table.main("icon-size"), Some("2"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let table = IniParser.parse("[main]\nprompt=a=b\n");
        assert_eq!(table.main("prompt"), Some("a=b"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let table = IniParser.parse("[main]\nprompt=\n");
        assert_eq!(table.main("prompt"), Some(""));
    }

    #[test]
    fn test_keys_before_section_are_ignored() {
        let table = IniParser.parse("orphan=1\n[main]\nicon-size=32\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.main("orphan"), None);
    }

    #[test]
    fn test_garbage_lines_are_ignored() {
        let table = IniParser.parse("[main]\nnot a pair\n=novalue\nwidth=10\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.main("width"), Some("10"));
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let table = IniParser.parse("[main]\nwidth=10\nwidth=20\n");
        assert_eq!(table.main("width"), Some("20"));
    }

    #[test]
    fn test_reopened_section_merges() {
        let table = IniParser.parse("[main]\na=1\n[style]\nb=2\n[main]\nc=3\n");
        assert_eq!(table.main("a"), Some("1"));
        assert_eq!(table.main("c"), Some("3"));
        assert_eq!(table.get("style", "b"), Some("2"));
    }
}
