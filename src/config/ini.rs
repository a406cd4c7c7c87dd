//! Line-oriented INI reader used for `dotlink.conf` files.
//!
//! This layer only knows about headers and `key = value` lines. Which headers
//! are legal, and which entries need a value, is decided by
//! [`ConfigScope`](super::scope::ConfigScope).
use std::path::Path;

use crate::error::ConfigError;

/// A `[header]` and the entries below it, up to the next header.
///
/// # Examples
///
/// ```
/// use dotlink::config::ini::{KvEntry, KvSection};
///
/// let section = KvSection {
///     header: "slink".to_string(),
///     line: 1,
///     entries: vec![KvEntry {
///         key: "gitconfig".to_string(),
///         value: Some("~/.gitconfig".to_string()),
///         line: 2,
///     }],
/// };
/// assert_eq!(section.entries[0].key, "gitconfig");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvSection {
    /// The trimmed header text, original case preserved.
    pub header: String,
    /// 1-based line number of the header.
    pub line: usize,
    /// Entries in file order.
    pub entries: Vec<KvEntry>,
}

/// One entry line inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    /// Text left of the first `=`, trimmed.
    pub key: String,
    /// Text right of the first `=`, trimmed and with inline comments
    /// removed. `None` when the line has no `=` at all.
    pub value: Option<String>,
    /// 1-based line number.
    pub line: usize,
}

/// Read and parse the INI file at `path`.
///
/// Returns `Ok(None)` when the file does not exist, so callers can tell an
/// absent file apart from an empty one.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::InvalidSyntax`] if it cannot be parsed.
pub fn parse_kv_sections(path: &Path) -> Result<Option<Vec<KvSection>>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_kv_sections_from_str(&content, path).map(Some)
}

/// Parse INI content from a string. `file` is only used in error messages.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dotlink::config::ini::parse_kv_sections_from_str;
///
/// let sections = parse_kv_sections_from_str(
///     "[slink]\nvimrc = ~/.vimrc # editor\n",
///     Path::new("dotlink.conf"),
/// ).unwrap();
/// assert_eq!(sections[0].header, "slink");
/// assert_eq!(sections[0].entries[0].value.as_deref(), Some("~/.vimrc"));
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] if an entry appears before the
/// first header or a header is empty.
pub fn parse_kv_sections_from_str(
    content: &str,
    file: &Path,
) -> Result<Vec<KvSection>, ConfigError> {
    let mut sections = Vec::new();
    let mut current: Option<KvSection> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }

        if let Some(header) = parse_raw_header(trimmed) {
            if header.is_empty() {
                return Err(syntax_error(file, line_num, "empty section header"));
            }
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(KvSection {
                header,
                line: line_num,
                entries: Vec::new(),
            });
        } else if let Some(ref mut section) = current {
            let (key, value) = parse_kv_line(trimmed);
            if key.is_empty() {
                return Err(syntax_error(file, line_num, "entry has an empty name"));
            }
            section.entries.push(KvEntry {
                key,
                value,
                line: line_num,
            });
        } else {
            return Err(syntax_error(
                file,
                line_num,
                &format!("entry outside of a section: {trimmed}"),
            ));
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    Ok(sections)
}

fn syntax_error(file: &Path, line: usize, message: &str) -> ConfigError {
    ConfigError::InvalidSyntax {
        file: file.to_path_buf(),
        line,
        message: message.to_string(),
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Parse a `[header]` line, returning the trimmed inner text.
fn parse_raw_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.trim().to_string())
}

/// Split a line at the first `=`; the value loses any inline comment.
///
/// - `"vimrc = ~/.vimrc # editor"` → `("vimrc", Some("~/.vimrc"))`
/// - `"README"` → `("README", None)`
fn parse_kv_line(line: &str) -> (String, Option<String>) {
    line.split_once('=').map_or_else(
        || (strip_inline_comment(line).to_string(), None),
        |(key, value)| {
            (
                key.trim().to_string(),
                Some(strip_inline_comment(value.trim()).to_string()),
            )
        },
    )
}

/// Strip inline comments (`#` preceded by whitespace) from a value.
fn strip_inline_comment(value: &str) -> &str {
    [" #", "\t#"]
        .iter()
        .filter_map(|marker| value.find(marker))
        .min()
        .and_then(|idx| value.get(..idx))
        .map_or(value, str::trim_end)
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Vec<KvSection>, ConfigError> {
        parse_kv_sections_from_str(content, Path::new("dotlink.conf"))
    }

    #[test]
    fn parse_single_section() {
        let sections = parse("[slink]\ngitconfig=~/.gitconfig\n").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].header, "slink");
        assert_eq!(sections[0].line, 1);
        assert_eq!(
            sections[0].entries,
            vec![KvEntry {
                key: "gitconfig".to_string(),
                value: Some("~/.gitconfig".to_string()),
                line: 2,
            }]
        );
    }

    #[test]
    fn whitespace_around_equals_is_insignificant() {
        let sections = parse("[copy]\n   bashrc   =   ~/.bashrc   \n").unwrap();
        let entry = &sections[0].entries[0];
        assert_eq!(entry.key, "bashrc");
        assert_eq!(entry.value.as_deref(), Some("~/.bashrc"));
    }

    #[test]
    fn equals_in_value_is_kept() {
        let sections = parse("[slink]\nodd=/tmp/a=b\n").unwrap();
        assert_eq!(sections[0].entries[0].value.as_deref(), Some("/tmp/a=b"));
    }

    #[test]
    fn multiple_sections_keep_order() {
        let sections = parse("[ignore]\nREADME\n\n[slink]\na=~/.a\n[hlink]\nb=~/.b\n").unwrap();
        let headers: Vec<&str> = sections.iter().map(|s| s.header.as_str()).collect();
        assert_eq!(headers, ["ignore", "slink", "hlink"]);
    }

    #[test]
    fn bare_key_has_no_value() {
        let sections = parse("[ignore]\nREADME.md\n").unwrap();
        assert_eq!(sections[0].entries[0].key, "README.md");
        assert_eq!(sections[0].entries[0].value, None);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let sections = parse("# top\n; also\n[slink]\n\n  # indented\na=~/.a\n").unwrap();
        assert_eq!(sections[0].entries.len(), 1);
    }

    #[test]
    fn inline_comment_stripped_from_value() {
        let sections = parse("[slink]\na = ~/.a # note\n").unwrap();
        assert_eq!(sections[0].entries[0].value.as_deref(), Some("~/.a"));
    }

    #[test]
    fn hash_without_space_is_part_of_value() {
        assert_eq!(strip_inline_comment("~/.a#b"), "~/.a#b");
    }

    #[test]
    fn header_case_and_padding_preserved_as_trimmed() {
        let sections = parse("[ Slink ]\na=~/.a\n").unwrap();
        assert_eq!(sections[0].header, "Slink");
    }

    #[test]
    fn entry_outside_section_fails_with_line_number() {
        let err = parse("\n\norphan=~/.x\n").unwrap_err();
        match err {
            ConfigError::InvalidSyntax { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_header_fails() {
        assert!(parse("[]\na=b\n").is_err());
    }

    #[test]
    fn empty_key_fails() {
        assert!(parse("[slink]\n=~/.a\n").is_err());
    }

    #[test]
    fn empty_input_has_no_sections() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_kv_sections(&dir.path().join("dotlink.conf")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn existing_empty_file_is_some_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dotlink.conf");
        std::fs::write(&path, "").unwrap();
        assert_eq!(parse_kv_sections(&path).unwrap(), Some(Vec::new()));
    }
}
