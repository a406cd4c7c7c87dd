//! Parsed `dotlink.conf` for one directory.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::CONFIG_FILE_NAME;
use super::directive::Directive;
use super::ini::{self, KvSection};
use crate::error::ConfigError;

/// One `name = destination` line from a directive section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Base name of a sibling of the config file.
    pub name: String,
    /// Destination as written (may start with `~`). Empty for `[ignore]`
    /// entries that carry no value.
    pub destination: String,
    /// 1-based line number in the config file.
    pub line: usize,
}

/// The directive-to-mapping table for one directory.
///
/// Scopes are loaded on demand and never cached; every lookup during a run
/// re-reads the file so edits between targets are picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigScope {
    /// Directory the config file lives in.
    pub dir: PathBuf,
    /// Full path of the config file.
    pub file: PathBuf,
    sections: BTreeMap<Directive, Vec<Mapping>>,
}

impl ConfigScope {
    /// Load the config file that sits directly inside `dir`.
    ///
    /// Returns `Ok(None)` when `dir` has no config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or names an
    /// unknown directive.
    pub fn load(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let file = dir.join(CONFIG_FILE_NAME);
        ini::parse_kv_sections(&file)?
            .map(|sections| Self::from_sections(dir, &file, sections))
            .transpose()
    }

    /// Build a scope from config text, as if it had been read from `dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use dotlink::config::{ConfigScope, Directive};
    ///
    /// let content = "[slink]\ngitconfig=~/.gitconfig\n";
    /// let scope = ConfigScope::parse(Path::new("git"), content).unwrap();
    /// assert_eq!(
    ///     scope.find_destination(Directive::Slink, "gitconfig"),
    ///     Some("~/.gitconfig")
    /// );
    /// assert_eq!(scope.find_destination(Directive::Copy, "gitconfig"), None);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error on unknown directives or malformed lines.
    pub fn parse(dir: &Path, content: &str) -> Result<Self, ConfigError> {
        let file = dir.join(CONFIG_FILE_NAME);
        let sections = ini::parse_kv_sections_from_str(content, &file)?;
        Self::from_sections(dir, &file, sections)
    }

    fn from_sections(
        dir: &Path,
        file: &Path,
        sections: Vec<KvSection>,
    ) -> Result<Self, ConfigError> {
        let mut table: BTreeMap<Directive, Vec<Mapping>> = BTreeMap::new();

        for section in sections {
            let directive =
                Directive::parse(&section.header).ok_or_else(|| ConfigError::UnknownDirective {
                    file: file.to_path_buf(),
                    line: section.line,
                    name: section.header.clone(),
                })?;

            let mappings = table.entry(directive).or_default();
            for entry in section.entries {
                let destination = entry.value.unwrap_or_default();
                if directive.needs_destination() && destination.is_empty() {
                    return Err(ConfigError::InvalidSyntax {
                        file: file.to_path_buf(),
                        line: entry.line,
                        message: format!(
                            "[{directive}] entry '{}' has no destination",
                            entry.key
                        ),
                    });
                }
                mappings.push(Mapping {
                    name: entry.key,
                    destination,
                    line: entry.line,
                });
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            file: file.to_path_buf(),
            sections: table,
        })
    }

    /// Destination recorded for `name` under `directive`.
    ///
    /// When a name repeats inside one section the first entry wins.
    #[must_use]
    pub fn find_destination(&self, directive: Directive, name: &str) -> Option<&str> {
        self.mappings(directive)
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.destination.as_str())
    }

    /// Probe directives in [`Directive::PRIORITY`] order and return the
    /// first one that lists `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(Directive, &str)> {
        Directive::PRIORITY.into_iter().find_map(|directive| {
            self.find_destination(directive, name)
                .map(|dest| (directive, dest))
        })
    }

    /// All mappings under `directive`, in file order.
    #[must_use]
    pub fn mappings(&self, directive: Directive) -> &[Mapping] {
        self.sections.get(&directive).map_or(&[], Vec::as_slice)
    }

    /// Every directive whose section lists `name`, in priority order.
    #[must_use]
    pub fn directives_for(&self, name: &str) -> Vec<Directive> {
        Directive::PRIORITY
            .into_iter()
            .filter(|d| self.find_destination(*d, name).is_some())
            .collect()
    }
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

    fn scope(content: &str) -> ConfigScope {
        ConfigScope::parse(Path::new("/repo/git"), content).expect("test config should parse")
    }

    #[test]
    fn lookup_finds_single_directive() {
        let s = scope("[slink]\ngitconfig=~/.gitconfig\n");
        assert_eq!(
            s.lookup("gitconfig"),
            Some((Directive::Slink, "~/.gitconfig"))
        );
        assert_eq!(s.lookup("gitignore"), None);
    }

    #[test]
    fn lookup_prefers_ignore_then_slink_then_copy_then_hlink() {
        let s = scope("[hlink]\na=/h\n[copy]\na=/c\n[slink]\na=/s\n[ignore]\na\n");
        assert_eq!(s.lookup("a"), Some((Directive::Ignore, "")));

        let s = scope("[hlink]\na=/h\n[copy]\na=/c\n[slink]\na=/s\n");
        assert_eq!(s.lookup("a"), Some((Directive::Slink, "/s")));

        let s = scope("[hlink]\na=/h\n[copy]\na=/c\n");
        assert_eq!(s.lookup("a"), Some((Directive::Copy, "/c")));
    }

    #[test]
    fn duplicate_name_within_section_first_wins() {
        let s = scope("[slink]\nvimrc=~/.vimrc\nvimrc=~/.vim/vimrc\n");
        assert_eq!(s.find_destination(Directive::Slink, "vimrc"), Some("~/.vimrc"));
        assert_eq!(s.mappings(Directive::Slink).len(), 2);
    }

    #[test]
    fn repeated_header_accumulates() {
        let s = scope("[slink]\na=/a\n[copy]\nb=/b\n[slink]\nc=/c\n");
        let names: Vec<&str> = s
            .mappings(Directive::Slink)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn ignore_accepts_bare_and_valued_entries() {
        let s = scope("[ignore]\nREADME\nLICENSE=whatever\n");
        assert_eq!(s.find_destination(Directive::Ignore, "README"), Some(""));
        assert_eq!(
            s.find_destination(Directive::Ignore, "LICENSE"),
            Some("whatever")
        );
    }

    #[test]
    fn missing_destination_is_rejected_outside_ignore() {
        let err = ConfigScope::parse(Path::new("/r"), "[copy]\nbashrc\n").unwrap_err();
        assert!(err.to_string().contains("no destination"), "{err}");
        assert!(ConfigScope::parse(Path::new("/r"), "[copy]\nbashrc=\n").is_err());
    }

    #[test]
    fn unknown_directive_is_fatal_with_line() {
        let err = ConfigScope::parse(Path::new("/r"), "[slink]\na=/a\n\n[symlink]\nb=/b\n")
            .unwrap_err();
        match err {
            ConfigError::UnknownDirective { line, name, .. } => {
                assert_eq!(line, 4);
                assert_eq!(name, "symlink");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_is_case_insensitive() {
        let s = scope("[SLINK]\na=/a\n");
        assert_eq!(s.lookup("a"), Some((Directive::Slink, "/a")));
    }

    #[test]
    fn directives_for_lists_all_matches_in_priority_order() {
        let s = scope("[copy]\na=/c\n[ignore]\na\n");
        assert_eq!(s.directives_for("a"), [Directive::Ignore, Directive::Copy]);
    }

    #[test]
    fn load_returns_none_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigScope::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[copy]\nx=/tmp/x\n").unwrap();
        let s = ConfigScope::load(dir.path()).unwrap().expect("scope present");
        assert_eq!(s.dir, dir.path());
        assert_eq!(s.file, dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(s.mappings(Directive::Copy).len(), 1);
    }

    #[test]
    fn empty_config_file_is_an_empty_scope() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "# nothing yet\n").unwrap();
        let s = ConfigScope::load(dir.path()).unwrap().expect("scope present");
        assert!(Directive::PRIORITY.into_iter().all(|d| s.mappings(d).is_empty()));
    }

    #[test]
    fn parsed_scope_snapshot() {
        let s = scope("[slink]\ngitconfig = ~/.gitconfig\n[ignore]\nREADME.md\n");
        let rendered: Vec<String> = Directive::PRIORITY
            .into_iter()
            .flat_map(|d| {
                s.mappings(d)
                    .iter()
                    .map(move |m| format!("{d} {}={} (line {})", m.name, m.destination, m.line))
            })
            .collect();
        insta::assert_snapshot!(rendered.join("\n"), @r"
        ignore README.md= (line 4)
        slink gitconfig=~/.gitconfig (line 2)
        ");
    }
}
