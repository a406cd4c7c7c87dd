use std::collections::HashSet;
use std::path::Path;

use super::directive::Directive;
use super::scope::ConfigScope;
use crate::operations::FileSystemOps;

/// A validation warning detected while loading a config scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The config file that triggered the warning.
    pub source: String,
    /// The entry name the warning is about.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for config scope validators.
///
/// Validators never reject a scope; they only surface entries that parse but
/// are unlikely to do what the author meant.
pub trait ConfigValidator {
    /// Validate the scope and return any warnings found.
    fn validate(&self, scope: &ConfigScope) -> Vec<ValidationWarning>;
}

/// Flags base names listed more than once, either under several directives
/// (only the highest-priority one applies) or twice in one section (only the
/// first applies).
#[derive(Debug)]
pub struct DuplicateNameValidator;

impl ConfigValidator for DuplicateNameValidator {
    fn validate(&self, scope: &ConfigScope) -> Vec<ValidationWarning> {
        let source = scope.file.display().to_string();
        let mut warnings = Vec::new();
        let mut reported = HashSet::new();

        for directive in Directive::PRIORITY {
            let mut seen_in_section = HashSet::new();
            for mapping in scope.mappings(directive) {
                if !seen_in_section.insert(mapping.name.as_str()) {
                    warnings.push(ValidationWarning::new(
                        &source,
                        &mapping.name,
                        format!(
                            "listed more than once under [{directive}] (line {}); \
                             the first entry is used",
                            mapping.line
                        ),
                    ));
                }

                let directives = scope.directives_for(&mapping.name);
                if let [winner, _, ..] = directives.as_slice()
                    && reported.insert(mapping.name.as_str())
                {
                    let names: Vec<&str> = directives.iter().map(|d| d.as_str()).collect();
                    warnings.push(ValidationWarning::new(
                        &source,
                        &mapping.name,
                        format!(
                            "listed under several directives ({}); [{winner}] takes precedence",
                            names.join(", ")
                        ),
                    ));
                }
            }
        }

        warnings
    }
}

/// Flags destinations that will be used verbatim although they look like
/// they were meant to be expanded or anchored.
#[derive(Debug)]
pub struct DestinationValidator;

impl ConfigValidator for DestinationValidator {
    fn validate(&self, scope: &ConfigScope) -> Vec<ValidationWarning> {
        let source = scope.file.display().to_string();
        let mut warnings = Vec::new();

        for directive in Directive::PRIORITY {
            if !directive.needs_destination() {
                continue;
            }
            for mapping in scope.mappings(directive) {
                let dest = mapping.destination.as_str();
                if dest.starts_with('~') {
                    if dest != "~" && !dest.starts_with("~/") && !dest.starts_with("~\\") {
                        warnings.push(ValidationWarning::new(
                            &source,
                            &mapping.name,
                            format!("'{dest}': only '~' and '~/' are expanded; path used as is"),
                        ));
                    }
                } else if !Path::new(dest).is_absolute() {
                    warnings.push(ValidationWarning::new(
                        &source,
                        &mapping.name,
                        format!(
                            "'{dest}' is relative; it resolves against the current directory"
                        ),
                    ));
                }
            }
        }

        warnings
    }
}

/// Flags entry names that can never match a sibling of the config file.
#[derive(Debug)]
pub struct EntryNameValidator<'a> {
    /// Used to check that each named sibling exists.
    pub fs_ops: &'a dyn FileSystemOps,
}

impl ConfigValidator for EntryNameValidator<'_> {
    fn validate(&self, scope: &ConfigScope) -> Vec<ValidationWarning> {
        let source = scope.file.display().to_string();
        let mut warnings = Vec::new();

        for directive in Directive::PRIORITY {
            for mapping in scope.mappings(directive) {
                if mapping.name.contains('/') || mapping.name.contains('\\') {
                    warnings.push(ValidationWarning::new(
                        &source,
                        &mapping.name,
                        "entry names are base names; a path separator never matches",
                    ));
                } else if directive != Directive::Ignore
                    && !self.fs_ops.exists(&scope.dir.join(&mapping.name))
                {
                    warnings.push(ValidationWarning::new(
                        &source,
                        &mapping.name,
                        format!("no such file in {}", scope.dir.display()),
                    ));
                }
            }
        }

        warnings
    }
}

/// Run every validator against `scope`.
#[must_use]
pub fn validate_scope(scope: &ConfigScope, fs_ops: &dyn FileSystemOps) -> Vec<ValidationWarning> {
    let validators: [&dyn ConfigValidator; 3] = [
        &DuplicateNameValidator,
        &DestinationValidator,
        &EntryNameValidator { fs_ops },
    ];
    validators
        .iter()
        .flat_map(|v| v.validate(scope))
        .collect()
}
