//! The four installation strategies a `dotlink.conf` section can name.
use std::fmt;

/// How a target is placed at its destination.
///
/// # Examples
///
/// ```
/// use dotlink::config::Directive;
///
/// assert_eq!(Directive::parse("SLINK"), Some(Directive::Slink));
/// assert_eq!(Directive::parse("symlink"), None);
/// assert_eq!(Directive::Copy.to_string(), "copy");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Directive {
    /// Symbolic link from destination to source.
    Slink,
    /// Hard link from destination to source.
    Hlink,
    /// Byte copy of source (recursive for directories).
    Copy,
    /// Explicitly left alone.
    Ignore,
}

impl Directive {
    /// Order in which sections are probed for a base name; the first
    /// directive with a match wins.
    pub const PRIORITY: [Self; 4] = [Self::Ignore, Self::Slink, Self::Copy, Self::Hlink];

    /// Section name as written in `dotlink.conf`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slink => "slink",
            Self::Hlink => "hlink",
            Self::Copy => "copy",
            Self::Ignore => "ignore",
        }
    }

    /// Parse a section header, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::PRIORITY
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
    }

    /// Whether entries of this directive must carry a destination path.
    #[must_use]
    pub const fn needs_destination(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_ignore_slink_copy_hlink() {
        assert_eq!(
            Directive::PRIORITY,
            [
                Directive::Ignore,
                Directive::Slink,
                Directive::Copy,
                Directive::Hlink
            ]
        );
    }

    #[test]
    fn parse_round_trips_every_directive() {
        for d in Directive::PRIORITY {
            assert_eq!(Directive::parse(d.as_str()), Some(d));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(Directive::parse("  Hlink "), Some(Directive::Hlink));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Directive::parse("link"), None);
        assert_eq!(Directive::parse(""), None);
    }

    #[test]
    fn only_ignore_skips_destination() {
        assert!(!Directive::Ignore.needs_destination());
        assert!(Directive::Slink.needs_destination());
        assert!(Directive::Hlink.needs_destination());
        assert!(Directive::Copy.needs_destination());
    }
}
