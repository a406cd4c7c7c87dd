//! Per-directory `dotlink.conf` configuration.
//!
//! Each directory of the dotfiles tree may carry one config file. It is read
//! by [`ini`], interpreted into a [`ConfigScope`] by [`scope`], and checked
//! for suspicious entries by [`validation`].
pub mod directive;
pub mod ini;
pub mod scope;
pub mod validation;

pub use directive::Directive;
pub use scope::{ConfigScope, Mapping};

/// File name of the per-directory configuration file.
pub const CONFIG_FILE_NAME: &str = "dotlink.conf";
