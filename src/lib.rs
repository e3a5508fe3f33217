//! biblio: bounded literature search over a Zotero library.
//!
//! Host package around [`biblio_search`]. It loads configuration from a
//! TOML file in the platform config directory and hands it to the search
//! core. The `biblio` binary is a thin command-line front end.

pub mod biblio_dirs;
pub mod config;
pub mod error;

pub use config::{AppConfig, OutputConfig};
pub use error::{BiblioError, Result};

pub use biblio_search;
