//! Layered configuration for the `contacts` command.
//!
//! Values are resolved in increasing priority: built-in defaults, the TOML file given with
//! `--config`, `-S key=value` overrides, then explicit command-line flags.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_contacts_config;
pub use models::ContactsConfig;
