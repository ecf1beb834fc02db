//! Configuration for the Best Look site server
//!
//! One TOML file at `~/.config/bestlook/site.toml` holds the bind
//! address, the message store location, the admin credentials, and the
//! optional email-notification relay. Written by `bestlook-setup`, read
//! by `bestlook-site` at startup.

mod config;
mod error;
pub mod obfuscate;
pub mod paths;

pub use config::{
    generate_password, AdminConfig, NotifyConfig, ServerConfig, SiteConfig, StoreConfig,
};
pub use error::ConfigError;
