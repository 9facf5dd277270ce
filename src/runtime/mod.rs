//! Site runtime: configuration and the hyper HTTP server.

mod config;
mod server;

pub use config::{ConfigError, SiteConfig};
pub use server::SiteServer;
