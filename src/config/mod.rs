//! Configuration handling for SiteGauge
//!
//! TOML configuration with kebab-case keys, validated on load. Every
//! section is optional; a missing file yields the built-in defaults, so the
//! CLI works with nothing but a seed URL.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, OutputConfig, RenderFallbackConfig, UserAgentConfig};
pub use validation::validate;
