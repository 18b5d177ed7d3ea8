//! Configuration module for Rival-Scope
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an empty file (or no file) yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use rival_scope::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("rival-scope.toml")).unwrap();
//! println!("Sitemap depth cap: {}", config.crawl.sitemap_max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FetchConfig, SanitizerConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
