//! Configuration module for Sitepress
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and layering command-line overrides on top of them.
//!
//! # Example
//!
//! ```no_run
//! use sitepress::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitepress.toml")).unwrap();
//! println!("Artifacts go to: {}", config.capture.output_dir.display());
//! ```

mod overrides;
mod parser;
mod types;
mod validation;

// Re-export types
pub use overrides::Overrides;
pub use types::{
    CaptureConfig, ColorScheme, Config, CrawlerConfig, Media, OutputConfig, UserAgentConfig,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{require_root_url, validate, MAX_CONCURRENT_PAGES};
