//! Sitepress: a same-origin site crawler that captures every page it reaches
//!
//! This crate walks a website from a root URL, follows same-origin hyperlinks,
//! and hands each page to a renderer for capture while bounding how many pages
//! are processed at once and never visiting a page twice.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitepress operations
#[derive(Debug, Error)]
pub enum PressError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Capture to {path} failed: {message}")]
    Capture { path: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl state lock poisoned during {0}")]
    StatePoisoned(&'static str),

    #[error("Scheduler closed before all work was admitted")]
    SchedulerClosed,

    #[error("Crawl went idle with {pending} page(s) still pending")]
    Stalled { pending: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No root URL given on the command line or in the config file")]
    MissingRootUrl,
}

/// Reasons a hyperlink reference is not followed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty reference")]
    Empty,

    #[error("fragment-only reference")]
    FragmentOnly,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("malformed reference: {0}")]
    Malformed(String),

    #[error("reference points back at the crawl root")]
    SelfReference,

    #[error("ignored extension: .{0}")]
    IgnoredExtension(String),

    #[error("cross-origin link to {0}")]
    CrossOrigin(String),

    #[error("matches exclusion '{0}'")]
    Excluded(String),
}

/// Result type alias for Sitepress operations
pub type Result<T> = std::result::Result<T, PressError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::crawler::{Coordinator, HttpRenderer, Renderer};
pub use crate::state::{CrawlState, WorkStatus};
pub use crate::url::CrawlScope;
