use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for Sitepress
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its origin bounds the crawl
    #[serde(default)]
    pub root_url: Option<String>,

    /// Maximum number of pages processed at once
    #[serde(default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,

    /// URLs containing any of these substrings are never followed
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Crawl and report without writing artifacts
    #[serde(default)]
    pub dry_run: bool,

    /// Leave an existing artifact in place instead of capturing again
    #[serde(default)]
    pub skip_existing: bool,

    /// Log at debug level without passing -v
    #[serde(default)]
    pub verbose: bool,

    /// Seconds before a navigation is abandoned as failed
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            max_concurrent_pages: default_max_concurrent_pages(),
            exclude: Vec::new(),
            dry_run: false,
            skip_existing: false,
            verbose: false,
            navigation_timeout: default_navigation_timeout(),
        }
    }
}

fn default_max_concurrent_pages() -> usize {
    4
}

fn default_navigation_timeout() -> u64 {
    30
}

/// Capture artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CaptureConfig {
    /// Directory artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// CSS media type to emulate
    #[serde(default)]
    pub media: Media,

    /// Preferred color scheme to emulate
    #[serde(default)]
    pub color_scheme: ColorScheme,

    /// Add a header with the page title and URL and a footer with the
    /// capture time
    #[serde(default)]
    pub header_footer: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            media: Media::default(),
            color_scheme: ColorScheme::default(),
            header_footer: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("press")
}

/// CSS media type applied to a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Media {
    #[default]
    Screen,
    Print,
}

impl Media {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Print => "print",
        }
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred color scheme applied to a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
    NoPreference,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::NoPreference => "no-preference",
        }
    }

    /// Value of the `color-scheme` meta tag for this preference
    pub fn meta_content(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::NoPreference => "light dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version of the crawler
    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

fn default_agent_name() -> String {
    "sitepress".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where to write the markdown crawl report, if anywhere
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}
