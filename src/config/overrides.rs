use crate::config::types::{ColorScheme, Config, Media};
use std::path::PathBuf;

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_url: Option<String>,
    pub max_concurrent_pages: Option<usize>,
    /// Appended to the file's exclusions
    pub exclude: Vec<String>,
    pub dry_run: bool,
    pub skip_existing: bool,
    pub verbose: bool,
    pub navigation_timeout: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub media: Option<Media>,
    pub color_scheme: Option<ColorScheme>,
    pub header_footer: bool,
    pub report_path: Option<PathBuf>,
}

impl Overrides {
    /// Applies the overrides on top of `config`
    ///
    /// Flags can only switch a setting on; a setting enabled in the file
    /// stays enabled.
    pub fn apply(self, config: &mut Config) {
        if let Some(root_url) = self.root_url {
            config.crawler.root_url = Some(root_url);
        }
        if let Some(limit) = self.max_concurrent_pages {
            config.crawler.max_concurrent_pages = limit;
        }
        config.crawler.exclude.extend(self.exclude);
        config.crawler.dry_run |= self.dry_run;
        config.crawler.skip_existing |= self.skip_existing;
        config.crawler.verbose |= self.verbose;
        if let Some(timeout) = self.navigation_timeout {
            config.crawler.navigation_timeout = timeout;
        }

        if let Some(output_dir) = self.output_dir {
            config.capture.output_dir = output_dir;
        }
        if let Some(media) = self.media {
            config.capture.media = media;
        }
        if let Some(color_scheme) = self.color_scheme {
            config.capture.color_scheme = color_scheme;
        }
        config.capture.header_footer |= self.header_footer;

        if let Some(report_path) = self.report_path {
            config.output.report_path = Some(report_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        config.crawler.root_url = Some("https://file.example/".to_string());
        config.crawler.exclude = vec!["/a".to_string()];

        Overrides {
            root_url: Some("https://cli.example/".to_string()),
            max_concurrent_pages: Some(2),
            exclude: vec!["/b".to_string()],
            dry_run: true,
            media: Some(Media::Print),
            output_dir: Some(PathBuf::from("elsewhere")),
            ..Overrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.crawler.root_url.as_deref(), Some("https://cli.example/"));
        assert_eq!(config.crawler.max_concurrent_pages, 2);
        assert_eq!(config.crawler.exclude, vec!["/a".to_string(), "/b".to_string()]);
        assert!(config.crawler.dry_run);
        assert_eq!(config.capture.media, Media::Print);
        assert_eq!(config.capture.output_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let mut config = Config::default();
        config.crawler.skip_existing = true;
        config.capture.color_scheme = ColorScheme::Dark;

        Overrides::default().apply(&mut config);

        assert!(config.crawler.skip_existing);
        assert_eq!(config.capture.color_scheme, ColorScheme::Dark);
        assert_eq!(config.crawler.max_concurrent_pages, 4);
    }
}
