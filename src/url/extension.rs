use url::Url;

/// Path extensions that never lead to a capturable document
///
/// Images, stylesheets, scripts, fonts, audio/video, archives and document
/// formats that are already rendered artifacts themselves.
const IGNORED_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "tif", "tiff", "avif",
    // styles and scripts
    "css", "js", "mjs", "map", "json", "xml", "rss", "atom",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // audio and video
    "mp3", "mp4", "m4a", "ogg", "wav", "webm", "avi", "mov", "mkv",
    // archives and binaries
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "dmg", "exe", "msi", "apk",
    // already-rendered documents
    "pdf", "epub", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "csv",
];

/// Returns the lowercase extension of the URL's last path segment if it is
/// on the ignore list
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitepress::url::ignored_extension;
///
/// let logo = Url::parse("https://site.example/img/Logo.PNG").unwrap();
/// assert_eq!(ignored_extension(&logo), Some("png".to_string()));
///
/// let page = Url::parse("https://site.example/guide.html").unwrap();
/// assert_eq!(ignored_extension(&page), None);
/// ```
pub fn ignored_extension(url: &Url) -> Option<String> {
    let last_segment = url.path().rsplit('/').next()?;
    let (_, extension) = last_segment.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    if IGNORED_EXTENSIONS.contains(&extension.as_str()) {
        Some(extension)
    } else {
        None
    }
}
