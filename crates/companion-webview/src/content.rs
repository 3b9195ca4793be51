//! Local content serving via custom protocol.
//!
//! Registers a `companion://` custom protocol so the overlay page, its
//! scripts and the model files load without a local HTTP server.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Serves files below a base directory.
///
/// A request for `companion://localhost/overlay/index.html` resolves to
/// `{base_dir}/overlay/index.html`.
pub struct ContentProvider {
    base_dir: PathBuf,
    /// path -> (mime, data), checked before the filesystem.
    overrides: HashMap<String, (String, Vec<u8>)>,
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Register an in-memory asset, e.g. generated settings for the page.
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.overrides
            .insert(path.into(), (mime.into(), data.into()));
    }

    /// Resolve a request path to its MIME type and bytes.
    ///
    /// Query strings and fragments are ignored. Paths escaping the base
    /// directory (`..`, absolute paths, symlinks) resolve to `None`.
    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let clean = path.trim_start_matches('/');

        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        let file_path = self.base_dir.join(clean);

        // Canonicalize both sides so symlinks and `..` cannot escape.
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        let mime = mime_from_extension(&file_path);
        Some((Cow::Owned(mime.to_string()), Cow::Owned(data)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        // Cubism model binaries
        Some("moc3") => "application/octet-stream",
        Some("woff2") => "font/woff2",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("overlay")).unwrap();
        std::fs::create_dir_all(dir.path().join("models/hiyori")).unwrap();
        std::fs::write(
            dir.path().join("overlay/index.html"),
            "<html><body><div id=\"lock-icon\"></div></body></html>",
        )
        .unwrap();
        std::fs::write(dir.path().join("overlay/overlay.js"), "// bridge").unwrap();
        std::fs::write(dir.path().join("models/hiyori/hiyori.model3.json"), "{}").unwrap();
        dir
    }

    #[test]
    fn resolves_overlay_page() {
        let dir = fixture();
        let cp = ContentProvider::new(dir.path());
        let (mime, data) = cp.resolve("overlay/index.html").unwrap();
        assert_eq!(mime.as_ref(), "text/html");
        assert!(String::from_utf8_lossy(&data).contains("lock-icon"));
    }

    #[test]
    fn resolves_scripts_and_model_files() {
        let dir = fixture();
        let cp = ContentProvider::new(dir.path());
        assert_eq!(
            cp.resolve("overlay/overlay.js").unwrap().0.as_ref(),
            "application/javascript"
        );
        assert_eq!(
            cp.resolve("models/hiyori/hiyori.model3.json").unwrap().0.as_ref(),
            "application/json"
        );
    }

    #[test]
    fn strips_leading_slash_and_query() {
        let dir = fixture();
        let cp = ContentProvider::new(dir.path());
        assert!(cp.resolve("/overlay/index.html").is_some());
        assert!(cp.resolve("overlay/overlay.js?v=3#top").is_some());
    }

    #[test]
    fn traversal_is_blocked() {
        let dir = fixture();
        let outside = dir.path().parent().unwrap().join("companion-secret.txt");
        let _ = std::fs::write(&outside, "secret");
        let cp = ContentProvider::new(dir.path().join("overlay"));

        assert!(cp.resolve("../models/hiyori/hiyori.model3.json").is_none());
        assert!(cp.resolve("../../companion-secret.txt").is_none());
        assert!(cp.resolve("/etc/passwd").is_none());
        let _ = std::fs::remove_file(outside);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_is_blocked() {
        let dir = fixture();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("token.txt"), "t").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("overlay/link")).unwrap();

        let cp = ContentProvider::new(dir.path());
        assert!(cp.resolve("overlay/link/token.txt").is_none());
    }

    #[test]
    fn directories_and_missing_files_resolve_to_none() {
        let dir = fixture();
        let cp = ContentProvider::new(dir.path());
        assert!(cp.resolve("overlay").is_none());
        assert!(cp.resolve("overlay/missing.html").is_none());
    }

    #[test]
    fn override_takes_precedence() {
        let dir = fixture();
        let mut cp = ContentProvider::new(dir.path());
        cp.add_override("overlay/index.html", "text/html", b"<html>override</html>".to_vec());
        let (_, data) = cp.resolve("overlay/index.html").unwrap();
        assert_eq!(data.as_ref(), b"<html>override</html>");
    }

    #[test]
    fn mime_types() {
        assert_eq!(mime_from_extension(Path::new("a.css")), "text/css");
        assert_eq!(mime_from_extension(Path::new("a.mjs")), "application/javascript");
        assert_eq!(mime_from_extension(Path::new("a.png")), "image/png");
        assert_eq!(
            mime_from_extension(Path::new("hiyori.moc3")),
            "application/octet-stream"
        );
        assert_eq!(mime_from_extension(Path::new("x.xyz")), "application/octet-stream");
    }
}
