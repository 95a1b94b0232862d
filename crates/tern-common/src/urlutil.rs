//! URL resolution helpers.
//!
//! Stylesheets and images reference resources relative to the document
//! (or stylesheet) base URL. Resolution is delegated to the [`url`]
//! crate; the helpers here cover the cases the engine actually needs:
//! joining a possibly-relative reference against an optional base, and
//! turning bare filesystem paths into `file:` URLs.

use url::Url;

/// Resolve `reference` against `base`.
///
/// - An absolute reference (scheme present) is returned as-is.
/// - A relative reference is joined against `base` when one is given.
/// - Without a usable base, the reference is tried as a filesystem path.
///
/// Returns `None` when the reference cannot be interpreted at all; the
/// engine substitutes placeholder geometry in that case (zero-sized
/// image, empty stylesheet).
pub fn resolve(base: Option<&Url>, reference: &str) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Ok(abs) = Url::parse(reference) {
        return Some(abs);
    }

    if let Some(base) = base {
        if let Ok(joined) = base.join(reference) {
            return Some(joined);
        }
    }

    // Last resort: treat it as a local path.
    let path = std::path::Path::new(reference);
    if path.is_absolute() {
        Url::from_file_path(path).ok()
    } else {
        let cwd = std::env::current_dir().ok()?;
        Url::from_file_path(cwd.join(path)).ok()
    }
}

/// Build a `file:` URL for a filesystem path, absolutizing relative ones.
pub fn file_url(path: &std::path::Path) -> Option<Url> {
    if path.is_absolute() {
        Url::from_file_path(path).ok()
    } else {
        let cwd = std::env::current_dir().ok()?;
        Url::from_file_path(cwd.join(path)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_reference_passes_through() {
        let base = Url::parse("http://example.com/a/b.html").unwrap();
        let out = resolve(Some(&base), "http://other.org/x.css").unwrap();
        assert_eq!(out.as_str(), "http://other.org/x.css");
    }

    #[test]
    fn relative_reference_joins_base() {
        let base = Url::parse("http://example.com/a/b.html").unwrap();
        let out = resolve(Some(&base), "bg.png").unwrap();
        assert_eq!(out.as_str(), "http://example.com/a/bg.png");
    }

    #[test]
    fn empty_reference_is_none() {
        assert!(resolve(None, "   ").is_none());
    }
}
