//! URL normalisation for deduplication.
//!
//! Two URLs name the same source when scheme, host and path agree after
//! canonicalisation. Query strings and fragments are ignored entirely, so
//! tracking parameters and session tokens never split one page into two.

use url::Url;

/// Normalise a URL into its deduplication key.
///
/// - scheme and host lowercased (done by [`Url::parse`])
/// - default port dropped
/// - query string and fragment dropped
/// - trailing slash removed from the path, except for the root path
///
/// Input that does not parse as a URL is trimmed and returned otherwise
/// unchanged, so malformed URLs still dedupe against exact repeats.
///
/// # Examples
///
/// ```
/// use credence_search::orchestrator::url_normalize::normalize_url;
///
/// let a = normalize_url("HTTPS://Example.EDU:443/papers/?utm_source=x#top");
/// let b = normalize_url("https://example.edu/papers");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw.trim()) else {
        return raw.trim().to_string();
    };

    parsed.set_fragment(None);
    parsed.set_query(None);
    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.to_string()
}

fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}
