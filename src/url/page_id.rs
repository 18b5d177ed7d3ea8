use url::Url;

/// Derives a short map key for a page from its URL
///
/// Uses the last non-empty path segment with `-` and `.` replaced by `_`.
/// When the path is empty the host is used instead, with `.` replaced by
/// `_`. Strings that do not parse as URLs are treated as bare paths.
///
/// # Examples
///
/// ```
/// use rival_scope::url::derive_page_id;
///
/// assert_eq!(derive_page_id("https://acme.test/features/single-sign-on"), "single_sign_on");
/// assert_eq!(derive_page_id("https://www.acme.test/"), "www_acme_test");
/// ```
pub fn derive_page_id(url: &str) -> String {
    let (path, host) = match Url::parse(url) {
        Ok(parsed) => (
            parsed.path().to_string(),
            parsed.host_str().unwrap_or_default().to_string(),
        ),
        Err(_) => (url.to_string(), String::new()),
    };

    match path.split('/').rfind(|segment| !segment.is_empty()) {
        Some(segment) => segment.replace(['-', '.'], "_"),
        None => host.replace('.', "_"),
    }
}
