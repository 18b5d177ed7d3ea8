use url::Url;

/// Checks if a URL mentions a keyword
///
/// The comparison is a case-insensitive substring match against the full
/// URL and against its path alone.
///
/// # Arguments
///
/// * `url` - The URL to check
/// * `keyword` - The keyword, in any case
///
/// # Examples
///
/// ```
/// use rival_scope::url::matches_keyword;
///
/// assert!(matches_keyword("https://acme.test/Features/SSO", "sso"));
/// assert!(matches_keyword("https://acme.test/features", "ACME"));
/// assert!(!matches_keyword("https://acme.test/features", "pricing"));
/// ```
pub fn matches_keyword(url: &str, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    if url.to_lowercase().contains(&keyword) {
        return true;
    }
    Url::parse(url)
        .map(|parsed| parsed.path().to_lowercase().contains(&keyword))
        .unwrap_or(false)
}

/// Keeps the URLs that mention at least one keyword
///
/// With no keywords every URL passes unchanged. Input order is preserved.
pub fn filter_urls(urls: &[String], keywords: &[String]) -> Vec<String> {
    if keywords.is_empty() {
        return urls.to_vec();
    }

    let filtered: Vec<String> = urls
        .iter()
        .filter(|url| keywords.iter().any(|keyword| matches_keyword(url, keyword)))
        .cloned()
        .collect();

    tracing::info!(
        "Filtered {} URLs to {} matching keywords {:?}",
        urls.len(),
        filtered.len(),
        keywords
    );
    filtered
}
