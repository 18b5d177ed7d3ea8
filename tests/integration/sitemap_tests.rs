//! Sitemap resolution against a mock server

use rival_scope::config::FetchConfig;
use rival_scope::fetch::HttpFetcher;
use rival_scope::sitemap::SitemapResolver;
use rival_scope::SitemapError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

fn resolver() -> SitemapResolver<HttpFetcher> {
    let fetcher = HttpFetcher::new(&FetchConfig::default()).expect("Failed to build fetcher");
    SitemapResolver::new(fetcher)
}

#[tokio::test]
async fn test_resolve_sitemap_index() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-a.xml", base),
            format!("{}/sitemap-b.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-a.xml",
        urlset(&[
            format!("{}/features/sso", base),
            format!("{}/features/audit-log", base),
            format!("{}/pricing", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-b.xml",
        urlset(&[format!("{}/docs/api", base), format!("{}/blog/launch", base)]),
    )
    .await;

    let resolution = resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .expect("Resolution failed");

    assert_eq!(resolution.urls.len(), 5);
    assert_eq!(resolution.urls[0], format!("{}/features/sso", base));
    assert_eq!(resolution.urls[4], format!("{}/blog/launch", base));
    assert!(resolution.failures.is_empty());
}

#[tokio::test]
async fn test_failed_child_sitemap_is_isolated() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-missing.xml", base),
            format!("{}/sitemap-ok.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-ok.xml",
        urlset(&[format!("{}/features/sso", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolution = resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .expect("Resolution failed");

    assert_eq!(resolution.urls, vec![format!("{}/features/sso", base)]);
    assert_eq!(resolution.failures.len(), 1);
    assert_eq!(
        resolution.failures[0].url,
        format!("{}/sitemap-missing.xml", base)
    );
}

#[tokio::test]
async fn test_malformed_root_yields_empty_list() {
    let server = MockServer::start().await;
    mount_xml(&server, "/sitemap.xml", "<urlset><url><loc>".to_string()).await;

    let resolution = resolver()
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await
        .expect("Malformed XML should not be an error");

    assert!(resolution.urls.is_empty());
    assert_eq!(resolution.failures.len(), 1);
}

#[tokio::test]
async fn test_unreachable_root_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await;

    assert!(matches!(result, Err(SitemapError::Fetch(_))));
}
