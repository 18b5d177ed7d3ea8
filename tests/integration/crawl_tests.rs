//! End-to-end crawl and scrape tests
//!
//! Each test mounts a small competitor site on a wiremock server and runs
//! the coordinator or scraper against it with the reqwest fetcher.

use rival_scope::config::{load_config, Config};
use rival_scope::crawler::{CategorySelection, CrawlCoordinator, PageScraper};
use rival_scope::extract::{Currency, SeoGrade};
use rival_scope::fetch::HttpFetcher;
use rival_scope::output::{format_crawl_summary, CompanyRecord};
use rival_scope::url::UrlCategory;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEATURE_PAGE: &str = r#"<html><head><title>Single Sign-On</title></head>
<body>
  <nav><a href="/">Home</a><a href="/pricing">Pricing</a></nav>
  <h1>Single Sign-On</h1>
  <p>Connect your identity provider and let every employee sign in with one account.</p>
  <footer>Copyright Acme</footer>
</body></html>"#;

const PRICING_PAGE: &str = r#"<html><head><title>Acme Pricing</title></head>
<body>
  <h1>Plans and pricing</h1>
  <div class="pricing-tier">Starter plan for small teams</div>
  <div class="pricing-tier">Business plan with SSO and audit logs</div>
  <p>Starter is $29 per month, Business is $99 per month billed annually.</p>
  <p>Save 20% with yearly billing. Start a 14 day free trial.</p>
  <p>Enterprise: contact sales for custom pricing. Available as SaaS or on-premise.</p>
</body></html>"#;

const SEO_PAGE: &str = r#"<html lang="en"><head>
  <title>Acme Platform: Enterprise Workflow Automation</title>
  <meta name="description" content="Acme automates approval workflows for enterprise teams with SSO, audit logs and integrations for every business system you run.">
  <meta property="og:title" content="Acme Platform">
  <meta property="og:description" content="Workflow automation for enterprise teams">
  <link rel="canonical" href="https://acme.test/">
</head><body>
  <h1>Enterprise workflow automation</h1>
  <h2>Integrations</h2>
  <p>Trusted by 500 customers. SOC 2 compliant. Book a demo with our sales team.</p>
  <a href="/features">Features</a>
</body></html>"#;

fn create_test_config() -> Config {
    let mut config = Config::default();
    config.fetch.page_timeout_secs = 5;
    config.fetch.sitemap_timeout_secs = 5;
    config
}

fn fetcher(config: &Config) -> HttpFetcher {
    HttpFetcher::new(&config.fetch).expect("Failed to build fetcher")
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_site(server: &MockServer) {
    let base = server.uri();
    let urls = [
        "/features/sso",
        "/features/missing",
        "/pricing",
        "/docs/api",
        "/blog/launch",
    ];
    let entries: String = urls
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base, p))
        .collect();
    let sitemap = format!(
        r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    );

    mount_page(server, "/sitemap.xml", 200, &sitemap).await;
    mount_page(server, "/features/sso", 200, FEATURE_PAGE).await;
    mount_page(server, "/features/missing", 404, "Not Found").await;
    mount_page(server, "/pricing", 200, PRICING_PAGE).await;
    mount_page(server, "/docs/api", 200, FEATURE_PAGE).await;
    mount_page(server, "/blog/launch", 200, FEATURE_PAGE).await;
}

#[tokio::test]
async fn test_crawl_isolates_failed_page() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let config = create_test_config();
    let coordinator = CrawlCoordinator::new(fetcher(&config), &config);
    let keywords = vec!["features".to_string()];

    let report = coordinator
        .run(
            &format!("{}/sitemap.xml", server.uri()),
            &keywords,
            &CategorySelection::All,
        )
        .await
        .expect("Crawl failed");

    assert_eq!(report.total_urls, 5);
    assert_eq!(report.filtered_urls, 2);
    assert_eq!(report.categories[&UrlCategory::Features], 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].url, format!("{}/features/missing", server.uri()));

    let page = &report.pages["sso"];
    assert!(page.content.contains("Connect your identity provider"));
}

#[tokio::test]
async fn test_crawl_selects_categories_in_order() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let config = create_test_config();
    let coordinator = CrawlCoordinator::new(fetcher(&config), &config).with_concurrency(3);

    let report = coordinator
        .run(
            &format!("{}/sitemap.xml", server.uri()),
            &[],
            &CategorySelection::Categories(vec![UrlCategory::Pricing, UrlCategory::Api]),
        )
        .await
        .expect("Crawl failed");

    assert_eq!(report.selected_urls, 2);
    let ids: Vec<_> = report.pages.keys().cloned().collect();
    assert_eq!(ids, vec!["pricing", "api"]);

    let summary = format_crawl_summary(&report);
    assert!(summary.contains("- **Succeeded**: 2"));

    let mut record = CompanyRecord::new("Acme Cloud");
    record.merge_features(report.pages);
    assert_eq!(record.slug(), "acme_cloud");
    assert_eq!(record.features.len(), 2);
}

#[tokio::test]
async fn test_scrape_pricing_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/pricing", 200, PRICING_PAGE).await;

    let config = create_test_config();
    let scraper = PageScraper::from_config(fetcher(&config), &config);
    let page = scraper
        .scrape_pricing(&format!("{}/pricing", server.uri()))
        .await
        .expect("Pricing scrape failed");

    let amounts: Vec<f64> = page.pricing.prices.iter().map(|p| p.amount).collect();
    assert!(amounts.contains(&29.0));
    assert!(amounts.contains(&99.0));
    assert_eq!(page.pricing.currency, Some(Currency::Usd));
    assert_eq!(page.pricing.plans.len(), 2);
    assert!(page.pricing.discounts.contains("20%"));
    assert!(page.pricing.free_trials.contains("14 day"));
    assert!(!page.availability.deployment_options.is_empty());
    assert!(!page.availability.contact_requirements.is_empty());
}

#[tokio::test]
async fn test_scrape_seo_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, SEO_PAGE).await;

    let config = create_test_config();
    let scraper = PageScraper::from_config(fetcher(&config), &config);
    let page = scraper
        .scrape_seo(&format!("{}/", server.uri()))
        .await
        .expect("SEO scrape failed");

    assert_eq!(page.meta_tags.title, "Acme Platform: Enterprise Workflow Automation");
    assert_eq!(page.meta_tags.canonical, "https://acme.test/");
    assert!(page.seo_analysis.score > 0);
    assert_eq!(page.seo_analysis.grade, SeoGrade::from_score(page.seo_analysis.score));
}

#[tokio::test]
async fn test_homepage_http_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 503, "Unavailable").await;

    let config = create_test_config();
    let scraper = PageScraper::from_config(fetcher(&config), &config);
    let result = scraper.scrape(&format!("{}/", server.uri())).await;

    assert!(matches!(
        result,
        Err(rival_scope::FetchError::Http { status: 503, .. })
    ));
}

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"
[fetch]
user-agent = "TestBot/1.0"

[crawl]
concurrency = 4
keywords = ["features", "pricing"]
"#
    )
    .expect("Failed to write config");

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.fetch.user_agent, "TestBot/1.0");
    assert_eq!(config.crawl.concurrency, 4);
    assert_eq!(config.crawl.keywords, vec!["features", "pricing"]);
    assert_eq!(config.crawl.sitemap_max_depth, 5);
}
