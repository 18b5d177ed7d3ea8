//! Markdown summary generation
//!
//! Renders a human-readable summary of one crawl: URL counts, the category
//! breakdown, the scrape tally and whatever failed along the way.

use crate::crawler::CrawlReport;

/// Failures listed before the rest are elided
const MAX_LISTED_FAILURES: usize = 50;

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl
///
/// # Returns
///
/// A formatted markdown string
pub fn format_crawl_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Rival-Scope Crawl Summary\n\n");
    md.push_str(&format!("- **Sitemap**: {}\n\n", report.sitemap_url));

    // Overall counts
    md.push_str("## URL Statistics\n\n");
    md.push_str(&format!("- **URLs in Sitemap**: {}\n", report.total_urls));
    md.push_str(&format!("- **After Keyword Filter**: {}\n", report.filtered_urls));
    md.push_str(&format!("- **Selected for Scraping**: {}\n\n", report.selected_urls));

    // Category breakdown
    md.push_str("## Category Breakdown\n\n");
    md.push_str("| Category | URLs |\n");
    md.push_str("|----------|------|\n");
    for (category, count) in &report.categories {
        md.push_str(&format!("| {} | {} |\n", category, count));
    }
    md.push('\n');

    // Scrape results
    md.push_str("## Scrape Results\n\n");
    md.push_str(&format!("- **Succeeded**: {}\n", report.succeeded));
    md.push_str(&format!("- **Failed**: {}\n", report.failed));
    if report.selected_urls > 0 {
        md.push_str(&format!(
            "- **Success Rate**: {:.2}%\n",
            report.succeeded as f64 / report.selected_urls as f64 * 100.0
        ));
    }
    md.push('\n');

    if !report.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Page | URL | Characters |\n");
        md.push_str("|------|-----|------------|\n");
        for (page_id, page) in &report.pages {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                page_id, page.url, page.clean_length
            ));
        }
        md.push('\n');
    }

    // Page failures
    if !report.failures.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");
        for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!("| {} | {} |\n", failure.url, failure.error));
        }
        if report.failures.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                report.failures.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    // Sitemap branches that were skipped
    if !report.sitemap_failures.is_empty() {
        md.push_str("## Skipped Sitemaps\n\n");
        for failure in &report.sitemap_failures {
            md.push_str(&format!("- {}: {}\n", failure.url, failure.reason));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::PageFailure;
    use crate::output::PageRecord;
    use crate::sitemap::SitemapFailure;
    use crate::url::UrlCategory;
    use chrono::Utc;
    use indexmap::IndexMap;

    fn create_test_report() -> CrawlReport {
        let mut pages = IndexMap::new();
        pages.insert(
            "sso".to_string(),
            PageRecord {
                url: "https://acme.test/features/sso".to_string(),
                scraped_at: Utc::now(),
                content: "Single sign-on".to_string(),
                raw_length: 120,
                clean_length: 14,
            },
        );

        CrawlReport {
            sitemap_url: "https://acme.test/sitemap.xml".to_string(),
            total_urls: 40,
            filtered_urls: 4,
            categories: UrlCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            selected_urls: 2,
            pages,
            succeeded: 1,
            failed: 1,
            failures: vec![PageFailure {
                url: "https://acme.test/features/missing".to_string(),
                error: "HTTP 404".to_string(),
            }],
            sitemap_failures: vec![],
        }
    }

    #[test]
    fn test_format_crawl_summary() {
        let markdown = format_crawl_summary(&create_test_report());

        assert!(markdown.contains("# Rival-Scope Crawl Summary"));
        assert!(markdown.contains("https://acme.test/sitemap.xml"));
        assert!(markdown.contains("- **URLs in Sitemap**: 40"));
        assert!(markdown.contains("- **After Keyword Filter**: 4"));
        assert!(markdown.contains("- **Success Rate**: 50.00%"));
        assert!(markdown.contains("| sso | https://acme.test/features/sso | 14 |"));
    }

    #[test]
    fn test_every_category_listed() {
        let markdown = format_crawl_summary(&create_test_report());
        for category in UrlCategory::ALL {
            assert!(markdown.contains(&format!("| {} | 0 |", category)));
        }
    }

    #[test]
    fn test_failures_listed() {
        let mut report = create_test_report();
        report.sitemap_failures.push(SitemapFailure {
            url: "https://acme.test/sitemap-blog.xml".to_string(),
            reason: "depth limit reached".to_string(),
        });

        let markdown = format_crawl_summary(&report);
        assert!(markdown.contains("## Failed Pages"));
        assert!(markdown.contains("| https://acme.test/features/missing | HTTP 404 |"));
        assert!(markdown.contains("## Skipped Sitemaps"));
        assert!(markdown.contains("- https://acme.test/sitemap-blog.xml: depth limit reached"));
    }

    #[test]
    fn test_clean_crawl_has_no_failure_sections() {
        let mut report = create_test_report();
        report.failures.clear();
        report.failed = 0;

        let markdown = format_crawl_summary(&report);
        assert!(!markdown.contains("## Failed Pages"));
        assert!(!markdown.contains("## Skipped Sitemaps"));
    }
}
