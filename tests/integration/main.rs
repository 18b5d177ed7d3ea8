//! Integration tests for Rival-Scope
//!
//! These tests use wiremock mock servers as the remote sites and drive the
//! reqwest-backed fetcher end to end.

mod crawl_tests;
mod sitemap_tests;
