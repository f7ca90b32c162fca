//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the directory site and drive
//! complete jobs end-to-end: collection, enrichment and every execution mode.

mod collect_tests;
mod enrich_tests;
mod job_tests;

use salon_harvest::config::{Config, CrawlerConfig, SiteConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEARCH_PATH: &str = "/CSP/bt/salonSearch/search/";

/// Creates a test configuration pointed at the mock server, with no pacing
pub fn create_test_config(server: &MockServer) -> Config {
    Config {
        site: SiteConfig {
            base_url: server.uri(),
            ..SiteConfig::default()
        },
        crawler: CrawlerConfig {
            item_delay_ms: 0,
            page_delay_ms: 0,
            chunk_delay_ms: 0,
            request_timeout_secs: 5,
            ..CrawlerConfig::default()
        },
        ..Config::default()
    }
}

/// Salon identifier for test salon `n`
pub fn salon_id(n: u32) -> String {
    format!("slnH{:09}", n)
}

/// Renders a search results page with the given `(salon number, name)` rows
pub fn results_page(current: u32, total: u32, count: u64, salons: &[(u32, &str)]) -> String {
    let rows: String = salons
        .iter()
        .map(|(n, name)| {
            format!(
                r#"<li>
                  <div class="slnImgList"><div><a href="/{id}/"><img src="x.jpg"></a></div></div>
                  <h3 class="slnName"><a href="/{id}/">{name}</a> <span>NEW</span></h3>
                </li>"#,
                id = salon_id(*n),
                name = name
            )
        })
        .collect();

    format!(
        r#"<html><body>
          <span class="numberOfResult">{count}</span>
          <p class="pa bdT">{current}/{total}ページ</p>
          <ul class="slnCassetteList">{rows}</ul>
        </body></html>"#
    )
}

/// Mounts one search results page, expected to be requested `times` times
pub async fn mount_results_page(server: &MockServer, page: u32, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("pn", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}
