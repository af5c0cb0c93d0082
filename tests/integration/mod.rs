// Shared fixtures for the end-to-end harvest tests.
// Every upstream is served by a local wiremock server.

pub mod harvest_tests;

use std::path::Path;
use std::sync::Arc;

use brand_hunter::config::{ExecutionMode, HarvestConfig, HunterConfig, SourcesConfig, TransportConfig};
use brand_hunter::plugins::AdapterRegistry;
use brand_hunter::transport::HttpTransport;
use brand_hunter::Harvester;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens on the discard port, so requests fail fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn get_test_config(server: &MockServer, output: &Path) -> HunterConfig {
    HunterConfig {
        brand: "Acme".to_string(),
        output_path: output.to_path_buf(),
        harvest: HarvestConfig {
            pacing_delay_ms: 0,
            execution: ExecutionMode::Sequential,
            max_items_per_source: 10,
        },
        transport: TransportConfig {
            request_timeout: 5,
            ..TransportConfig::default()
        },
        sources: SourcesConfig {
            search_url: server.uri(),
            marketplace_url: server.uri(),
            handmade_url: server.uri(),
            dynamic_url: UNREACHABLE.to_string(),
        },
    }
}

pub fn create_test_harvester(config: &HunterConfig) -> anyhow::Result<Harvester> {
    let transport = Arc::new(HttpTransport::new(&config.transport)?);
    let registry = AdapterRegistry::with_defaults(config, transport);
    Ok(Harvester::new(registry, &config.harvest))
}

pub fn search_results_page(hits: &[(&str, &str)]) -> String {
    let results: String = hits
        .iter()
        .map(|(title, url)| {
            format!(
                r#"<div class="result results_links web-result"><h2 class="result__title"><a class="result__a" href="{url}">{title}</a></h2></div>"#
            )
        })
        .collect();
    format!("<html><body><div id=\"links\">{}</div></body></html>", results)
}

pub fn marketplace_item(title: &str, href: &str, price: &str) -> String {
    format!(
        r#"<li class="s-item"><div class="s-item__wrapper">
            <img class="s-item__image-img" src="https://i.ebayimg.com/thumbs/{price}.jpg">
            <a class="s-item__link" href="{href}"><div class="s-item__title">{title}</div></a>
            <span class="s-item__price">{price}</span>
        </div></li>"#
    )
}

pub fn marketplace_page(items: &[String]) -> String {
    format!("<html><body><ul class=\"srp-results\">{}</ul></body></html>", items.join(""))
}

pub async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
