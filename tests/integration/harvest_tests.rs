use std::fs;

use brand_hunter::models::{PLACEHOLDER_IMAGE, UNKNOWN_PRICE};
use brand_hunter::plugins::traits::OutcomeKind;
use brand_hunter::sink::JsonFileSink;
use brand_hunter::{HarvestQuery, HarvestState, Listing, Source};
use wiremock::MockServer;

use super::*;

async fn mount_acme_upstreams(server: &MockServer) {
    mount_html(
        server,
        "/html/",
        search_results_page(&[
            ("Acme Outlet Shop", "https://acme-outlet.shop/"),
            ("Acme Discount Store", "https://acme-discount.store/watches"),
            ("Genuine Acme Shop", "https://genuine-acme.shop/"),
        ]),
    )
    .await;
    mount_html(
        server,
        "/sch/i.html",
        marketplace_page(&[
            marketplace_item("Shop on eBay", "https://ebay.com/b/x", "$20.00"),
            marketplace_item("Acme Diver 42mm", "https://www.ebay.com/itm/101", "$25.00"),
            marketplace_item("Acme Chronograph", "/itm/102", "$31.50"),
        ]),
    )
    .await;
    mount_html(server, "/search", "<html><body><div class=\"wt-grid\"></div></body></html>".to_string()).await;
}

#[tokio::test]
async fn test_acme_end_to_end_writes_five_listings() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_acme_upstreams(&server).await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("data.json");
    fs::write(&output, "[{\"stale\": true}]")?;

    let config = get_test_config(&server, &output);
    let harvester = create_test_harvester(&config)?;
    let sink = JsonFileSink::new(&config.output_path);

    let report = harvester
        .run_and_persist(&HarvestQuery::new("Acme")?, &sink)
        .await?;

    assert_eq!(report.state, HarvestState::Persisted);
    assert_eq!(report.listings.len(), 5);
    let sources: Vec<Source> = report.listings.iter().map(|l| l.source).collect();
    assert_eq!(
        sources,
        vec![
            Source::GeneralWeb,
            Source::GeneralWeb,
            Source::GeneralWeb,
            Source::Marketplace,
            Source::Marketplace,
        ]
    );
    assert_eq!(report.listings[4].link, format!("{}/itm/102", server.uri()));

    let outcomes: Vec<OutcomeKind> = report.sources.iter().map(|s| s.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            OutcomeKind::Harvested,
            OutcomeKind::Harvested,
            OutcomeKind::Harvested,
            OutcomeKind::CapabilityUnavailable,
        ]
    );
    assert_eq!(report.soft_failures(), 0);

    let written: Vec<Listing> = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(written, report.listings);
    Ok(())
}

#[tokio::test]
async fn test_every_listing_is_fully_populated() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_acme_upstreams(&server).await;
    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, &dir.path().join("data.json"));

    let report = create_test_harvester(&config)?
        .run(&HarvestQuery::new("Acme")?)
        .await;

    for listing in &report.listings {
        assert!(!listing.title.trim().is_empty());
        assert!(url::Url::parse(&listing.link).is_ok(), "{} is not absolute", listing.link);
        assert!(!listing.price.is_empty());
        assert!(!listing.image.is_empty());
        assert_eq!(listing.suspicion_category, listing.source.suspicion_category());
    }

    let web = &report.listings[0];
    assert_eq!(web.price, UNKNOWN_PRICE);
    assert_eq!(web.image, PLACEHOLDER_IMAGE);
    assert_eq!(report.listings[3].price, "$25.00");
    Ok(())
}

#[tokio::test]
async fn test_search_failure_is_isolated() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_status(&server, "/html/", 500).await;
    mount_html(
        &server,
        "/sch/i.html",
        marketplace_page(&[marketplace_item("Acme Diver", "/itm/1", "$25.00")]),
    )
    .await;
    mount_status(&server, "/search", 403).await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, &dir.path().join("data.json"));
    let report = create_test_harvester(&config)?
        .run(&HarvestQuery::new("Acme")?)
        .await;

    assert_eq!(report.listings.len(), 1);
    assert_eq!(report.listings[0].source, Source::Marketplace);

    let general_failures = report
        .sources
        .iter()
        .filter(|s| s.source == Source::GeneralWeb && s.outcome == OutcomeKind::SoftFailure)
        .count();
    assert_eq!(general_failures, 1);
    // The handmade marketplace answered 403 and fails softly as well.
    assert_eq!(report.soft_failures(), 2);
    Ok(())
}

#[tokio::test]
async fn test_all_sources_down_still_persists_empty_artifact() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("data.json");

    let mut config = get_test_config(&server, &output);
    config.sources.search_url = UNREACHABLE.to_string();
    config.sources.marketplace_url = UNREACHABLE.to_string();
    config.sources.handmade_url = UNREACHABLE.to_string();

    let report = create_test_harvester(&config)?
        .run_and_persist(&HarvestQuery::new("Acme")?, &JsonFileSink::new(&output))
        .await?;

    assert!(report.listings.is_empty());
    assert_eq!(report.soft_failures(), 3);
    assert_eq!(fs::read_to_string(&output)?.trim(), "[]");
    Ok(())
}
