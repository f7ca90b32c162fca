use crate::{create_test_config, mount_results_page, results_page, salon_id, SEARCH_PATH};
use salon_harvest::{CollectTarget, Coordinator, HarvestError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_collect_two_pages_in_order() {
    let server = MockServer::start().await;

    // Page 1 repeats salon 1; page 2 repeats it again
    let page1 = results_page(1, 2, 4, &[(1, "Salon A"), (2, "Salon B"), (1, "Salon A again")]);
    let page2 = results_page(2, 2, 4, &[(3, "Salon C"), (1, "Salon A")]);
    mount_results_page(&server, 1, page1, 1).await;
    mount_results_page(&server, 2, page2, 1).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("渋谷", 5).await.unwrap();

    let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
    let pages: Vec<u32> = listings.iter().map(|l| l.page).collect();
    assert_eq!(names, vec!["Salon A", "Salon B", "Salon C", "Salon A"]);
    assert_eq!(pages, vec![1, 1, 2, 2]);
    assert_eq!(listings[0].url, format!("{}/{}", server.uri(), salon_id(1)));
}

#[tokio::test]
async fn test_collect_sends_keyword() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("freeword", "表参道"))
        .and(query_param("pn", "1"))
        .and(query_param("sortType", "popular"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(
            1,
            1,
            1,
            &[(7, "Salon G")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("  表参道 ", 3).await.unwrap();
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn test_collect_respects_page_limit() {
    let server = MockServer::start().await;

    mount_results_page(&server, 1, results_page(1, 34, 680, &[(1, "Salon A")]), 1).await;
    mount_results_page(&server, 2, results_page(2, 34, 680, &[(2, "Salon B")]), 1).await;
    mount_results_page(&server, 3, results_page(3, 34, 680, &[(3, "Salon C")]), 0).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("渋谷", 2).await.unwrap();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[1].name, "Salon B");
}

#[tokio::test]
async fn test_collect_failed_page_contributes_nothing() {
    let server = MockServer::start().await;

    mount_results_page(&server, 1, results_page(1, 3, 3, &[(1, "Salon A")]), 1).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("pn", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_results_page(&server, 3, results_page(3, 3, 3, &[(3, "Salon C")]), 1).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("渋谷", 5).await.unwrap();

    let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Salon A", "Salon C"]);
}

#[tokio::test]
async fn test_collect_without_pagination_text_visits_one_page() {
    let server = MockServer::start().await;

    let body = r#"<ul class="slnCassetteList"><li>
        <h3 class="slnName"><a href="/slnH000000001/">Only Salon</a></h3>
    </li></ul>"#;
    mount_results_page(&server, 1, body.to_string(), 1).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("渋谷", 10).await.unwrap();
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn test_collect_rejects_bad_requests() {
    let server = MockServer::start().await;
    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();

    assert!(matches!(
        coordinator.collect("   ", 5).await,
        Err(HarvestError::MissingKeyword)
    ));
    assert!(matches!(
        coordinator.collect("渋谷", 11).await,
        Err(HarvestError::InvalidPageLimit { requested: 11, .. })
    ));
    assert!(matches!(
        coordinator.collect("渋谷", 0).await,
        Err(HarvestError::InvalidPageLimit { requested: 0, .. })
    ));
}

#[tokio::test]
async fn test_search_summary() {
    let server = MockServer::start().await;

    let salons: Vec<(u32, &str)> = (1..=8).map(|n| (n, "Salon")).collect();
    mount_results_page(&server, 1, results_page(1, 34, 1_234, &salons), 1).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let summary = coordinator.search("渋谷").await.unwrap();

    assert_eq!(summary.keyword, "渋谷");
    assert_eq!(summary.total_pages, 34);
    assert_eq!(summary.total_count, 1_234);
    assert_eq!(summary.per_page_count, 8);
    assert_eq!(summary.preview.len(), salon_harvest::crawler::PREVIEW_LEN);
}

#[tokio::test]
async fn test_collect_listing_target_sizes_pages_and_truncates() {
    let server = MockServer::start().await;

    let page1 = results_page(1, 34, 680, &[(1, "Salon A"), (2, "Salon B"), (3, "Salon C")]);
    let page2 = results_page(2, 34, 680, &[(4, "Salon D"), (5, "Salon E"), (6, "Salon F")]);
    mount_results_page(&server, 1, page1, 1).await;
    mount_results_page(&server, 2, page2, 1).await;
    mount_results_page(&server, 3, results_page(3, 34, 680, &[(7, "Salon G")]), 0).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator
        .collect_target("渋谷", CollectTarget::Listings(5))
        .await
        .unwrap();

    let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Salon A", "Salon B", "Salon C", "Salon D", "Salon E"]);
}

#[tokio::test]
async fn test_collect_listing_target_reaches_past_page_limit() {
    let server = MockServer::start().await;

    // Twelve pages of one salon each; the configured page limit is ten
    for page in 1..=12 {
        let body = results_page(page, 12, 12, &[(page, "Salon")]);
        mount_results_page(&server, page, body, 1).await;
    }

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator
        .collect_target("渋谷", CollectTarget::Listings(500))
        .await
        .unwrap();

    assert_eq!(listings.len(), 12);
    assert_eq!(listings[11].page, 12);
}

#[tokio::test]
async fn test_collect_rejects_zero_listing_target() {
    let server = MockServer::start().await;
    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();

    assert!(matches!(
        coordinator.collect_target("渋谷", CollectTarget::Listings(0)).await,
        Err(HarvestError::InvalidListingLimit)
    ));
}
