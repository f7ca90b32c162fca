use crate::{create_test_config, salon_id};
use salon_harvest::{Coordinator, ListingRecord};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(server: &MockServer, n: u32) -> ListingRecord {
    ListingRecord::new(
        format!("Salon {}", n),
        format!("{}/{}", server.uri(), salon_id(n)),
        1,
    )
}

#[tokio::test]
async fn test_enrich_merges_detail_and_contact() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", salon_id(1))))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table class="slnDataTbl bdCell bgThNml fgThNml">
                <tr><th>電話番号</th><td>03-XXXX-XXXX</td></tr>
                <tr><th>住所</th><td>東京都渋谷区1-2-3</td></tr>
                <tr><th>営業時間</th><td>10:00～20:00</td><th>定休日</th><td>火曜日</td></tr>
                <tr><th>スタッフ数</th><td></td></tr>
            </table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}/tel/", salon_id(1))))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table class="wFull bdCell pCell10 mT15">
                <tr><th>電話番号</th><td>03-1234-5678</td></tr>
            </table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let record = coordinator.enrich(listing(&server, 1)).await;

    assert_eq!(record.listing.name, "Salon 1");
    assert_eq!(record.detail.tel_mask.as_deref(), Some("03-XXXX-XXXX"));
    assert_eq!(record.detail.address.as_deref(), Some("東京都渋谷区1-2-3"));
    assert_eq!(record.detail.business_hours.as_deref(), Some("10:00～20:00"));
    assert_eq!(record.detail.holiday.as_deref(), Some("火曜日"));
    assert_eq!(record.detail.staff_count, None);
    assert_eq!(record.tel_real.as_deref(), Some("03-1234-5678"));
    assert!(!record.is_degraded());
}

#[tokio::test]
async fn test_enrich_degrades_to_bare_listing() {
    let server = MockServer::start().await;

    // Nothing mounted: both pages answer 404 with an empty body
    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let record = coordinator.enrich(listing(&server, 2)).await;

    assert_eq!(record.listing, listing(&server, 2));
    assert!(record.detail.is_empty());
    assert_eq!(record.tel_real, None);
    assert!(record.is_degraded());
}

#[tokio::test]
async fn test_enrich_contact_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}/tel/", salon_id(3))))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<p>お電話はこちら <a href="tel:0612345678">発信</a></p>"#,
        ))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let record = coordinator.enrich(listing(&server, 3)).await;

    assert!(record.detail.is_empty());
    assert_eq!(record.tel_real.as_deref(), Some("0612345678"));
}

#[tokio::test]
async fn test_enrich_unreachable_site() {
    let server = MockServer::start().await;
    let mut config = create_test_config(&server);
    config.crawler.request_timeout_secs = 1;

    let coordinator = Coordinator::new(config).unwrap();
    let listing = ListingRecord::new("Gone", "http://127.0.0.1:9/slnH000000009", 1);
    let record = coordinator.enrich(listing.clone()).await;

    assert_eq!(record.listing, listing);
    assert!(record.is_degraded());
}
