use crate::{create_test_config, mount_results_page, results_page, salon_id};
use salon_harvest::output::{HarvestEvent, HEADERS};
use salon_harvest::state::{JobPhase, JobTracker};
use salon_harvest::{CollectTarget, Coordinator, HarvestError, JobCheckpoint};
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts one results page holding salons `1..=count`
async fn mount_single_page(server: &MockServer, count: u32) -> Vec<String> {
    let names: Vec<String> = (1..=count).map(|n| format!("Salon {:02}", n)).collect();
    let salons: Vec<(u32, &str)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (i as u32 + 1, name.as_str()))
        .collect();

    mount_results_page(server, 1, results_page(1, 1, count.into(), &salons), 1).await;
    names
}

#[tokio::test]
async fn test_chunked_job_walks_cursor() {
    let server = MockServer::start().await;
    let names = mount_single_page(&server, 37).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let mut tracker = JobTracker::new();
    let mut cursors = Vec::new();
    let mut next_cursors = Vec::new();
    let records = coordinator
        .run_chunked("渋谷", CollectTarget::Pages(1), &mut tracker, |checkpoint, outcome| {
            cursors.push(checkpoint.cursor);
            next_cursors.push(outcome.next_cursor);
        })
        .await
        .unwrap();

    assert_eq!(cursors, vec![0, 15, 30]);
    assert_eq!(next_cursors, vec![Some(15), Some(30), None]);
    assert_eq!(tracker.phase(), JobPhase::Complete);
    assert_eq!(tracker.chunks(), 3);

    let exported: Vec<&str> = records.iter().map(|r| r.listing.name.as_str()).collect();
    assert_eq!(exported, names);
    assert!(records.iter().all(|r| r.is_degraded()));
}

#[tokio::test]
async fn test_chunked_job_with_external_checkpoint() {
    let server = MockServer::start().await;
    mount_single_page(&server, 20).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("渋谷", 1).await.unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("job.json");
    JobCheckpoint::new("渋谷", listings).save(&path).unwrap();

    // Each invocation starts from the persisted checkpoint alone
    let mut invocations = 0;
    let mut exported = 0;
    loop {
        let checkpoint = JobCheckpoint::load(&path).unwrap();
        let outcome = coordinator.process_checkpoint(&checkpoint).await.unwrap();
        invocations += 1;
        exported += outcome.results.len();

        match checkpoint.advance(outcome.next_cursor) {
            Some(next) => next.save(&path).unwrap(),
            None => break,
        }
    }

    assert_eq!(invocations, 2);
    assert_eq!(exported, 20);
}

#[tokio::test]
async fn test_chunk_cursor_past_end() {
    let server = MockServer::start().await;
    mount_single_page(&server, 3).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let listings = coordinator.collect("渋谷", 1).await.unwrap();

    let at_end = coordinator.process_chunk(&listings, 3).await.unwrap();
    assert!(at_end.results.is_empty());
    assert!(at_end.is_complete());

    assert!(matches!(
        coordinator.process_chunk(&listings, 4).await,
        Err(HarvestError::InvalidChunk { cursor: 4, len: 3 })
    ));
}

#[tokio::test]
async fn test_chunked_job_with_no_listings() {
    let server = MockServer::start().await;
    mount_results_page(&server, 1, results_page(1, 1, 0, &[]), 1).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let mut tracker = JobTracker::new();
    let mut called = false;
    let records = coordinator
        .run_chunked("渋谷", CollectTarget::Pages(1), &mut tracker, |_, _| called = true)
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(!called);
    assert_eq!(tracker.phase(), JobPhase::Complete);
    assert_eq!(tracker.chunks(), 0);
}

#[tokio::test]
async fn test_continuous_job_covers_every_listing() {
    let server = MockServer::start().await;
    mount_single_page(&server, 7).await;

    Mock::given(method("GET"))
        .and(path(format!("/{}/tel/", salon_id(4))))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>TEL 03-9999-0000</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.crawler.workers = 3;
    let coordinator = Coordinator::new(config).unwrap();

    let listings = coordinator.collect("渋谷", 1).await.unwrap();
    let expected: HashSet<String> = listings.iter().map(|l| l.url.clone()).collect();
    let records = coordinator.run_continuous(listings).await;

    assert_eq!(records.len(), 7);
    let urls: HashSet<String> = records.iter().map(|r| r.listing.url.clone()).collect();
    assert_eq!(urls, expected);

    let with_phone: Vec<_> = records.iter().filter(|r| r.tel_real.is_some()).collect();
    assert_eq!(with_phone.len(), 1);
    assert_eq!(with_phone[0].tel_real.as_deref(), Some("03-9999-0000"));
}

#[tokio::test]
async fn test_streaming_job_events() {
    let server = MockServer::start().await;
    mount_single_page(&server, 3).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let mut rx = coordinator.run_streaming("渋谷", CollectTarget::Pages(1));

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 4);
    for (i, event) in events[..3].iter().enumerate() {
        assert_eq!(
            event,
            &HarvestEvent::Progress {
                current: i + 1,
                total: 3,
                name: format!("Salon {:02}", i + 1),
            }
        );
    }

    match &events[3] {
        HarvestEvent::Complete { count, csv, .. } => {
            assert_eq!(*count, 3);
            let lines: Vec<&str> = csv.lines().collect();
            assert_eq!(lines.len(), 4);
            assert_eq!(lines[0], HEADERS.join(","));
            assert!(lines[1].starts_with("Salon 01,"));
        }
        other => panic!("expected complete event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_streaming_job_reports_invalid_request() {
    let server = MockServer::start().await;
    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();

    let mut rx = coordinator.run_streaming("渋谷", CollectTarget::Pages(99));
    let event = rx.recv().await.unwrap();

    assert!(matches!(event, HarvestEvent::Error { .. }));
    assert!(event.is_terminal());
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_chunked_job_fails_on_bad_target() {
    let server = MockServer::start().await;
    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();

    let mut tracker = JobTracker::new();
    let result = coordinator
        .run_chunked("渋谷", CollectTarget::Listings(0), &mut tracker, |_, _| {})
        .await;

    assert!(matches!(result, Err(HarvestError::InvalidListingLimit)));
    assert_eq!(tracker.phase(), JobPhase::Failed);
}

#[tokio::test]
async fn test_streaming_job_with_listing_target() {
    let server = MockServer::start().await;
    mount_single_page(&server, 5).await;

    let coordinator = Coordinator::new(create_test_config(&server)).unwrap();
    let mut rx = coordinator.run_streaming("渋谷", CollectTarget::Listings(2));

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 3);
    assert!(matches!(&events[1], HarvestEvent::Progress { current: 2, total: 2, .. }));
    assert!(matches!(&events[2], HarvestEvent::Complete { count: 2, .. }));
}
