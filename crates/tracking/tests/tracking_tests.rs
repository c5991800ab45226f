use sitesentry_storage::{EventKind, Store};
use sitesentry_tracking::events::ClientContext;
use sitesentry_tracking::{classify, HoneypotPayload, Recorder, ThreatLevel, VisitorPayload};

fn visitor(session_id: &str) -> VisitorPayload {
    VisitorPayload {
        session_id: session_id.to_string(),
        landing_page: "https://example.com/".to_string(),
        referrer: None,
        device_type: "desktop".to_string(),
        browser: "Firefox".to_string(),
        os: "Linux".to_string(),
        screen_resolution: "1920x1080".to_string(),
        language: "en-US".to_string(),
        timezone: "UTC".to_string(),
        is_bot: false,
        bot_name: None,
    }
}

#[tokio::test]
async fn test_arrival_then_honeypot_flow() {
    let recorder = Recorder::new(Store::connect_in_memory().await.unwrap());
    let ctx = ClientContext::unknown();

    recorder.record_visitor(&visitor("abc"), &ctx).await.unwrap();
    let created = recorder.store().get_session("abc").await.unwrap().unwrap();
    assert_eq!(created.total_pages, 1);

    let payload = HoneypotPayload {
        session_id: "abc".to_string(),
        trap_type: "admin".to_string(),
        trap_url: "/admin-login".to_string(),
        method: None,
        headers: None,
        body: None,
    };
    let level = recorder.record_honeypot(&payload, &ctx).await.unwrap();
    assert_eq!(level, ThreatLevel::High);

    let flagged = recorder.store().get_session("abc").await.unwrap().unwrap();
    assert!(flagged.triggered_honeypot);
    assert!(flagged.is_suspicious);
    assert_eq!(flagged.total_pages, 1);
}

#[tokio::test]
async fn test_page_view_totals_survive_concurrency() {
    let store = Store::connect_in_memory().await.unwrap();
    store
        .upsert_session("tab", "203.0.113.1", EventKind::Arrival)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .upsert_session("tab", "203.0.113.1", EventKind::PageView)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let row = store.get_session("tab").await.unwrap().unwrap();
    assert_eq!(row.total_pages, 11);
}

#[test]
fn test_classifier_mapping() {
    assert_eq!(classify("sql"), ThreatLevel::High);
    assert_eq!(classify("api"), ThreatLevel::Medium);
    assert_eq!(classify("anything-unrecognized"), ThreatLevel::Low);
}
