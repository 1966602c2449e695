//! End-to-end RTC flows against a mock HTTP server.

use std::time::Duration;

use rtc::{CalloutError, MacroMap, RealTimeConfig, VendorRegistry};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn macro_map(entries: &[(&str, &str)]) -> MacroMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_vendor_callout_expands_macros() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rtc"))
        .and(query_param("slot_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"targeting": {"x": "y"}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let registry =
        VendorRegistry::from_entries([("fakevendor", format!("{}/rtc?slot_id=SLOT_ID", server.uri()))]);
    let service = RealTimeConfig::with_registry(registry);

    let results = service
        .execute(r#"{"vendors": {"FakeVendor": {"SLOT_ID": "1"}}}"#, &MacroMap::new())
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].callout, "fakevendor");
    assert_eq!(results[0].error, None);
    assert_eq!(results[0].rtc_response, Some(json!({"targeting": {"x": "y"}})));
}

#[tokio::test]
async fn test_invalid_config_makes_no_network_calls() {
    let server = MockServer::start().await;

    let service = RealTimeConfig::new();
    for raw in ["not json", "{}", r#"{"urls": [], "vendors": {}}"#] {
        let results = service.execute(raw, &MacroMap::new()).await;
        assert!(results.is_empty(), "raw: {raw}");
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_url_is_called_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rtc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/rtc", server.uri());
    let raw = format!(r#"{{"urls": ["{url}", "{url}"]}}"#);
    let results = RealTimeConfig::new().execute(&raw, &MacroMap::new()).await;

    assert_eq!(results.len(), 2);
    // "{}" round-trips to an empty-object payload.
    assert_eq!(results[0].rtc_response, Some(json!({})));
    assert_eq!(results[1].error, Some(CalloutError::DuplicateUrl));
    assert_eq!(results[1].rtc_time, 0);
}

#[tokio::test]
async fn test_results_follow_candidate_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"from": "direct"}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vendor"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_string(r#"{"from": "vendor"}"#),
        )
        .mount(&server)
        .await;

    let registry = VendorRegistry::from_entries([("slowvendor", format!("{}/vendor", server.uri()))]);
    let service = RealTimeConfig::with_registry(registry);

    let raw = format!(
        r#"{{"urls": ["{}/direct", "http://example.com/insecure"],
             "vendors": {{"slowvendor": {{}}, "mystery": {{}}}}}}"#,
        server.uri()
    );
    let results = service.execute(&raw, &MacroMap::new()).await;

    // Publisher urls first in array order, then vendors in document order,
    // regardless of which response settled first.
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].rtc_response, Some(json!({"from": "direct"})));
    assert_eq!(results[1].error, Some(CalloutError::InsecureUrl));
    assert_eq!(results[2].callout, "slowvendor");
    assert_eq!(results[2].rtc_response, Some(json!({"from": "vendor"})));
    assert_eq!(results[3].callout, "mystery");
    assert_eq!(results[3].error, Some(CalloutError::UnknownVendor));
}

#[tokio::test]
async fn test_timeout_override_is_clamped_to_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(1300))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    // 5000 ms exceeds the 1000 ms default, so it is discarded and the
    // delayed response times out.
    let raw = format!(
        r#"{{"urls": ["{}/rtc"], "timeoutMillis": 5000}}"#,
        server.uri()
    );
    let results = RealTimeConfig::new().execute(&raw, &MacroMap::new()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].error, Some(CalloutError::NetworkFailure));
    assert!(results[0].rtc_time >= 1000);
}

#[tokio::test]
async fn test_cap_overflow_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(5)
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..7)
        .map(|i| format!("\"{}/rtc/{i}\"", server.uri()))
        .collect();
    let raw = format!(r#"{{"urls": [{}]}}"#, urls.join(", "));
    let results = RealTimeConfig::new().execute(&raw, &MacroMap::new()).await;

    assert_eq!(results.len(), 7);
    for result in &results[..5] {
        assert_eq!(result.error, None);
    }
    for result in &results[5..] {
        assert_eq!(result.error, Some(CalloutError::MaxCalloutsExceeded));
        assert_eq!(result.rtc_time, 0);
    }
}
