//! Integration tests for the response envelope.

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use serde_json::json;
use tokenserver_core::{UsageResult, UsageSnapshot};

#[test]
fn test_result_deserializes_what_it_serializes() {
    let snapshot = UsageSnapshot::new(
        json!({"seven_day": {"utilization": 40.5, "resets_at": null}}),
        Instant::now(),
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
    );
    let result = UsageResult::from_cache(&snapshot, snapshot.fetched_at + Duration::from_secs(7));

    let json = serde_json::to_string(&result).unwrap();
    let parsed: UsageResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
    assert_eq!(parsed.cache_age_seconds, 7);
}

#[test]
fn test_payload_is_passed_through_untouched() {
    let payload = json!({
        "five_hour": {"utilization": 3.0, "resets_at": "2025-01-01T12:00:00Z"},
        "unknown_future_field": [1, 2, {"nested": true}]
    });
    let snapshot = UsageSnapshot::new(payload.clone(), Instant::now(), Utc::now());
    let value = serde_json::to_value(UsageResult::fresh(&snapshot)).unwrap();
    assert_eq!(value["usage"], payload);
}
