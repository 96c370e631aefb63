use beauty_bookings::config::{AppConfig, PriorityModelKind};
use std::collections::HashMap;

fn config_from(vars: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let cfg = config_from(&[]);
    assert_eq!(cfg.priority_model, PriorityModelKind::Rules);
    assert_eq!(cfg.segment_default_k, 4);
    assert_eq!(cfg.segment_max_k, 12);
    assert_eq!(cfg.notify_queue_capacity, 1024);
    assert_eq!(cfg.lock_timeout_ms, 5000);
    assert_eq!(cfg.rate_limit_per_minute, 300);
    assert!(cfg.notify_webhook_urls.is_empty());
    assert!(!cfg.internal_api_key.is_empty());
}

#[test]
fn overrides_are_parsed() {
    let cfg = config_from(&[
        ("PRIORITY_MODEL", "Clustered"),
        ("SEGMENT_DEFAULT_K", "3"),
        ("LOCK_TIMEOUT_MS", "750"),
        ("NOTIFY_WEBHOOK_URLS", "http://a.local/hook, ,http://b.local/hook"),
    ]);
    assert_eq!(cfg.priority_model, PriorityModelKind::Clustered);
    assert_eq!(cfg.segment_default_k, 3);
    assert_eq!(cfg.lock_timeout_ms, 750);
    assert_eq!(
        cfg.notify_webhook_urls,
        vec!["http://a.local/hook".to_string(), "http://b.local/hook".to_string()]
    );
}

#[test]
fn bad_values_fall_back_to_defaults() {
    let cfg = config_from(&[("PRIORITY_MODEL", "neural"), ("SEGMENT_MAX_K", "lots")]);
    assert_eq!(cfg.priority_model, PriorityModelKind::Rules);
    assert_eq!(cfg.segment_max_k, 12);
}

#[test]
fn default_cluster_count_never_exceeds_the_maximum() {
    let cfg = config_from(&[("SEGMENT_DEFAULT_K", "20"), ("SEGMENT_MAX_K", "6")]);
    assert_eq!(cfg.segment_max_k, 6);
    assert_eq!(cfg.segment_default_k, 6);

    let cfg = config_from(&[("SEGMENT_DEFAULT_K", "0"), ("SEGMENT_MAX_K", "0")]);
    assert_eq!(cfg.segment_max_k, 1);
    assert_eq!(cfg.segment_default_k, 1);
}

#[test]
fn readiness_endpoints_exist_in_readme() {
    let readme = std::fs::read_to_string("README.md").unwrap_or_default();
    assert!(readme.contains("/ops/readiness"));
    assert!(readme.contains("/ops/liveness"));
    assert!(readme.contains("/segments/stream"));
    assert!(readme.contains("PRIORITY_MODEL"));
}
