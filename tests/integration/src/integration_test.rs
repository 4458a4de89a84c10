//! End-to-end tests over the fixture documents
//!
//! Each fixture exists as JSON, YAML and TOML. The flow under test is
//! file -> loader -> store -> resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use confidence_core::{AppliedFilter, Resolver, Store};
use confidence_loader::{DocumentLoader, Error};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/documents")
}

fn load(name: &str) -> Value {
    DocumentLoader::new().load(&fixtures().join(name)).unwrap()
}

#[fixture]
fn production() -> Value {
    load("criteria/production.yaml")
}

fn resolve(store: &Store, key: &str, criteria: &Value, vars: &[(&str, &str)]) -> (Option<Value>, Vec<AppliedFilter>) {
    let env: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let mut applied = Vec::new();
    let value = {
        let mut resolver = Resolver::new(criteria).with_env(&env).with_applied(&mut applied);
        store.resolve(key, &mut resolver)
    };
    (value, applied)
}

#[test]
fn formats_load_to_the_same_document() {
    let json = load("service.json");
    assert_eq!(load("service.yaml"), json);
    assert_eq!(load("service.toml"), json);
}

#[rstest]
#[case("service.json")]
#[case("service.yaml")]
#[case("service.toml")]
fn production_resolution(#[case] name: &str, production: Value) {
    let store = Store::from_document(&load(name)).unwrap();

    let (value, applied) = resolve(&store, "/", &production, &[("BILLING_HOST", "billing.internal")]);

    assert_eq!(
        value,
        Some(json!({
            "name": "billing",
            "regions": ["eu", "us"],
            "server": {
                "host": "billing.internal",
                "port": 443,
                "tls": {
                    "enabled": true,
                    "ciphers": ["TLS_CHACHA20_POLY1305_SHA256", "TLS_AES_256_GCM_SHA384"]
                }
            },
            "workers": 8,
            "features": { "audit": true }
        }))
    );
    assert_eq!(
        applied,
        vec![
            AppliedFilter::new("env").with_value_id("production"),
            AppliedFilter::new("env").with_value_id("production").with_filter_id("port_by_env"),
            AppliedFilter::new("env").with_value_id("production"),
            AppliedFilter::new("queue.depth").with_value_id("busy"),
        ]
    );
}

#[rstest]
#[case("service.json")]
#[case("service.yaml")]
#[case("service.toml")]
fn default_resolution(#[case] name: &str) {
    let store = Store::from_document(&load(name)).unwrap();

    let (value, applied) = resolve(&store, "/", &json!({ "env": "staging", "queue": { "depth": 40 } }), &[]);

    assert_eq!(
        value,
        Some(json!({
            "name": "billing",
            "regions": ["eu"],
            "server": {
                "port": 8443,
                "tls": { "enabled": false, "ciphers": ["TLS_CHACHA20_POLY1305_SHA256"] }
            },
            "workers": 2,
            "features": { "audit": true }
        }))
    );
    assert_eq!(
        applied,
        vec![
            AppliedFilter::new("env"),
            AppliedFilter::new("env").with_value_id("staging").with_filter_id("port_by_env"),
            AppliedFilter::new("env").with_value_id("$default"),
            AppliedFilter::new("queue.depth").with_value_id("2"),
        ]
    );
}

#[rstest]
fn keys_resolve_individually(production: Value) {
    let store = Store::from_document(&load("service.yaml")).unwrap();

    assert_eq!(store.get("/server/port", &production), Some(json!(443)));
    assert_eq!(store.get("/regions/1", &production), Some(json!("us")));
    assert_eq!(store.get("/regions/1", &json!({})), None);
    assert_eq!(store.get("/server/tls/ciphers/1", &production), Some(json!("TLS_AES_256_GCM_SHA384")));
    assert_eq!(store.get("/workers", &json!({ "queue": { "depth": 5000 } })), Some(json!(32)));
    assert_eq!(store.get("/server/../name", &production), None);
}

#[rstest]
fn meta_is_available_across_formats(production: Value) {
    for name in ["service.json", "service.yaml", "service.toml"] {
        let store = Store::from_document(&load(name)).unwrap();
        assert_eq!(store.meta("/", &production), Some(json!({ "description": "Billing service" })));
        assert_eq!(store.meta("/features", &production), Some(json!({ "owner": "compliance" })));
        assert_eq!(store.meta("/server/port", &production), None);
    }
}

#[test]
fn invalid_fixture_fails_validation_with_path() {
    let err = Store::from_document(&load("invalid.json")).unwrap_err();
    assert_eq!(err.to_string(), "Invalid document: Range with non-ranged values at /server/port");
}

#[test]
fn failed_load_keeps_previous_document() {
    let mut store = Store::from_document(&load("service.toml")).unwrap();
    assert!(store.load(&load("invalid.json")).is_err());
    assert_eq!(store.get("/name", &json!({})), Some(json!("billing")));
}

#[test]
fn unknown_extension_is_refused() {
    let err = DocumentLoader::new().load(&fixtures().join("service.ini")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}
