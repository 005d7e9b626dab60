// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn routes_by_colon_count() {
    assert_eq!(route_for("Th7MpTaRZVRYnPiabds81Y"), "nym/");
    assert_eq!(
        route_for("Th7MpTaRZVRYnPiabds81Y:2:gvt:1.0"),
        "schema/"
    );
    assert_eq!(
        route_for("Th7MpTaRZVRYnPiabds81Y:3:CL:14:TAG:x:y:z"),
        "cred_def/"
    );
}

#[test]
fn read_url_escapes_reserved_characters() {
    assert_eq!(
        read_url("http://api/", NYM_PATH, "did/1?x#y"),
        "http://api/nym/did%2F1%3Fx%23y"
    );
    assert_eq!(
        read_url("http://api/", SCHEMA_PATH, "Th7:2:gvt:1.0"),
        "http://api/schema/Th7%3A2%3Agvt%3A1.0"
    );
}

#[test]
fn clean_data_strips_newlines_and_tabs() {
    assert_eq!(clean_data("{\n\t\"a\": 1\n}"), "{\"a\": 1}");
}

#[test]
fn json_payload_is_sent_as_string() {
    let body = encode_payload("s:2:n:1", r#"{"ver":"1.0"}"#).unwrap();
    assert_eq!(body, r#""{\"ver\":\"1.0\"}""#);
}

#[test]
fn plain_payload_is_wrapped_as_nym() {
    let body = encode_payload("did1", "hash").unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["id"], "did1");
    assert_eq!(value["data"], "hash");
}

#[test]
fn nym_response_unwraps_data() {
    let value = decode_response("nym/", r#"{"id":"did1","data":"hash"}"#).unwrap();
    assert_eq!(value, "hash");

    let raw = decode_response("schema/", r#"{"ver":"1.0"}"#).unwrap();
    assert_eq!(raw, r#"{"ver":"1.0"}"#);
}

#[test]
fn config_reads_env_overrides() {
    let config = ApiConfig::from_lookup(|name| match name {
        "AuthToken" => Some("secret".to_string()),
        _ => None,
    });
    assert_eq!(config.auth_token, "secret");
    assert_eq!(config.base_address, ApiConfig::default().base_address);
}

#[tokio::test]
async fn cached_write_is_read_without_network() {
    // Nothing listens on this port; a cache hit must never reach it
    let ledger = ApiLedger::new(ApiConfig {
        base_address: "http://127.0.0.1:9/".to_string(),
        timeout: Duration::from_millis(200),
        ..ApiConfig::default()
    });
    ledger.open("").await.unwrap();

    let err = ledger.write(&TxInfo::did(), "did1", "hash\n").await;
    assert!(err.is_err(), "POST to a closed port should fail");

    let record = ledger.read(&TxInfo::did(), "did1").await.unwrap();
    assert_eq!(record.value, "hash");
}
