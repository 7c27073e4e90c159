// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end tests of the admin API over in-memory storage.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use collab_core::application::repository_factory::{AdminServices, Repositories};
use collab_core::domain::interaction::{DnsInteraction, HttpInteraction, SmtpInteraction};
use collab_core::domain::tenant::Host;
use collab_core::infrastructure::repositories::InMemoryInteractionRepository;
use collab_core::presentation::api::app;

struct TestApi {
    router: Router,
    captured: InMemoryInteractionRepository,
}

impl TestApi {
    fn new() -> Self {
        let captured = InMemoryInteractionRepository::new();
        let services = AdminServices::new("collab.test", Repositories::in_memory(captured.clone()));
        Self {
            router: app(services),
            captured,
        }
    }

    async fn post(&self, route: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(route)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Register `name` and return its access key.
    async fn register(&self, name: &str) -> String {
        let (status, body) = self.post("/api/createDomain", json!({ "host": name })).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["accessKey"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health() {
    let api = TestApi::new();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = api.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_once_per_host() {
    let api = TestApi::new();

    let (status, body) = api.post("/api/createDomain", json!({"host": "Probe"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["host"], "probe.collab.test");
    assert_eq!(body["accessKey"].as_str().unwrap().len(), 44);

    let (status, body) = api.post("/api/createDomain", json!({"host": "probe"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "domain already exists");

    let (status, _) = api.post("/api/createDomain", json!({"host": "www"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = api.post("/api/createDomain", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["host"].as_str().unwrap().ends_with(".collab.test"));
}

#[tokio::test]
async fn test_unknown_keys_are_rejected_without_mutation() {
    let api = TestApi::new();
    let key = api.register("owner").await;
    let (_, pattern) = api.post("/api/createPattern", json!({"accessKey": key})).await;

    for bad_key in [json!("forged"), json!(""), json!(7), Value::Null] {
        let (status, body) = api
            .post("/api/updatePattern", json!({
                "accessKey": bad_key,
                "response": {"id": pattern["id"], "pattern": "owned"}
            }))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "invalid access key");

        let (status, _) = api
            .post("/api/deletePattern", json!({"accessKey": bad_key, "id": pattern["id"]}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = api.post("/api/createDnsRecord", json!({"accessKey": "forged"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, patterns) = api.post("/api/getPatterns", json!({"accessKey": key})).await;
    assert_eq!(patterns, json!([pattern]));
    let (_, records) = api.post("/api/getDnsRecords", json!({"accessKey": key})).await;
    assert_eq!(records, json!([]));
}

#[tokio::test]
async fn test_pattern_update_clears_omitted_fields() {
    let api = TestApi::new();
    let key = api.register("a").await;
    let (_, pattern) = api.post("/api/createPattern", json!({"accessKey": key})).await;
    assert_eq!(pattern["responsecode"], 200);

    let (status, body) = api
        .post("/api/updatePattern", json!({
            "accessKey": key,
            "response": {"id": pattern["id"], "pattern": "^/callback"}
        }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "matched": true}));

    let (_, patterns) = api.post("/api/getPatterns", json!({"accessKey": key})).await;
    assert_eq!(
        patterns,
        json!([{"host": "a.collab.test", "id": pattern["id"], "pattern": "^/callback"}])
    );

    // Same content again: matched, nothing modified
    let (_, body) = api
        .post("/api/updatePattern", json!({
            "accessKey": key,
            "response": {"id": pattern["id"], "pattern": "^/callback"}
        }))
        .await;
    assert_eq!(body, json!({"success": false, "matched": true}));
}

#[tokio::test]
async fn test_update_validation_order() {
    let api = TestApi::new();
    let key = api.register("a").await;
    let (_, record) = api.post("/api/createDnsRecord", json!({"accessKey": key})).await;

    // Shape errors are reported before the key is even looked at
    let (status, _) = api
        .post("/api/updateDnsRecord", json!({"accessKey": "forged"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = api
        .post("/api/updatePattern", json!({"accessKey": "forged", "response": {"pattern": "x"}}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Then authorization, before the variant
    let (status, _) = api
        .post("/api/updateDnsRecord", json!({
            "accessKey": "forged",
            "record": {"id": record["id"], "responsetype": "cname"}
        }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = api
        .post("/api/updateDnsRecord", json!({
            "accessKey": key,
            "record": {"id": record["id"], "responsetype": "cname"}
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid response type: cname");

    let (status, _) = api
        .post("/api/updateDnsRecord", json!({
            "accessKey": key,
            "record": {"id": record["id"], "value1": "1.1.1.1"}
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, records) = api.post("/api/getDnsRecords", json!({"accessKey": key})).await;
    assert_eq!(records, json!([record]));
}

#[tokio::test]
async fn test_dns_static_to_rebind_switch() {
    let api = TestApi::new();
    let key = api.register("rebind").await;
    let (_, record) = api.post("/api/createDnsRecord", json!({"accessKey": key})).await;
    assert_eq!(record["responsetype"], "static");
    assert_eq!(record["ttl"], "3600");

    let (_, body) = api
        .post("/api/updateDnsRecord", json!({
            "accessKey": key,
            "record": {
                "id": record["id"],
                "host": "rebind.collab.test",
                "responsetype": "rebind",
                "name": "@",
                "type": "A",
                "value1": "203.0.113.10",
                "value2": "127.0.0.1"
            }
        }))
        .await;
    assert_eq!(body, json!({"success": true, "matched": true}));

    let (_, records) = api.post("/api/getDnsRecords", json!({"accessKey": key})).await;
    let stored = &records[0];
    assert_eq!(stored["responsetype"], "rebind");
    assert_eq!(stored["value1"], "203.0.113.10");
    assert_eq!(stored["value2"], "127.0.0.1");
    assert!(stored.get("value").is_none());
    assert!(stored.get("ttl").is_none());
}

#[tokio::test]
async fn test_after_window_is_exclusive() {
    let api = TestApi::new();
    let key = api.register("window").await;
    let host = Host::new("window.collab.test");

    for secs in [100, 200, 300] {
        api.captured
            .record_http(HttpInteraction {
                host: host.clone(),
                timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
                pattern_id: None,
                remote_addr: Some("192.0.2.44".to_string()),
                raw_request: b"GET / HTTP/1.1\r\n\r\n".to_vec(),
            })
            .await;
        api.captured
            .record_dns(DnsInteraction {
                host: host.clone(),
                timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
                remote_addr: None,
                name: "window.collab.test".to_string(),
                query_type: "TXT".to_string(),
            })
            .await;
    }

    for after in [json!(150), json!("150")] {
        let (status, body) = api
            .post("/api/getRequests", json!({"accessKey": key, "after": after}))
            .await;
        assert_eq!(status, StatusCode::OK);
        let timestamps: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["timestamp"].as_i64().unwrap())
            .collect();
        assert_eq!(timestamps, vec![200, 300]);
        assert_eq!(body[0]["rawrequest"], "R0VUIC8gSFRUUC8xLjENCg0K");
    }

    let (_, body) = api
        .post("/api/getDNSRequests", json!({"accessKey": key, "after": 0}))
        .await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = api
        .post("/api/getDNSRequests", json!({"accessKey": key, "patternId": "p1"}))
        .await;
    assert_eq!(body, json!([]));

    let (status, body) = api
        .post("/api/getSMTPRequests", json!({"accessKey": key, "after": "later"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid after parameter"));

    let (_, summary) = api.post("/api/getDomain", json!({"accessKey": key})).await;
    assert_eq!(
        summary,
        json!({
            "host": "window.collab.test",
            "requestCountHttp": 3,
            "requestCountDns": 3,
            "requestCountSmtp": 0
        })
    );
}

#[tokio::test]
async fn test_non_string_pattern_id_never_widens_readback() {
    let api = TestApi::new();
    let key = api.register("typed").await;
    let host = Host::new("typed.collab.test");

    api.captured
        .record_http(HttpInteraction {
            host: host.clone(),
            timestamp: Utc.timestamp_opt(100, 0).unwrap(),
            pattern_id: Some("7".to_string()),
            remote_addr: None,
            raw_request: b"GET / HTTP/1.1\r\n\r\n".to_vec(),
        })
        .await;
    api.captured
        .record_dns(DnsInteraction {
            host: host.clone(),
            timestamp: Utc.timestamp_opt(100, 0).unwrap(),
            remote_addr: None,
            name: "typed.collab.test".to_string(),
            query_type: "A".to_string(),
        })
        .await;
    api.captured
        .record_smtp(SmtpInteraction {
            host: host.clone(),
            timestamp: Utc.timestamp_opt(100, 0).unwrap(),
            remote_addr: None,
            data: b"HELO x".to_vec(),
        })
        .await;

    for route in ["/api/getRequests", "/api/getDNSRequests", "/api/getSMTPRequests"] {
        for pattern_id in [json!(7), json!(true)] {
            let (status, body) = api
                .post(route, json!({"accessKey": key, "patternId": pattern_id}))
                .await;
            assert_eq!(status, StatusCode::OK, "{}", route);
            assert_eq!(body, json!([]), "{} patternId={}", route, pattern_id);
        }

        let (_, body) = api
            .post(route, json!({"accessKey": key, "patternId": false, "after": false}))
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1, "{}", route);
    }

    let (_, body) = api
        .post("/api/getRequests", json!({"accessKey": key, "patternId": "7"}))
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_nonexistent_is_false() {
    let api = TestApi::new();
    let key = api.register("a").await;

    for id in [json!("does-not-exist"), json!(""), Value::Null] {
        let (status, body) = api
            .post("/api/deleteDnsRecord", json!({"accessKey": key, "id": id}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": false}));
    }

    let (_, pattern) = api.post("/api/createPattern", json!({"accessKey": key})).await;
    let (_, body) = api
        .post("/api/deletePattern", json!({"accessKey": key, "id": pattern["id"]}))
        .await;
    assert_eq!(body, json!({"success": true}));
    let (_, body) = api
        .post("/api/deletePattern", json!({"accessKey": key, "id": pattern["id"]}))
        .await;
    assert_eq!(body, json!({"success": false}));
}

#[tokio::test]
async fn test_cross_tenant_isolation() {
    let api = TestApi::new();
    let alice = api.register("alice").await;
    let mallory = api.register("mallory").await;

    let (_, pattern) = api.post("/api/createPattern", json!({"accessKey": alice})).await;
    let (_, record) = api.post("/api/createDnsRecord", json!({"accessKey": alice})).await;

    let (_, listed) = api.post("/api/getPatterns", json!({"accessKey": mallory})).await;
    assert_eq!(listed, json!([]));
    let (_, listed) = api.post("/api/getDnsRecords", json!({"accessKey": mallory})).await;
    assert_eq!(listed, json!([]));

    let (_, body) = api
        .post("/api/updatePattern", json!({
            "accessKey": mallory,
            "response": {"id": pattern["id"], "responsebody": "pwned"}
        }))
        .await;
    assert_eq!(body, json!({"success": false, "matched": false}));

    let (_, body) = api
        .post("/api/updateDnsRecord", json!({
            "accessKey": mallory,
            "record": {"id": record["id"], "value": "pwned"}
        }))
        .await;
    assert_eq!(body, json!({"success": false, "matched": false}));

    let (_, body) = api
        .post("/api/deletePattern", json!({"accessKey": mallory, "id": pattern["id"]}))
        .await;
    assert_eq!(body, json!({"success": false}));
    let (_, body) = api
        .post("/api/deleteDnsRecord", json!({"accessKey": mallory, "id": record["id"]}))
        .await;
    assert_eq!(body, json!({"success": false}));

    let (_, listed) = api.post("/api/getPatterns", json!({"accessKey": alice})).await;
    assert_eq!(listed, json!([pattern]));
    let (_, listed) = api.post("/api/getDnsRecords", json!({"accessKey": alice})).await;
    assert_eq!(listed, json!([record]));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let api = TestApi::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/getPatterns")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = api.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
}
