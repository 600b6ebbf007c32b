//! End-to-end tests over the checked-in wallet server.

mod common;

use common::test_server::{header, parse_response, post, send_request, start_routes};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[allow(dead_code)]
mod server {
    include!("../demos/wallet_server/src/main.rs");
}

fn post_json(addr: &std::net::SocketAddr, path: &str, body: Value) -> (u16, Value) {
    let resp = post(addr, path, &body.to_string());
    let (status, _, body) = parse_response(&resp);
    (status, serde_json::from_str(&body).unwrap())
}

#[test]
fn test_routes_cover_exported_functions() {
    let paths: Vec<&str> = server::ROUTES.iter().map(|r| r.path).collect();
    assert_eq!(paths.len(), 15);
    assert_eq!(paths[0], "/api/new");
    assert!(paths.contains(&"/api/derive_key"));
    for excluded in ["/api/init", "/api/shutdown", "/api/sync_remote", "/api/checksum"] {
        assert!(!paths.contains(&excluded), "{excluded} must not be served");
    }
    assert!(!paths.iter().any(|p| p.contains("funded_wallet")));
}

#[test]
fn test_value_is_indexed() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(&addr, "/api/get_balance", json!({"account": "main"}));
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"code": 200, "data": {"result0": 42}, "error": "", "success": true})
    );
}

#[test]
fn test_capitalized_key_is_accepted() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(&addr, "/api/get_balance", json!({"Account": "savings"}));
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(body["data"]["result0"], 1000);
}

#[test]
fn test_no_results_is_empty_success() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(&addr, "/api/ping", json!({}));
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"code": 200, "data": null, "error": "", "success": true})
    );
}

#[test]
fn test_get_is_rejected_without_body() {
    let (handle, addr) = start_routes(server::ROUTES);
    let resp = send_request(
        &addr,
        "GET /api/get_balance HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    handle.stop();
    let (status, headers, body) = parse_response(&resp);
    assert_eq!(status, 405);
    assert_eq!(header(&headers, "allow"), Some("POST"));
    assert!(body.is_empty());
}

#[test]
fn test_unknown_path_is_not_found() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(&addr, "/api/missing", json!({}));
    handle.stop();
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["path"], "/api/missing");
}

#[test]
fn test_malformed_body_is_bad_request() {
    let (handle, addr) = start_routes(server::ROUTES);
    let resp = post(&addr, "/api/get_balance", "{not json");
    let (status, headers, body) = parse_response(&resp);
    let type_mismatch = post(&addr, "/api/get_balance", r#"{"account": 7}"#);
    handle.stop();

    assert_eq!(status, 400);
    assert_eq!(header(&headers, "content-type"), Some("application/json"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let (status, _, _) = parse_response(&type_mismatch);
    assert_eq!(status, 400);
}

#[test]
fn test_returned_error_is_server_error() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(
        &addr,
        "/api/withdraw",
        json!({"wallet": {"owner": "ada", "balance": 5}, "amount": 10}),
    );
    handle.stop();
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({
            "code": 500,
            "data": null,
            "error": "insufficient funds: balance 5, requested 10",
            "success": false
        })
    );
}

#[test]
fn test_value_or_error_success_is_data() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(
        &addr,
        "/api/withdraw",
        json!({"wallet": {"owner": "ada", "balance": 5}, "amount": 2}),
    );
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!({"owner": "ada", "balance": 3}));
}

#[test]
fn test_error_only() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (ok_status, ok_body) = post_json(&addr, "/api/validate_account", json!({"account": "main"}));
    let (err_status, err_body) = post_json(&addr, "/api/validate_account", json!({"account": " "}));
    handle.stop();
    assert_eq!(ok_status, 200);
    assert_eq!(ok_body["data"], Value::Null);
    assert_eq!(err_status, 500);
    assert_eq!(err_body["error"], "account name is empty");
}

#[test]
fn test_variadic_takes_an_array() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(
        &addr,
        "/api/sum",
        json!({"label": "fees", "values": [1, 2, 3]}),
    );
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!({"result0": "fees", "result1": 6}));
}

#[test]
fn test_values_with_trailing_error() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (ok_status, ok_body) = post_json(&addr, "/api/parse_amount", json!({"text": "10 msat"}));
    let (err_status, err_body) = post_json(&addr, "/api/parse_amount", json!({"text": "lots"}));
    handle.stop();
    assert_eq!(ok_status, 200);
    assert_eq!(ok_body["data"], json!({"result0": 10, "result1": "msat"}));
    assert_eq!(err_status, 500);
    assert_eq!(err_body["error"], "invalid amount `lots`");
}

#[test]
fn test_receiver_defaults_when_absent() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (absent_status, absent) = post_json(&addr, "/api/balance", json!({}));
    let (_, present) = post_json(
        &addr,
        "/api/balance",
        json!({"receiver": {"owner": "ada", "balance": 9}}),
    );
    let (_, deposited) = post_json(
        &addr,
        "/api/deposit",
        json!({"receiver": {"owner": "ada", "balance": 9}, "amount": 1}),
    );
    handle.stop();
    assert_eq!(absent_status, 200);
    assert_eq!(absent["data"]["result0"], 0);
    assert_eq!(present["data"]["result0"], 9);
    assert_eq!(deposited["data"]["result0"], 10);
}

#[test]
fn test_owner_constructor() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(&addr, "/api/new", json!({"owner": "ada"}));
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(body["data"]["result0"], json!({"owner": "ada", "balance": 0}));
}

#[test]
fn test_wire_type_argument() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, body) = post_json(
        &addr,
        "/api/transfer",
        json!({"request": {
            "from": {"owner": "ada", "balance": 10},
            "to": {"owner": "bob", "balance": 1},
            "amount": 4
        }}),
    );
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(body["data"]["from"]["balance"], 6);
    assert_eq!(body["data"]["to"]["balance"], 5);
}

#[test]
fn test_keyword_and_optional_parameters() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (_, named) = post_json(&addr, "/api/label", json!({"type": "cold", "name": "vault"}));
    let (_, bare) = post_json(&addr, "/api/label", json!({"Type": "hot"}));
    handle.stop();
    assert_eq!(named["data"]["result0"], "cold:vault");
    assert_eq!(bare["data"]["result0"], "hot");
}

#[test]
fn test_preformatted_payload_is_passed_through() {
    let (handle, addr) = start_routes(server::ROUTES);
    let resp = post(&addr, "/api/raw_json", "{}");
    let exported = post(
        &addr,
        "/api/export_json",
        r#"{"wallet": {"owner": "ada", "balance": 3}}"#,
    );
    handle.stop();

    let (status, headers, body) = parse_response(&resp);
    assert_eq!(status, 200);
    assert_eq!(header(&headers, "content-type"), Some("application/json"));
    assert_eq!(body, r#"{"network":"regtest","height":101}"#);

    let (status, _, body) = parse_response(&exported);
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"owner":"ada","balance":3}"#);
}

#[test]
fn test_nested_module_and_mapping_arguments() {
    let (handle, addr) = start_routes(server::ROUTES);
    let (status, key) = post_json(
        &addr,
        "/api/derive_key",
        json!({"seed": [1, 2, 3], "index": 0}),
    );
    let keys: BTreeMap<&str, u32> = [("spend", 1), ("change", 2)].into_iter().collect();
    let (_, labels) = post_json(&addr, "/api/key_labels", json!({ "keys": keys }));
    handle.stop();
    assert_eq!(status, 200);
    assert_eq!(key["data"]["result0"], wallet::keys::derive_key(&[1, 2, 3], 0));
    assert_eq!(labels["data"]["result0"], json!(["change/2", "spend/1"]));
}

#[test]
fn test_concurrent_requests() {
    let (handle, addr) = start_routes(server::ROUTES);
    let workers: Vec<_> = (0..8u64)
        .map(|i| {
            std::thread::spawn(move || {
                post_json(
                    &addr,
                    "/api/sum",
                    json!({"label": format!("w{i}"), "values": [i, i]}),
                )
            })
        })
        .collect();
    let results: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    handle.stop();
    for (i, (status, body)) in results.into_iter().enumerate() {
        assert_eq!(status, 200);
        assert_eq!(body["data"]["result0"], format!("w{i}"));
        assert_eq!(body["data"]["result1"], 2 * i as u64);
    }
}
