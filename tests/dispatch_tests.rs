//! Dispatcher behavior that needs no live browser: name routing, argument
//! validation, and session bookkeeping errors. Everything here runs against
//! an unreachable WebDriver endpoint.

use selenium_mcp::config::Config;
use selenium_mcp::dispatch::{CommandResult, Dispatcher, TOOL_NAMES};
use serde_json::{json, Value};

fn dispatcher() -> Dispatcher {
    // Port 1 is never listening; session creation must fail fast.
    let config = Config {
        webdriver_url: "http://127.0.0.1:1".to_string(),
        default_timeout_ms: 500,
        ..Config::default()
    };
    Dispatcher::new(&config)
}

fn error_kind(result: &CommandResult) -> &str {
    assert!(!result.success, "expected a failure, got {:?}", result.payload);
    result.error.as_ref().map(|e| e.kind).unwrap_or("<none>")
}

// ── Name routing ────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_tool_name_is_rejected() {
    let d = dispatcher();
    let result = d.dispatch("spin_the_wheel", json!({})).await;
    assert_eq!(error_kind(&result), "UnknownTool");
    let message = result.error.unwrap().message;
    assert!(message.contains("spin_the_wheel"));
}

#[tokio::test]
async fn every_advertised_tool_name_routes() {
    let d = dispatcher();
    assert_eq!(TOOL_NAMES.len(), 19);
    for name in TOOL_NAMES {
        let result = d.dispatch(name, Value::Null).await;
        if let Some(error) = &result.error {
            assert_ne!(error.kind, "UnknownTool", "{} did not route", name);
        }
    }
}

// ── Argument validation ─────────────────────────────────────────────────

#[tokio::test]
async fn missing_required_argument_is_invalid() {
    let d = dispatcher();
    let result = d.dispatch("navigate", json!({})).await;
    assert_eq!(error_kind(&result), "InvalidArguments");
}

#[tokio::test]
async fn mistyped_argument_is_invalid() {
    let d = dispatcher();
    let result = d
        .dispatch(
            "find_element",
            json!({ "by": "css", "value": "#main", "timeout": "soon" }),
        )
        .await;
    assert_eq!(error_kind(&result), "InvalidArguments");
}

#[tokio::test]
async fn unknown_field_is_invalid() {
    let d = dispatcher();
    let result = d
        .dispatch("navigate", json!({ "url": "https://example.com", "wat": 1 }))
        .await;
    assert_eq!(error_kind(&result), "InvalidArguments");
}

#[tokio::test]
async fn unknown_locator_strategy_is_invalid() {
    let d = dispatcher();
    let result = d
        .dispatch("find_element", json!({ "by": "partial_link", "value": "x" }))
        .await;
    assert_eq!(error_kind(&result), "InvalidArguments");
}

#[tokio::test]
async fn argument_validation_runs_before_session_lookup() {
    // Invalid shape on an empty registry reports the argument problem,
    // not the missing session.
    let d = dispatcher();
    let result = d.dispatch("click_element", json!({ "by": "css" })).await;
    assert_eq!(error_kind(&result), "InvalidArguments");
}

// ── Session bookkeeping errors ──────────────────────────────────────────

#[tokio::test]
async fn driver_tool_without_session_reports_no_active_session() {
    let d = dispatcher();
    let result = d
        .dispatch("navigate", json!({ "url": "https://example.com" }))
        .await;
    assert_eq!(error_kind(&result), "NoActiveSession");
}

#[tokio::test]
async fn close_session_without_active_reports_no_active_session() {
    let d = dispatcher();
    let result = d.dispatch("close_session", json!({})).await;
    assert_eq!(error_kind(&result), "NoActiveSession");
}

#[tokio::test]
async fn close_unknown_session_reports_session_not_found() {
    let d = dispatcher();
    let result = d
        .dispatch("close_session", json!({ "session_id": "nope" }))
        .await;
    assert_eq!(error_kind(&result), "SessionNotFound");

    // Nothing else is disturbed by the failed close.
    let listed = d.dispatch("list_sessions", json!({})).await;
    assert!(listed.success);
    assert_eq!(listed.payload.unwrap()["sessions"], json!([]));
}

#[tokio::test]
async fn switch_to_unknown_session_reports_session_not_found() {
    let d = dispatcher();
    let result = d
        .dispatch("switch_session", json!({ "session_id": "no-such-id" }))
        .await;
    assert_eq!(error_kind(&result), "SessionNotFound");
}

#[tokio::test]
async fn explicit_unknown_session_id_reports_session_not_found() {
    let d = dispatcher();
    let result = d
        .dispatch(
            "get_element_text",
            json!({ "by": "id", "value": "greeting", "session_id": "gone" }),
        )
        .await;
    assert_eq!(error_kind(&result), "SessionNotFound");
}

#[tokio::test]
async fn unsupported_browser_kind_leaves_registry_unchanged() {
    let d = dispatcher();
    let result = d.dispatch("start_browser", json!({ "browser": "safari" })).await;
    assert_eq!(error_kind(&result), "UnsupportedBrowserKind");

    let listed = d.dispatch("list_sessions", json!({})).await;
    assert!(listed.success);
    assert_eq!(listed.payload.unwrap()["sessions"], json!([]));
}

#[tokio::test]
async fn unreachable_driver_reports_start_failure_and_registers_nothing() {
    let d = dispatcher();
    let result = d.dispatch("start_browser", json!({ "browser": "chrome" })).await;
    assert_eq!(error_kind(&result), "DriverStartFailure");

    let listed = d.dispatch("list_sessions", json!({})).await;
    assert!(listed.success);
    assert_eq!(listed.payload.unwrap()["sessions"], json!([]));
}

// ── Result envelope ─────────────────────────────────────────────────────

#[tokio::test]
async fn success_envelope_has_payload_and_no_error() {
    let d = dispatcher();
    let result = d.dispatch("list_sessions", json!({})).await;
    assert!(result.success);
    assert!(result.payload.is_some());
    assert!(result.error.is_none());

    let encoded = serde_json::to_value(&result).unwrap();
    assert_eq!(encoded["success"], json!(true));
    assert!(encoded.get("error").is_none());
}

#[tokio::test]
async fn failure_envelope_carries_kind_and_message() {
    let d = dispatcher();
    let result = d.dispatch("navigate", json!({ "url": "https://example.com" })).await;

    let encoded = serde_json::to_value(&result).unwrap();
    assert_eq!(encoded["success"], json!(false));
    assert!(encoded.get("payload").is_none());
    assert_eq!(encoded["error"]["kind"], json!("NoActiveSession"));
    assert!(encoded["error"]["message"].is_string());
}
