//! End-to-end scenarios against a real WebDriver endpoint. Ignored by
//! default; run with a driver listening (chromedriver on :9515, geckodriver,
//! or a Selenium server) and `WEBDRIVER_URL` pointing at it:
//!
//!     WEBDRIVER_URL=http://localhost:9515 cargo test -- --ignored

use selenium_mcp::config::Config;
use selenium_mcp::dispatch::{CommandResult, Dispatcher};
use serde_json::json;

fn live_dispatcher() -> Dispatcher {
    let config = Config::from_env();
    Dispatcher::new(&config)
}

fn payload(result: CommandResult) -> serde_json::Value {
    assert!(
        result.success,
        "tool call failed: {:?}",
        result.error.map(|e| format!("{}: {}", e.kind, e.message))
    );
    result.payload.unwrap_or_default()
}

const PAGE: &str = "data:text/html,<html><head><title>Fixture</title></head>\
                    <body><h1 id='greeting'>hello</h1>\
                    <input id='field' type='text'></body></html>";

#[tokio::test]
#[ignore = "requires a running WebDriver endpoint"]
async fn session_lifecycle_and_page_interaction() {
    let d = live_dispatcher();

    let started = payload(
        d.dispatch("start_browser", json!({ "browser": "chrome", "options": { "headless": true } }))
            .await,
    );
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let listed = payload(d.dispatch("list_sessions", json!({})).await);
    assert_eq!(listed["active_session_id"], json!(session_id));
    assert_eq!(listed["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(listed["sessions"][0]["is_current"], json!(true));

    let navigated = payload(d.dispatch("navigate", json!({ "url": PAGE })).await);
    assert_eq!(navigated["title"], json!("Fixture"));

    let info = payload(
        d.dispatch("get_page_info", json!({ "include_source": false })).await,
    );
    assert_eq!(info["title"], json!("Fixture"));

    let text = payload(
        d.dispatch("get_element_text", json!({ "by": "id", "value": "greeting" }))
            .await,
    );
    assert_eq!(text["text"], json!("hello"));

    payload(
        d.dispatch(
            "send_keys",
            json!({ "by": "id", "value": "field", "text": "typed" }),
        )
        .await,
    );
    let typed = payload(
        d.dispatch(
            "execute_script",
            json!({ "script": "return document.getElementById('field').value;" }),
        )
        .await,
    );
    assert_eq!(typed["result"], json!("typed"));

    // A selector that matches nothing must time out, not hang.
    let miss = d
        .dispatch(
            "find_element",
            json!({ "by": "css", "value": "#absent", "timeout": 300 }),
        )
        .await;
    assert!(!miss.success);
    assert_eq!(miss.error.unwrap().kind, "Timeout");

    payload(d.dispatch("close_session", json!({})).await);
    let after = payload(d.dispatch("list_sessions", json!({})).await);
    assert_eq!(after["sessions"], json!([]));
}

#[tokio::test]
#[ignore = "requires a running WebDriver endpoint"]
async fn closing_active_session_does_not_promote_another() {
    let d = live_dispatcher();

    let first = payload(
        d.dispatch("start_browser", json!({ "browser": "chrome", "options": { "headless": true } }))
            .await,
    );
    let first_id = first["session_id"].as_str().unwrap().to_string();

    let second = payload(
        d.dispatch("start_browser", json!({ "browser": "chrome", "options": { "headless": true } }))
            .await,
    );
    let second_id = second["session_id"].as_str().unwrap().to_string();

    // Starting the second made it active; go back to the first and close it.
    payload(d.dispatch("switch_session", json!({ "session_id": first_id })).await);
    payload(d.dispatch("close_session", json!({})).await);

    // The survivor is still open but NOT active: driver tools must demand an
    // explicit switch or session_id.
    let listed = payload(d.dispatch("list_sessions", json!({})).await);
    assert_eq!(listed["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(listed["active_session_id"], json!(null));

    let result = d.dispatch("navigate", json!({ "url": PAGE })).await;
    assert!(!result.success);
    assert_eq!(result.error.unwrap().kind, "NoActiveSession");

    let explicit = payload(
        d.dispatch(
            "navigate",
            json!({ "url": PAGE, "session_id": second_id.clone() }),
        )
        .await,
    );
    assert_eq!(explicit["title"], json!("Fixture"));

    payload(
        d.dispatch("close_session", json!({ "session_id": second_id })).await,
    );
}
