use fantoccini::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::POLL_INTERVAL;
use crate::error::{ToolError, ToolResult};

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NavigateParams {
    #[schemars(description = "URL to navigate to")]
    pub url: String,
    #[schemars(description = "Wait for the page to fully load (default: true)")]
    pub wait_for_load: Option<bool>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

/// Budget for the post-navigation readyState wait.
const LOAD_WAIT_MS: u64 = 10_000;

pub async fn navigate(driver: &Client, params: &NavigateParams) -> ToolResult<Value> {
    tracing::info!("Navigating to: {}", params.url);
    driver
        .goto(&params.url)
        .await
        .map_err(ToolError::from_navigation)?;

    if params.wait_for_load.unwrap_or(true) {
        wait_for_ready_state(driver).await?;
    }

    let url = driver
        .current_url()
        .await
        .map_err(ToolError::from_navigation)?;
    let title = driver.title().await.map_err(ToolError::from_navigation)?;

    Ok(json!({ "url": url.as_str(), "title": title }))
}

/// Poll `document.readyState` until the page reports complete.
async fn wait_for_ready_state(driver: &Client) -> ToolResult<()> {
    let mut elapsed = 0u64;
    loop {
        let state = driver
            .execute("return document.readyState", vec![])
            .await
            .map_err(ToolError::from_navigation)?;
        if state.as_str() == Some("complete") {
            return Ok(());
        }
        if elapsed >= LOAD_WAIT_MS {
            return Err(ToolError::Timeout(format!(
                "page did not finish loading within {}ms",
                LOAD_WAIT_MS
            )));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        elapsed += POLL_INTERVAL.as_millis() as u64;
    }
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetPageInfoParams {
    #[schemars(description = "Include the page title (default: true)")]
    pub include_title: Option<bool>,
    #[schemars(description = "Include the current URL (default: true)")]
    pub include_url: Option<bool>,
    #[schemars(description = "Include the full page source (default: false)")]
    pub include_source: Option<bool>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn get_page_info(driver: &Client, params: &GetPageInfoParams) -> ToolResult<Value> {
    let mut info = serde_json::Map::new();

    if params.include_title.unwrap_or(true) {
        let title = driver.title().await.map_err(ToolError::from_cmd)?;
        info.insert("title".into(), json!(title));
    }
    if params.include_url.unwrap_or(true) {
        let url = driver.current_url().await.map_err(ToolError::from_cmd)?;
        info.insert("url".into(), json!(url.as_str()));
    }
    if params.include_source.unwrap_or(false) {
        let source = driver.source().await.map_err(ToolError::from_cmd)?;
        info.insert("source".into(), json!(source));
    }
    info.insert("timestamp".into(), json!(chrono::Utc::now().to_rfc3339()));

    Ok(Value::Object(info))
}
