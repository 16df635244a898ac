use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::POLL_INTERVAL;
use crate::error::{ToolError, ToolResult};
use crate::locator::{LocatorStrategy, ResolvedLocator};

/// Wait for a locator to resolve to an element, polling until the timeout.
pub(crate) async fn find_with_timeout(
    driver: &Client,
    locator: &ResolvedLocator,
    timeout_ms: u64,
) -> ToolResult<Element> {
    match driver
        .wait()
        .at_most(Duration::from_millis(timeout_ms))
        .every(POLL_INTERVAL)
        .for_element(locator.as_locator())
        .await
    {
        Ok(element) => Ok(element),
        Err(CmdError::WaitTimeout) => Err(ToolError::Timeout(format!(
            "element {} not found within {}ms",
            locator.describe(),
            timeout_ms
        ))),
        Err(e) => Err(ToolError::from_cmd(e)),
    }
}

/// Keep polling a predicate against an already-found element until it holds
/// or the timeout budget runs out.
async fn wait_for_state<F, Fut>(
    element: &Element,
    timeout_ms: u64,
    description: &str,
    check: F,
) -> ToolResult<()>
where
    F: Fn(Element) -> Fut,
    Fut: std::future::Future<Output = Result<bool, CmdError>>,
{
    let mut elapsed = 0u64;
    loop {
        if check(element.clone()).await.map_err(ToolError::from_cmd)? {
            return Ok(());
        }
        if elapsed >= timeout_ms {
            return Err(ToolError::Timeout(format!(
                "element did not become {} within {}ms",
                description, timeout_ms
            )));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        elapsed += POLL_INTERVAL.as_millis() as u64;
    }
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FindElementParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Wait for the element to be clickable (displayed and enabled)")]
    pub wait_for_clickable: Option<bool>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn find_element(
    driver: &Client,
    params: &FindElementParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let locator = params.by.resolve(&params.value);
    let element = find_with_timeout(driver, &locator, timeout).await?;

    if params.wait_for_clickable.unwrap_or(false) {
        wait_for_state(&element, timeout, "clickable", |el| async move {
            Ok(el.is_displayed().await? && el.is_enabled().await?)
        })
        .await?;
    }

    let tag = element.tag_name().await.map_err(ToolError::from_cmd)?;
    let displayed = element.is_displayed().await.map_err(ToolError::from_cmd)?;
    Ok(json!({
        "found": true,
        "tag": tag,
        "displayed": displayed,
    }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ClickElementParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Fall back to a JavaScript click if the native click is intercepted")]
    pub force_click: Option<bool>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn click_element(
    driver: &Client,
    params: &ClickElementParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let locator = params.by.resolve(&params.value);
    let element = find_with_timeout(driver, &locator, timeout).await?;

    wait_for_state(&element, timeout, "clickable", |el| async move {
        Ok(el.is_displayed().await? && el.is_enabled().await?)
    })
    .await?;

    match element.click().await {
        Ok(()) => Ok(json!({ "clicked": true, "method": "native" })),
        Err(e) => {
            let classified = ToolError::from_cmd(e);
            let intercepted = matches!(classified, ToolError::ClickIntercepted(_));
            if intercepted && params.force_click.unwrap_or(false) {
                driver
                    .execute(
                        "arguments[0].click();",
                        vec![serde_json::to_value(&element)
                            .map_err(|e| ToolError::UnknownFailure(e.to_string()))?],
                    )
                    .await
                    .map_err(ToolError::from_cmd)?;
                Ok(json!({ "clicked": true, "method": "javascript" }))
            } else {
                Err(classified)
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SendKeysParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Text to enter into the element")]
    pub text: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Clear the field before typing (default: true)")]
    pub clear_first: Option<bool>,
    #[schemars(description = "Delay between keystrokes, in milliseconds")]
    pub type_speed: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn send_keys(
    driver: &Client,
    params: &SendKeysParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let locator = params.by.resolve(&params.value);
    let element = find_with_timeout(driver, &locator, timeout).await?;

    if params.clear_first.unwrap_or(true) {
        element.clear().await.map_err(ToolError::from_cmd)?;
    }

    let type_speed = params.type_speed.unwrap_or(0);
    if type_speed > 0 {
        for ch in params.text.chars() {
            element
                .send_keys(&ch.to_string())
                .await
                .map_err(ToolError::from_cmd)?;
            tokio::time::sleep(Duration::from_millis(type_speed)).await;
        }
    } else {
        element
            .send_keys(&params.text)
            .await
            .map_err(ToolError::from_cmd)?;
    }

    Ok(json!({ "typed": params.text.chars().count() }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetElementTextParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn get_element_text(
    driver: &Client,
    params: &GetElementTextParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let locator = params.by.resolve(&params.value);
    let element = find_with_timeout(driver, &locator, timeout).await?;
    let text = element.text().await.map_err(ToolError::from_cmd)?;
    Ok(json!({ "text": text }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WaitForElementParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Additionally wait for the element to be visible")]
    pub wait_for_visible: Option<bool>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn wait_for_element(
    driver: &Client,
    params: &WaitForElementParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let locator = params.by.resolve(&params.value);
    let element = find_with_timeout(driver, &locator, timeout).await?;

    if params.wait_for_visible.unwrap_or(false) {
        wait_for_state(&element, timeout, "visible", |el| async move {
            el.is_displayed().await
        })
        .await?;
    }

    Ok(json!({ "found": true }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UploadFileParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[serde(rename = "filePath")]
    #[schemars(description = "Absolute path to the file to upload")]
    pub file_path: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

/// Send a file path to a file input. The driver resolves the path on the
/// machine the browser runs on.
pub async fn upload_file(
    driver: &Client,
    params: &UploadFileParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let locator = params.by.resolve(&params.value);
    let element = find_with_timeout(driver, &locator, timeout).await?;
    element
        .send_keys(&params.file_path)
        .await
        .map_err(ToolError::from_cmd)?;
    Ok(json!({ "uploaded": params.file_path }))
}
