use fantoccini::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::elements::find_with_timeout;
use crate::error::{ToolError, ToolResult};
use crate::locator::LocatorStrategy;

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HoverParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

/// Mouse-event hover. Some driver action APIs differ across browsers, so the
/// events are dispatched in the page with the element passed as a script
/// argument.
pub async fn hover(
    driver: &Client,
    params: &HoverParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let element = find_with_timeout(driver, &params.by.resolve(&params.value), timeout).await?;

    let script = r#"
        const el = arguments[0];
        el.scrollIntoView({ block: 'center', inline: 'center' });
        const rect = el.getBoundingClientRect();
        const opts = {
            bubbles: true, cancelable: true, view: window,
            clientX: rect.left + rect.width / 2,
            clientY: rect.top + rect.height / 2,
        };
        el.dispatchEvent(new MouseEvent('mouseenter', opts));
        el.dispatchEvent(new MouseEvent('mouseover', opts));
        el.dispatchEvent(new MouseEvent('mousemove', opts));
        return true;
    "#;
    driver
        .execute(script, vec![element_arg(&element)?])
        .await
        .map_err(ToolError::from_cmd)?;
    Ok(json!({ "hovered": true }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DragAndDropParams {
    #[schemars(description = "Locator strategy for the source element")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the source locator strategy")]
    pub value: String,
    #[serde(rename = "targetBy")]
    #[schemars(description = "Locator strategy for the target element")]
    pub target_by: LocatorStrategy,
    #[serde(rename = "targetValue")]
    #[schemars(description = "Value for the target locator strategy")]
    pub target_value: String,
    #[schemars(description = "Maximum time to wait for the elements, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn drag_and_drop(
    driver: &Client,
    params: &DragAndDropParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let source = find_with_timeout(driver, &params.by.resolve(&params.value), timeout).await?;
    let target =
        find_with_timeout(driver, &params.target_by.resolve(&params.target_value), timeout)
            .await?;

    let script = r#"
        const source = arguments[0];
        const target = arguments[1];
        source.scrollIntoView({ block: 'center' });
        const data = new DataTransfer();
        const at = (el) => {
            const rect = el.getBoundingClientRect();
            return {
                bubbles: true, cancelable: true, dataTransfer: data,
                clientX: rect.left + rect.width / 2,
                clientY: rect.top + rect.height / 2,
            };
        };
        source.dispatchEvent(new DragEvent('dragstart', at(source)));
        target.dispatchEvent(new DragEvent('dragenter', at(target)));
        target.dispatchEvent(new DragEvent('dragover', at(target)));
        target.dispatchEvent(new DragEvent('drop', at(target)));
        source.dispatchEvent(new DragEvent('dragend', at(target)));
        return true;
    "#;
    driver
        .execute(script, vec![element_arg(&source)?, element_arg(&target)?])
        .await
        .map_err(ToolError::from_cmd)?;
    Ok(json!({ "dropped": true }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DoubleClickParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn double_click(
    driver: &Client,
    params: &DoubleClickParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let element = find_with_timeout(driver, &params.by.resolve(&params.value), timeout).await?;

    let script = r#"
        const el = arguments[0];
        el.scrollIntoView({ block: 'center' });
        const rect = el.getBoundingClientRect();
        const opts = {
            bubbles: true, cancelable: true, view: window,
            clientX: rect.left + rect.width / 2,
            clientY: rect.top + rect.height / 2,
        };
        for (let i = 0; i < 2; i++) {
            el.dispatchEvent(new MouseEvent('mousedown', opts));
            el.dispatchEvent(new MouseEvent('mouseup', opts));
            el.dispatchEvent(new MouseEvent('click', opts));
        }
        el.dispatchEvent(new MouseEvent('dblclick', opts));
        return true;
    "#;
    driver
        .execute(script, vec![element_arg(&element)?])
        .await
        .map_err(ToolError::from_cmd)?;
    Ok(json!({ "double_clicked": true }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RightClickParams {
    #[schemars(description = "Locator strategy: id, css, xpath, name, tag, or class")]
    pub by: LocatorStrategy,
    #[schemars(description = "Value for the locator strategy")]
    pub value: String,
    #[schemars(description = "Maximum time to wait for the element, in milliseconds")]
    pub timeout: Option<u64>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub async fn right_click(
    driver: &Client,
    params: &RightClickParams,
    default_timeout_ms: u64,
) -> ToolResult<Value> {
    let timeout = params.timeout.unwrap_or(default_timeout_ms);
    let element = find_with_timeout(driver, &params.by.resolve(&params.value), timeout).await?;

    let script = r#"
        const el = arguments[0];
        el.scrollIntoView({ block: 'center' });
        const rect = el.getBoundingClientRect();
        const opts = {
            bubbles: true, cancelable: true, view: window, button: 2,
            clientX: rect.left + rect.width / 2,
            clientY: rect.top + rect.height / 2,
        };
        el.dispatchEvent(new MouseEvent('mousedown', opts));
        el.dispatchEvent(new MouseEvent('mouseup', opts));
        el.dispatchEvent(new MouseEvent('contextmenu', opts));
        return true;
    "#;
    driver
        .execute(script, vec![element_arg(&element)?])
        .await
        .map_err(ToolError::from_cmd)?;
    Ok(json!({ "right_clicked": true }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PressKeyParams {
    #[schemars(description = "Key to press (e.g. 'Enter', 'Tab', 'Escape', 'a')")]
    pub key: String,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

/// Send a key to the focused element, falling back to the document body when
/// nothing holds focus.
pub async fn press_key(driver: &Client, params: &PressKeyParams) -> ToolResult<Value> {
    let key_input = webdriver_key(&params.key);
    match driver.active_element().await {
        Ok(element) => element
            .send_keys(&key_input)
            .await
            .map_err(ToolError::from_cmd)?,
        Err(_) => {
            let body = driver
                .find(fantoccini::Locator::Css("body"))
                .await
                .map_err(ToolError::from_cmd)?;
            body.send_keys(&key_input)
                .await
                .map_err(ToolError::from_cmd)?;
        }
    }
    Ok(json!({ "pressed": params.key }))
}

/// Translate a named key to its WebDriver codepoint; anything else is sent
/// as literal text.
fn webdriver_key(key: &str) -> String {
    match key {
        "Enter" => "\u{E007}".to_string(),
        "Tab" => "\u{E004}".to_string(),
        "Escape" => "\u{E00C}".to_string(),
        "Backspace" => "\u{E003}".to_string(),
        "Delete" => "\u{E017}".to_string(),
        "Space" => "\u{E00D}".to_string(),
        "ArrowLeft" => "\u{E012}".to_string(),
        "ArrowUp" => "\u{E013}".to_string(),
        "ArrowRight" => "\u{E014}".to_string(),
        "ArrowDown" => "\u{E015}".to_string(),
        "Home" => "\u{E011}".to_string(),
        "End" => "\u{E010}".to_string(),
        "PageUp" => "\u{E00E}".to_string(),
        "PageDown" => "\u{E00F}".to_string(),
        "Insert" => "\u{E016}".to_string(),
        other => other.to_string(),
    }
}

fn element_arg(element: &fantoccini::elements::Element) -> ToolResult<Value> {
    serde_json::to_value(element).map_err(|e| ToolError::UnknownFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_map_to_webdriver_codepoints() {
        assert_eq!(webdriver_key("Enter"), "\u{E007}");
        assert_eq!(webdriver_key("Tab"), "\u{E004}");
        assert_eq!(webdriver_key("ArrowDown"), "\u{E015}");
    }

    #[test]
    fn test_plain_characters_pass_through() {
        assert_eq!(webdriver_key("a"), "a");
        assert_eq!(webdriver_key("%"), "%");
    }
}
