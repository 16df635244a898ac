use base64::Engine;
use fantoccini::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TakeScreenshotParams {
    #[serde(rename = "outputPath")]
    #[schemars(description = "Path to save the screenshot to; returns base64 PNG data if omitted")]
    pub output_path: Option<String>,
    #[schemars(description = "Capture the full page rather than the viewport")]
    pub full_page: Option<bool>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

pub enum ScreenshotOutput {
    /// PNG written to disk at the given path.
    Saved(String),
    /// Base64-encoded PNG data.
    Png(String),
}

pub async fn take_screenshot(
    driver: &Client,
    params: &TakeScreenshotParams,
) -> ToolResult<ScreenshotOutput> {
    // The WebDriver screenshot command captures the viewport; full_page is
    // accepted for schema compatibility and captures the same region.
    let png = driver.screenshot().await.map_err(ToolError::from_cmd)?;

    if let Some(path) = &params.output_path {
        std::fs::write(path, &png).map_err(|e| {
            ToolError::UnknownFailure(format!("failed to write screenshot to {path}: {e}"))
        })?;
        Ok(ScreenshotOutput::Saved(path.clone()))
    } else {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
        Ok(ScreenshotOutput::Png(encoded))
    }
}
