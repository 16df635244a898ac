use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ToolResult;
use crate::session::{BrowserOptions, SessionRegistry};

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StartBrowserParams {
    #[schemars(description = "Browser to launch (chrome or firefox)")]
    pub browser: String,
    #[schemars(description = "Browser startup options")]
    pub options: Option<BrowserOptions>,
    #[schemars(description = "Optional name for the session")]
    pub session_name: Option<String>,
}

pub async fn start_browser(
    registry: &mut SessionRegistry,
    params: &StartBrowserParams,
) -> ToolResult<Value> {
    let options = params.options.clone().unwrap_or_default();
    let id = registry
        .create(&params.browser, &options, params.session_name.clone())
        .await?;
    Ok(json!({
        "session_id": id,
        "browser": params.browser.to_ascii_lowercase(),
        "name": params.session_name,
    }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListSessionsParams {}

pub fn list_sessions(registry: &SessionRegistry) -> ToolResult<Value> {
    Ok(json!({
        "sessions": registry.list(),
        "active_session_id": registry.active_id(),
    }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SwitchSessionParams {
    #[schemars(description = "Session ID to switch to")]
    pub session_id: String,
}

pub fn switch_session(
    registry: &mut SessionRegistry,
    params: &SwitchSessionParams,
) -> ToolResult<Value> {
    registry.switch_active(&params.session_id)?;
    Ok(json!({ "session_id": params.session_id }))
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CloseSessionParams {
    #[schemars(description = "Session ID to close (closes the active session if omitted)")]
    pub session_id: Option<String>,
}

pub async fn close_session(
    registry: &mut SessionRegistry,
    params: &CloseSessionParams,
) -> ToolResult<Value> {
    let closed = registry.close(params.session_id.as_deref()).await?;
    Ok(json!({ "session_id": closed }))
}
