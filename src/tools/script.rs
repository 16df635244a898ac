use fantoccini::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ToolError, ToolResult};

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExecuteScriptParams {
    #[schemars(description = "JavaScript code to execute in the page")]
    pub script: String,
    #[schemars(description = "Arguments to pass to the script (available as `arguments` in the page)")]
    pub arguments: Option<Vec<String>>,
    #[schemars(description = "Target session ID (defaults to the active session)")]
    pub session_id: Option<String>,
}

/// Run a script in the page and return its JSON value. Script failures
/// surface as `ScriptError`.
pub async fn execute_script(driver: &Client, params: &ExecuteScriptParams) -> ToolResult<Value> {
    let args: Vec<Value> = params
        .arguments
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(Value::String)
        .collect();
    let result = driver
        .execute(&params.script, args)
        .await
        .map_err(|e| match ToolError::from_cmd(e) {
            ToolError::UnknownFailure(msg) => ToolError::ScriptError(msg),
            classified => classified,
        })?;
    Ok(serde_json::json!({ "result": result }))
}
