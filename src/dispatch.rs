use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{ToolError, ToolResult};
use crate::session::SessionRegistry;
use crate::tools::screenshot::ScreenshotOutput;
use crate::tools::{actions, browser, elements, navigation, screenshot, script};

/// Every tool name the server accepts, in the order they are surfaced.
pub const TOOL_NAMES: &[&str] = &[
    "start_browser",
    "list_sessions",
    "switch_session",
    "close_session",
    "navigate",
    "get_page_info",
    "find_element",
    "click_element",
    "send_keys",
    "get_element_text",
    "wait_for_element",
    "hover",
    "drag_and_drop",
    "double_click",
    "right_click",
    "press_key",
    "execute_script",
    "upload_file",
    "take_screenshot",
];

/// A validated tool invocation: name resolved, arguments deserialized
/// against the tool's schema.
pub enum ToolCommand {
    StartBrowser(browser::StartBrowserParams),
    ListSessions(browser::ListSessionsParams),
    SwitchSession(browser::SwitchSessionParams),
    CloseSession(browser::CloseSessionParams),
    Navigate(navigation::NavigateParams),
    GetPageInfo(navigation::GetPageInfoParams),
    FindElement(elements::FindElementParams),
    ClickElement(elements::ClickElementParams),
    SendKeys(elements::SendKeysParams),
    GetElementText(elements::GetElementTextParams),
    WaitForElement(elements::WaitForElementParams),
    Hover(actions::HoverParams),
    DragAndDrop(actions::DragAndDropParams),
    DoubleClick(actions::DoubleClickParams),
    RightClick(actions::RightClickParams),
    PressKey(actions::PressKeyParams),
    ExecuteScript(script::ExecuteScriptParams),
    UploadFile(elements::UploadFileParams),
    TakeScreenshot(screenshot::TakeScreenshotParams),
}

impl ToolCommand {
    /// Resolve a tool name and argument bag. Unknown names are rejected
    /// before any session state is consulted; argument shape is validated
    /// against the tool's schema, rejecting missing, mistyped, and unknown
    /// fields.
    pub fn parse(name: &str, args: Value) -> Result<Self, ToolError> {
        let args = if args.is_null() { json!({}) } else { args };

        fn shape<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
        }

        Ok(match name {
            "start_browser" => ToolCommand::StartBrowser(shape(args)?),
            "list_sessions" => ToolCommand::ListSessions(shape(args)?),
            "switch_session" => ToolCommand::SwitchSession(shape(args)?),
            "close_session" => ToolCommand::CloseSession(shape(args)?),
            "navigate" => ToolCommand::Navigate(shape(args)?),
            "get_page_info" => ToolCommand::GetPageInfo(shape(args)?),
            "find_element" => ToolCommand::FindElement(shape(args)?),
            "click_element" => ToolCommand::ClickElement(shape(args)?),
            "send_keys" => ToolCommand::SendKeys(shape(args)?),
            "get_element_text" => ToolCommand::GetElementText(shape(args)?),
            "wait_for_element" => ToolCommand::WaitForElement(shape(args)?),
            "hover" => ToolCommand::Hover(shape(args)?),
            "drag_and_drop" => ToolCommand::DragAndDrop(shape(args)?),
            "double_click" => ToolCommand::DoubleClick(shape(args)?),
            "right_click" => ToolCommand::RightClick(shape(args)?),
            "press_key" => ToolCommand::PressKey(shape(args)?),
            "execute_script" => ToolCommand::ExecuteScript(shape(args)?),
            "upload_file" => ToolCommand::UploadFile(shape(args)?),
            "take_screenshot" => ToolCommand::TakeScreenshot(shape(args)?),
            other => return Err(ToolError::UnknownTool(other.to_string())),
        })
    }
}

/// Successful tool output, before protocol formatting.
pub enum ToolOutput {
    Json(Value),
    /// Base64-encoded PNG.
    Image(String),
}

/// Uniform response envelope: success flag plus payload or a tagged error.
#[derive(Debug, Serialize)]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

#[derive(Debug, Serialize)]
pub struct CommandError {
    pub kind: &'static str,
    pub message: String,
}

impl CommandResult {
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn err(error: &ToolError) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(CommandError {
                kind: error.kind(),
                message: error.to_string(),
            }),
        }
    }
}

/// Routes validated commands to the session registry and the WebDriver
/// operations. One command runs at a time: the registry lock is held for the
/// duration of each call, so driver handles are never used concurrently.
pub struct Dispatcher {
    registry: Arc<Mutex<SessionRegistry>>,
    default_timeout_ms: u64,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Arc::new(Mutex::new(SessionRegistry::new(&config.webdriver_url))),
            default_timeout_ms: config.default_timeout_ms,
        }
    }

    /// Parse-and-execute entry point used by the protocol layer.
    pub async fn dispatch(&self, name: &str, args: Value) -> CommandResult {
        let command = match ToolCommand::parse(name, args) {
            Ok(command) => command,
            Err(e) => return CommandResult::err(&e),
        };
        match self.execute(command).await {
            Ok(ToolOutput::Json(payload)) => CommandResult::ok(payload),
            Ok(ToolOutput::Image(base64)) => {
                CommandResult::ok(json!({ "image_base64": base64 }))
            }
            Err(e) => CommandResult::err(&e),
        }
    }

    pub async fn execute(&self, command: ToolCommand) -> ToolResult<ToolOutput> {
        let timeout = self.default_timeout_ms;
        let mut registry = self.registry.lock().await;

        let output = match command {
            ToolCommand::StartBrowser(p) => {
                browser::start_browser(&mut registry, &p).await.map(ToolOutput::Json)
            }
            ToolCommand::ListSessions(_) => {
                browser::list_sessions(&registry).map(ToolOutput::Json)
            }
            ToolCommand::SwitchSession(p) => {
                browser::switch_session(&mut registry, &p).map(ToolOutput::Json)
            }
            ToolCommand::CloseSession(p) => {
                browser::close_session(&mut registry, &p).await.map(ToolOutput::Json)
            }
            ToolCommand::Navigate(p) => {
                let (driver, id) = target(&mut registry, p.session_id.as_deref())?;
                let result = navigation::navigate(&driver, &p).await.map(ToolOutput::Json);
                if result.is_ok() {
                    registry.touch(&id, Some(p.url.clone()));
                }
                result
            }
            ToolCommand::GetPageInfo(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                navigation::get_page_info(&driver, &p).await.map(ToolOutput::Json)
            }
            ToolCommand::FindElement(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                elements::find_element(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::ClickElement(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                elements::click_element(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::SendKeys(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                elements::send_keys(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::GetElementText(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                elements::get_element_text(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::WaitForElement(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                elements::wait_for_element(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::Hover(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                actions::hover(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::DragAndDrop(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                actions::drag_and_drop(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::DoubleClick(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                actions::double_click(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::RightClick(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                actions::right_click(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::PressKey(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                actions::press_key(&driver, &p).await.map(ToolOutput::Json)
            }
            ToolCommand::ExecuteScript(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                script::execute_script(&driver, &p).await.map(ToolOutput::Json)
            }
            ToolCommand::UploadFile(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                elements::upload_file(&driver, &p, timeout).await.map(ToolOutput::Json)
            }
            ToolCommand::TakeScreenshot(p) => {
                let (driver, _) = target(&mut registry, p.session_id.as_deref())?;
                screenshot::take_screenshot(&driver, &p).await.map(|out| match out {
                    ScreenshotOutput::Saved(path) => {
                        ToolOutput::Json(json!({ "saved_to": path }))
                    }
                    ScreenshotOutput::Png(base64) => ToolOutput::Image(base64),
                })
            }
        };

        if let Err(e) = &output {
            tracing::debug!("Tool call failed ({}): {}", e.kind(), e);
        }
        output
    }

    /// Best-effort close of every open session.
    pub async fn shutdown(&self) {
        let mut registry = self.registry.lock().await;
        let open = registry.len();
        if open > 0 {
            tracing::info!("Closing {} open session(s)", open);
        }
        registry.close_all().await;
    }
}

/// Resolve the target session and refresh its activity timestamp. Returns a
/// cloned driver handle; the registry lock stays held by the caller.
fn target(
    registry: &mut SessionRegistry,
    session_id: Option<&str>,
) -> ToolResult<(fantoccini::Client, String)> {
    let (driver, id) = {
        let session = registry.resolve(session_id)?;
        (session.driver.clone(), session.id.clone())
    };
    registry.touch(&id, None);
    Ok((driver, id))
}
