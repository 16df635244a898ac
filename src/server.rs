use rmcp::model::*;
use rmcp::tool;
use rmcp::{Error as McpError, ServerHandler};
use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::{Dispatcher, ToolCommand, ToolOutput};
use crate::error::ToolError;
use crate::tools::{actions, browser, elements, navigation, screenshot, script};

/// The MCP server that routes tool calls to Selenium WebDriver sessions.
#[derive(Clone)]
pub struct SeleniumMcpServer {
    dispatcher: Arc<Dispatcher>,
}

impl SeleniumMcpServer {
    pub fn new(config: &Config) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(config)),
        }
    }

    /// Close every open browser session. Called on shutdown.
    pub async fn shutdown(&self) {
        self.dispatcher.shutdown().await;
    }

    /// Run a validated command and fold the outcome into a tool result.
    /// Failures become tool-level errors (`is_error`) rather than protocol
    /// errors, so callers see the tagged kind and message.
    async fn run(&self, command: ToolCommand) -> Result<CallToolResult, McpError> {
        match self.dispatcher.execute(command).await {
            Ok(ToolOutput::Json(value)) => Self::json_result(value),
            Ok(ToolOutput::Image(base64)) => Self::image_result(base64),
            Err(e) => Self::error_result(&e),
        }
    }

    fn json_result(value: impl serde::Serialize) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| McpError::internal_error(format!("JSON error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    fn image_result(base64_data: String) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::image(base64_data, "image/png")]))
    }

    fn error_result(error: &ToolError) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::error(vec![Content::text(format!(
            "{}: {}",
            error.kind(),
            error
        ))]))
    }
}

#[tool(tool_box)]
impl ServerHandler for SeleniumMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "selenium-mcp: Browser automation over Selenium WebDriver. \
                 Start with `start_browser` to open a session, `navigate` to load \
                 a page, then use the element and action tools to interact."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tool(tool_box)]
impl SeleniumMcpServer {
    // ── Session management ──────────────────────────────────────────────

    #[tool(description = "Start a new browser session (chrome or firefox). \
                          The new session becomes the active one.")]
    async fn start_browser(
        &self,
        #[tool(aggr)] params: browser::StartBrowserParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::StartBrowser(params)).await
    }

    #[tool(description = "List all open browser sessions, oldest first.")]
    async fn list_sessions(
        &self,
        #[tool(aggr)] params: browser::ListSessionsParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::ListSessions(params)).await
    }

    #[tool(description = "Make a different open session the active one.")]
    async fn switch_session(
        &self,
        #[tool(aggr)] params: browser::SwitchSessionParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::SwitchSession(params)).await
    }

    #[tool(description = "Close a browser session. Closes the active session \
                          when no session_id is given.")]
    async fn close_session(
        &self,
        #[tool(aggr)] params: browser::CloseSessionParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::CloseSession(params)).await
    }

    // ── Navigation ──────────────────────────────────────────────────────

    #[tool(description = "Navigate to a URL. Returns the page URL and title.")]
    async fn navigate(
        &self,
        #[tool(aggr)] params: navigation::NavigateParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::Navigate(params)).await
    }

    #[tool(description = "Get the current page's title, URL, and optionally \
                          its full HTML source.")]
    async fn get_page_info(
        &self,
        #[tool(aggr)] params: navigation::GetPageInfoParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::GetPageInfo(params)).await
    }

    // ── Elements ────────────────────────────────────────────────────────

    #[tool(description = "Find an element by locator, waiting for it to appear.")]
    async fn find_element(
        &self,
        #[tool(aggr)] params: elements::FindElementParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::FindElement(params)).await
    }

    #[tool(description = "Click an element. Waits for it to be clickable; \
                          set force_click to fall back to a scripted click.")]
    async fn click_element(
        &self,
        #[tool(aggr)] params: elements::ClickElementParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::ClickElement(params)).await
    }

    #[tool(description = "Type text into an element, clearing it first by default.")]
    async fn send_keys(
        &self,
        #[tool(aggr)] params: elements::SendKeysParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::SendKeys(params)).await
    }

    #[tool(description = "Get an element's visible text content.")]
    async fn get_element_text(
        &self,
        #[tool(aggr)] params: elements::GetElementTextParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::GetElementText(params)).await
    }

    #[tool(description = "Wait until an element is present (optionally visible).")]
    async fn wait_for_element(
        &self,
        #[tool(aggr)] params: elements::WaitForElementParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::WaitForElement(params)).await
    }

    // ── Actions ─────────────────────────────────────────────────────────

    #[tool(description = "Hover the mouse over an element.")]
    async fn hover(
        &self,
        #[tool(aggr)] params: actions::HoverParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::Hover(params)).await
    }

    #[tool(description = "Drag one element onto another.")]
    async fn drag_and_drop(
        &self,
        #[tool(aggr)] params: actions::DragAndDropParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::DragAndDrop(params)).await
    }

    #[tool(description = "Double-click an element.")]
    async fn double_click(
        &self,
        #[tool(aggr)] params: actions::DoubleClickParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::DoubleClick(params)).await
    }

    #[tool(description = "Right-click (context-click) an element.")]
    async fn right_click(
        &self,
        #[tool(aggr)] params: actions::RightClickParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::RightClick(params)).await
    }

    #[tool(description = "Press a keyboard key (e.g. Enter, Tab, Escape), \
                          optionally targeting an element.")]
    async fn press_key(
        &self,
        #[tool(aggr)] params: actions::PressKeyParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::PressKey(params)).await
    }

    // ── Scripting ───────────────────────────────────────────────────────

    #[tool(description = "Execute JavaScript in the page and return its result.")]
    async fn execute_script(
        &self,
        #[tool(aggr)] params: script::ExecuteScriptParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::ExecuteScript(params)).await
    }

    // ── Files & capture ─────────────────────────────────────────────────

    #[tool(description = "Upload a local file through a file input element.")]
    async fn upload_file(
        &self,
        #[tool(aggr)] params: elements::UploadFileParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::UploadFile(params)).await
    }

    #[tool(description = "Take a PNG screenshot. Saves to output_path when \
                          given, otherwise returns the image inline.")]
    async fn take_screenshot(
        &self,
        #[tool(aggr)] params: screenshot::TakeScreenshotParams,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCommand::TakeScreenshot(params)).await
    }
}
