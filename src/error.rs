use fantoccini::error::{CmdError, ErrorStatus, NewSessionError};
use thiserror::Error;

/// Uniform failure taxonomy surfaced to MCP clients. Every tool call that
/// fails produces exactly one of these kinds in the response envelope; the
/// process itself stays alive across failures.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("no active browser session — start a browser first")]
    NoActiveSession,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("unsupported browser kind: {0}")]
    UnsupportedBrowserKind(String),

    #[error("failed to start browser driver: {0}")]
    DriverStartFailure(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("click intercepted: {0}")]
    ClickIntercepted(String),

    #[error("navigation failed: {0}")]
    NavigationFailure(String),

    #[error("script error: {0}")]
    ScriptError(String),

    #[error("{0}")]
    UnknownFailure(String),
}

impl ToolError {
    /// Stable kind tag reported alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::UnknownTool(_) => "UnknownTool",
            ToolError::InvalidArguments(_) => "InvalidArguments",
            ToolError::NoActiveSession => "NoActiveSession",
            ToolError::SessionNotFound(_) => "SessionNotFound",
            ToolError::UnsupportedBrowserKind(_) => "UnsupportedBrowserKind",
            ToolError::DriverStartFailure(_) => "DriverStartFailure",
            ToolError::ElementNotFound(_) => "ElementNotFound",
            ToolError::Timeout(_) => "Timeout",
            ToolError::ClickIntercepted(_) => "ClickIntercepted",
            ToolError::NavigationFailure(_) => "NavigationFailure",
            ToolError::ScriptError(_) => "ScriptError",
            ToolError::UnknownFailure(_) => "UnknownFailure",
        }
    }

    /// Classify a WebDriver command failure into the taxonomy.
    ///
    /// Stale element references count as `ElementNotFound`: the element is
    /// gone from the page by the time the command ran.
    pub fn from_cmd(err: CmdError) -> Self {
        match err {
            CmdError::WaitTimeout => {
                ToolError::Timeout("wait condition not met within the timeout".into())
            }
            CmdError::Standard(w) => {
                let message = w.message.to_string();
                match w.error {
                    ErrorStatus::NoSuchElement | ErrorStatus::StaleElementReference => {
                        ToolError::ElementNotFound(message)
                    }
                    ErrorStatus::Timeout | ErrorStatus::ScriptTimeout => {
                        ToolError::Timeout(message)
                    }
                    ErrorStatus::ElementClickIntercepted => {
                        ToolError::ClickIntercepted(message)
                    }
                    ErrorStatus::JavascriptError => ToolError::ScriptError(message),
                    ErrorStatus::SessionNotCreated => ToolError::DriverStartFailure(message),
                    _ => ToolError::UnknownFailure(message),
                }
            }
            other => ToolError::UnknownFailure(other.to_string()),
        }
    }

    /// Like [`from_cmd`], but failures with no more specific kind surface as
    /// `NavigationFailure`. Used by the navigation tools.
    pub fn from_navigation(err: CmdError) -> Self {
        match Self::from_cmd(err) {
            ToolError::UnknownFailure(msg) => ToolError::NavigationFailure(msg),
            classified => classified,
        }
    }

    pub fn from_new_session(err: NewSessionError) -> Self {
        ToolError::DriverStartFailure(err.to_string())
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_are_stable() {
        assert_eq!(ToolError::NoActiveSession.kind(), "NoActiveSession");
        assert_eq!(ToolError::UnknownTool("x".into()).kind(), "UnknownTool");
        assert_eq!(
            ToolError::UnsupportedBrowserKind("safari".into()).kind(),
            "UnsupportedBrowserKind"
        );
    }

    #[test]
    fn test_wait_timeout_classifies_as_timeout() {
        let err = ToolError::from_cmd(CmdError::WaitTimeout);
        assert!(matches!(err, ToolError::Timeout(_)));
        assert_eq!(err.kind(), "Timeout");
    }

    #[test]
    fn test_navigation_fallback_keeps_specific_kinds() {
        let err = ToolError::from_navigation(CmdError::WaitTimeout);
        assert!(matches!(err, ToolError::Timeout(_)));
    }

    #[test]
    fn test_no_such_element_classifies_as_element_not_found() {
        let wd = fantoccini::error::WebDriver::new(
            ErrorStatus::NoSuchElement,
            "no element matched the selector",
        );
        let err = ToolError::from_cmd(CmdError::Standard(wd));
        assert_eq!(err.kind(), "ElementNotFound");
    }

    #[test]
    fn test_stale_element_classifies_as_element_not_found() {
        let wd = fantoccini::error::WebDriver::new(
            ErrorStatus::StaleElementReference,
            "element is no longer attached",
        );
        let err = ToolError::from_cmd(CmdError::Standard(wd));
        assert_eq!(err.kind(), "ElementNotFound");
    }
}
