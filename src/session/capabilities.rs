use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ToolError;

/// Browser kinds the registry knows how to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl BrowserKind {
    /// Case-insensitive parse; anything unrecognized is an
    /// `UnsupportedBrowserKind` surfaced to the caller.
    pub fn parse(value: &str) -> Result<Self, ToolError> {
        match value.to_ascii_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(ToolError::UnsupportedBrowserKind(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }
}

/// Startup options accepted by `start_browser`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BrowserOptions {
    #[schemars(description = "Run the browser in headless mode")]
    pub headless: Option<bool>,
    #[schemars(description = "Additional browser command-line arguments")]
    pub arguments: Option<Vec<String>>,
    #[schemars(description = "Browser window size")]
    pub window_size: Option<WindowSize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Build the W3C capabilities document for a new session.
pub fn build_capabilities(kind: BrowserKind, options: &BrowserOptions) -> Map<String, Value> {
    let headless = options.headless.unwrap_or(false);
    let mut args: Vec<String> = Vec::new();

    match kind {
        BrowserKind::Chrome => {
            if headless {
                args.push("--headless=new".into());
            }
            if let Some(size) = options.window_size {
                args.push(format!("--window-size={},{}", size.width, size.height));
            }
        }
        BrowserKind::Firefox => {
            if headless {
                args.push("-headless".into());
            }
            if let Some(size) = options.window_size {
                args.push(format!("--width={}", size.width));
                args.push(format!("--height={}", size.height));
            }
        }
    }
    if let Some(extra) = &options.arguments {
        args.extend(extra.iter().cloned());
    }

    let caps = match kind {
        BrowserKind::Chrome => json!({
            "browserName": "chrome",
            "goog:chromeOptions": { "args": args },
        }),
        BrowserKind::Firefox => json!({
            "browserName": "firefox",
            "moz:firefoxOptions": { "args": args },
        }),
    };

    caps.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(BrowserKind::parse("Chrome").unwrap(), BrowserKind::Chrome);
        assert_eq!(BrowserKind::parse("FIREFOX").unwrap(), BrowserKind::Firefox);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = BrowserKind::parse("safari").unwrap_err();
        assert_eq!(err.kind(), "UnsupportedBrowserKind");
    }

    #[test]
    fn test_chrome_headless_args() {
        let options = BrowserOptions {
            headless: Some(true),
            arguments: Some(vec!["--no-sandbox".into()]),
            window_size: Some(WindowSize { width: 1280, height: 720 }),
        };
        let caps = build_capabilities(BrowserKind::Chrome, &options);
        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=1280,720")));
        assert!(args.contains(&json!("--no-sandbox")));
    }

    #[test]
    fn test_firefox_defaults_have_no_args() {
        let caps = build_capabilities(BrowserKind::Firefox, &BrowserOptions::default());
        assert_eq!(caps["browserName"], "firefox");
        assert!(caps["moz:firefoxOptions"]["args"].as_array().unwrap().is_empty());
    }
}
