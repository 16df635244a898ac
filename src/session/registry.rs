use chrono::{DateTime, Utc};
use fantoccini::{Client, ClientBuilder};
use serde::Serialize;
use std::collections::HashMap;

use super::capabilities::{build_capabilities, BrowserKind, BrowserOptions};
use crate::error::{ToolError, ToolResult};

/// One live WebDriver session plus its bookkeeping metadata.
pub struct Session {
    pub id: String,
    pub name: Option<String>,
    pub kind: BrowserKind,
    pub driver: Client,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Serializable view of a session, excluding the live driver handle.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub name: Option<String>,
    pub browser: &'static str,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub is_current: bool,
}

/// Owns every browser session. At most one session is marked active; tool
/// calls that omit an explicit session id are routed to it.
pub struct SessionRegistry {
    webdriver_url: String,
    sessions: HashMap<String, Session>,
    active: Option<String>,
}

impl SessionRegistry {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            sessions: HashMap::new(),
            active: None,
        }
    }

    /// Start a driver for the requested browser kind and register it. The
    /// new session becomes active. On any failure the registry is unchanged.
    pub async fn create(
        &mut self,
        browser: &str,
        options: &BrowserOptions,
        name: Option<String>,
    ) -> ToolResult<String> {
        let kind = BrowserKind::parse(browser)?;
        let caps = build_capabilities(kind, options);

        let mut builder = ClientBuilder::rustls()
            .map_err(|e| ToolError::DriverStartFailure(e.to_string()))?;
        builder.capabilities(caps);

        let url = self.webdriver_url.trim_end_matches('/');
        let driver = builder
            .connect(url)
            .await
            .map_err(ToolError::from_new_session)?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        tracing::info!("Started {} session {} (name: {:?})", kind.as_str(), id, name);

        self.sessions.insert(
            id.clone(),
            Session {
                id: id.clone(),
                name,
                kind,
                driver,
                url: None,
                created_at: now,
                last_activity: now,
            },
        );
        self.active = Some(id.clone());
        Ok(id)
    }

    pub fn list(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<SessionInfo> = self
            .sessions
            .values()
            .map(|s| SessionInfo {
                session_id: s.id.clone(),
                name: s.name.clone(),
                browser: s.kind.as_str(),
                url: s.url.clone(),
                created_at: s.created_at,
                last_activity: s.last_activity,
                is_current: self.active.as_deref() == Some(s.id.as_str()),
            })
            .collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        infos
    }

    pub fn switch_active(&mut self, id: &str) -> ToolResult<()> {
        if !self.sessions.contains_key(id) {
            return Err(ToolError::SessionNotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Close the named session, or the active one when `id` is omitted.
    /// Driver teardown is best-effort; failures are logged, not propagated.
    /// Closing the active session clears the active marker — no other
    /// session is promoted.
    pub async fn close(&mut self, id: Option<&str>) -> ToolResult<String> {
        let target = match id {
            Some(id) => {
                if !self.sessions.contains_key(id) {
                    return Err(ToolError::SessionNotFound(id.to_string()));
                }
                id.to_string()
            }
            None => self.active.clone().ok_or(ToolError::NoActiveSession)?,
        };

        // contains_key checked above; the active id always refers to a live entry
        let session = self
            .sessions
            .remove(&target)
            .ok_or_else(|| ToolError::SessionNotFound(target.clone()))?;
        if self.active.as_deref() == Some(target.as_str()) {
            self.active = None;
        }

        if let Err(e) = session.driver.close().await {
            tracing::warn!("Error closing session {}: {}", target, e);
        }
        tracing::info!("Closed session {}", target);
        Ok(target)
    }

    /// Shutdown sweep: tear down every open session, best-effort.
    pub async fn close_all(&mut self) {
        self.active = None;
        for (id, session) in self.sessions.drain() {
            if let Err(e) = session.driver.close().await {
                tracing::warn!("Error closing session {} during shutdown: {}", id, e);
            }
        }
    }

    /// Resolve the target session: explicit id if given, else the active one.
    pub fn resolve(&self, explicit: Option<&str>) -> ToolResult<&Session> {
        match explicit {
            Some(id) => self
                .sessions
                .get(id)
                .ok_or_else(|| ToolError::SessionNotFound(id.to_string())),
            None => {
                let active = self.active.as_deref().ok_or(ToolError::NoActiveSession)?;
                self.sessions
                    .get(active)
                    .ok_or(ToolError::NoActiveSession)
            }
        }
    }

    /// Refresh a session's activity timestamp, optionally recording the URL
    /// it navigated to.
    pub fn touch(&mut self, id: &str, url: Option<String>) {
        if let Some(session) = self.sessions.get_mut(id) {
            session.last_activity = Utc::now();
            if url.is_some() {
                session.url = url;
            }
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
