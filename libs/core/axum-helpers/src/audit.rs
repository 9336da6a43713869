//! Audit trail for secret-guarded actions.
//!
//! Events go to the `audit` tracing target so they can be routed apart from
//! application logs.
//!
//! ```ignore
//! use axum_helpers::audit::{AuditEvent, AuditOutcome};
//!
//! AuditEvent::new("event.delete", Some("event:42".to_string()), AuditOutcome::Denied)
//!     .with_ip(extract_ip_from_headers(&headers))
//!     .with_details(json!({"reason": "secret_mismatch"}))
//!     .log();
//! ```

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
    /// Rejected for lack of authority (wrong secret)
    Denied,
}

/// One audited action. Build it, then call [`log`](Self::log).
#[derive(Debug, Serialize)]
pub struct AuditEvent {
    /// Dotted action name, e.g. `event.create`
    pub action: String,
    /// `kind:id`, e.g. `event:42`
    pub resource: Option<String>,
    pub outcome: AuditOutcome,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, resource: Option<String>, outcome: AuditOutcome) -> Self {
        Self {
            action: action.into(),
            resource,
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Attach extra context. Values that fail to serialize are dropped.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Copies client IP and user agent from request headers.
    pub fn with_request_headers(self, headers: &HeaderMap) -> Self {
        self.with_ip(extract_ip_from_headers(headers))
            .with_user_agent(extract_user_agent(headers))
    }

    pub fn log(self) {
        tracing::info!(
            target: "audit",
            action = %self.action,
            resource = self.resource,
            outcome = ?self.outcome,
            ip = self.ip_address,
            user_agent = self.user_agent,
            timestamp = %self.timestamp,
            details = ?self.details,
            "{}",
            serde_json::to_string(&self).unwrap_or_else(|_| "unserializable audit event".to_string())
        );
    }
}

/// Client IP behind a proxy: first `X-Forwarded-For` entry, then `X-Real-IP`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_wins_over_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(extract_ip_from_headers(&headers).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(extract_ip_from_headers(&headers).as_deref(), Some("192.168.1.1"));
        assert!(extract_user_agent(&headers).is_none());
    }

    #[test]
    fn test_event_serializes_outcome_lowercase() {
        let event = AuditEvent::new("event.delete", Some("event:7".to_string()), AuditOutcome::Denied)
            .with_details(serde_json::json!({"reason": "secret_mismatch"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"], "denied");
        assert_eq!(json["resource"], "event:7");
        assert_eq!(json["details"]["reason"], "secret_mismatch");
    }
}
