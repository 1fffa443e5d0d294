//! Log entry records
//!
//! [`LogEntry`] is the persisted shape. [`NewLogEntry`] is what callers hand to
//! [`LogAdapter::create`](crate::LogAdapter::create): the storage layer assigns
//! `id` and `created_at` exactly once and never changes them afterwards.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::level::LogLevel;

/// Generate a fresh entry id (random UUID v4)
pub fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time truncated to microseconds
///
/// Every backend stores timestamps at microsecond precision, so entries are
/// stamped with this to read back identical to what `create` returned.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A persisted log entry
///
/// Optional fields always serialize as `null` rather than being omitted, so
/// every backend returns the same wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub level: LogLevel,
    pub message: String,
    pub stack: Option<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// Strip `id` and `created_at`, returning the insert shape
    pub fn to_new(&self) -> NewLogEntry {
        NewLogEntry {
            level: self.level,
            message: self.message.clone(),
            stack: self.stack.clone(),
            user_id: self.user_id.clone(),
            user_email: self.user_email.clone(),
            user_name: self.user_name.clone(),
            path: self.path.clone(),
            method: self.method.clone(),
            user_agent: self.user_agent.clone(),
            ip: self.ip.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Fields supplied when creating an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl NewLogEntry {
    /// Create an entry with only level and message set
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            stack: None,
            user_id: None,
            user_email: None,
            user_name: None,
            path: None,
            method: None,
            user_agent: None,
            ip: None,
            metadata: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_user(
        mut self,
        id: impl Into<String>,
        email: Option<String>,
        name: Option<String>,
    ) -> Self {
        self.user_id = Some(id.into());
        self.user_email = email;
        self.user_name = name;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attach the storage-assigned identity, producing the persisted shape
    pub fn into_entry(self, id: String, created_at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id,
            level: self.level,
            message: self.message,
            stack: self.stack,
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            path: self.path,
            method: self.method,
            user_agent: self.user_agent,
            ip: self.ip,
            metadata: self.metadata,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_entry_id();
        let b = generate_entry_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_timestamp_now_has_micro_precision() {
        let now = timestamp_now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_unset_fields_serialize_as_null() {
        let entry = NewLogEntry::new(LogLevel::Error, "boom")
            .into_entry("abc".to_string(), Utc::now());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["level"], "error");
        assert!(json["stack"].is_null());
        assert!(json["userEmail"].is_null());
        assert!(json["metadata"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_new_entry_accepts_missing_optionals() {
        let new: NewLogEntry =
            serde_json::from_str(r#"{"level":"warn","message":"disk almost full"}"#).unwrap();
        assert_eq!(new.level, LogLevel::Warn);
        assert!(new.user_id.is_none());
    }

    #[test]
    fn test_to_new_drops_identity() {
        let entry = NewLogEntry::new(LogLevel::Info, "hello")
            .with_path("/api")
            .into_entry("id-1".to_string(), Utc::now());
        let new = entry.to_new();
        assert_eq!(new.path.as_deref(), Some("/api"));
        assert_eq!(new.message, "hello");
    }
}
