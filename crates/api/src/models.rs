//! Wire models for the Genesis backend.
//!
//! The message endpoints use camelCase field names on the wire; the
//! task-sync endpoints use snake_case. Both mirror the server schema.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn success() -> String {
    "success".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub timestamp: i64,
}

impl MessageRequest {
    pub fn new(message: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            timestamp: now_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub timestamp: i64,
    #[serde(default = "success")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootToggleRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootToggleResponse {
    pub status: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub questions: Vec<String>,
    #[serde(default = "success")]
    pub status: String,
}

/// A plain task record mirrored to and from the remote store. No local merge
/// logic; the mock path simply echoes the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub user_id: String,
    pub last_sync_time: i64,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub synced_tasks: Vec<Task>,
    pub server_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_request_is_camel_case_on_the_wire() {
        let request = MessageRequest::new("hello", "user-1");
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn sync_models_are_snake_case_on_the_wire() {
        let request = SyncRequest {
            user_id: "user-1".to_string(),
            last_sync_time: 0,
            tasks: vec![Task::new("water the plants")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("user_id").is_some());
        assert!(json.get("last_sync_time").is_some());
        assert!(json["tasks"][0].get("is_completed").is_some());
    }

    #[test]
    fn response_status_defaults_to_success() {
        let response: MessageResponse = serde_json::from_str(
            r#"{"id":"1","message":"hi","userId":"user-1","timestamp":0}"#,
        )
        .unwrap();
        assert_eq!(response.status, "success");
    }
}
