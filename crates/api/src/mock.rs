//! Offline implementation serving canned answers with simulated latency.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use shared::error::Result;
use uuid::Uuid;

use crate::models::{
    AskResponse, ImportResponse, MessageRequest, MessageResponse, RootToggleRequest,
    RootToggleResponse, SyncRequest, SyncResponse,
};
use crate::GenesisApi;

const OFFLINE_LINES: [&str; 4] = [
    "I'm currently running in offline mode. The server appears to be down.",
    "This is a mock response. Please check your internet connection.",
    "The Genesis AI service is currently unavailable. Using local responses.",
    "I can still help you with basic tasks while offline.",
];

const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

pub struct MockApi {
    latency: Duration,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenesisApi for MockApi {
    async fn send_message(&self, request: MessageRequest) -> Result<MessageResponse> {
        self.simulate_delay().await;
        let line = OFFLINE_LINES[rand::thread_rng().gen_range(0..OFFLINE_LINES.len())];
        Ok(MessageResponse {
            id: Uuid::new_v4().to_string(),
            message: line.to_string(),
            user_id: request.user_id,
            timestamp: Utc::now().timestamp_millis(),
            status: "success".to_string(),
        })
    }

    async fn import_file(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<ImportResponse> {
        self.simulate_delay().await;
        Ok(ImportResponse {
            status: "success".to_string(),
            message: None,
        })
    }

    async fn toggle_root(&self, request: RootToggleRequest) -> Result<RootToggleResponse> {
        self.simulate_delay().await;
        Ok(RootToggleResponse {
            status: "success".to_string(),
            enabled: request.enabled,
        })
    }

    async fn get_ai_questions(&self) -> Result<AskResponse> {
        self.simulate_delay().await;
        Ok(AskResponse {
            questions: vec![
                "Question 1 (Mock)".to_string(),
                "Question 2 (Mock)".to_string(),
                "Question 3 (Mock)".to_string(),
            ],
            status: "success".to_string(),
        })
    }

    async fn sync_tasks(&self, request: SyncRequest) -> Result<SyncResponse> {
        self.simulate_delay().await;
        Ok(SyncResponse {
            status: "success".to_string(),
            message: "Tasks synchronized successfully (mock)".to_string(),
            synced_tasks: request.tasks,
            server_time: Utc::now().timestamp_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn mock() -> MockApi {
        MockApi::with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn send_message_echoes_the_user_id() {
        let response = mock()
            .send_message(MessageRequest::new("hello", "user-7"))
            .await
            .unwrap();
        assert_eq!(response.user_id, "user-7");
        assert!(OFFLINE_LINES.contains(&response.message.as_str()));
    }

    #[tokio::test]
    async fn sync_echoes_the_request_tasks() {
        let tasks = vec![Task::new("buy milk"), Task::new("call back")];
        let response = mock()
            .sync_tasks(SyncRequest {
                user_id: "user-7".to_string(),
                last_sync_time: 0,
                tasks: tasks.clone(),
            })
            .await
            .unwrap();
        assert_eq!(response.synced_tasks, tasks);
        assert_eq!(response.status, "success");
    }

    #[tokio::test]
    async fn toggle_echoes_the_requested_state() {
        let response = mock()
            .toggle_root(RootToggleRequest { enabled: true })
            .await
            .unwrap();
        assert!(response.enabled);
    }
}
