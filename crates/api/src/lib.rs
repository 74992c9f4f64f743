//! Client for the Genesis chat backend.
//!
//! One [`GenesisApi`] trait with two implementations: [`http::HttpApi`] talks
//! JSON over HTTP, [`mock::MockApi`] serves canned answers with simulated
//! latency. [`handle::ApiHandle`] selects between them from configuration and
//! caches the active client, rebuilding it when the base URL changes.

pub mod handle;
pub mod http;
pub mod mock;
pub mod models;

use async_trait::async_trait;
use shared::error::Result;

use crate::models::{
    AskResponse, ImportResponse, MessageRequest, MessageResponse, RootToggleRequest,
    RootToggleResponse, SyncRequest, SyncResponse,
};

/// The five request/response operations the backend exposes. Implementations
/// are stateless per call; failures surface once to the caller, no retries.
#[async_trait]
pub trait GenesisApi: Send + Sync {
    async fn send_message(&self, request: MessageRequest) -> Result<MessageResponse>;

    /// Multipart upload of a picked file's bytes.
    async fn import_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<ImportResponse>;

    async fn toggle_root(&self, request: RootToggleRequest) -> Result<RootToggleResponse>;

    async fn get_ai_questions(&self) -> Result<AskResponse>;

    async fn sync_tasks(&self, request: SyncRequest) -> Result<SyncResponse>;
}
