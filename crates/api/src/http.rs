//! HTTP implementation of the backend trait.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::error::{Error, Result};
use url::Url;

use crate::models::{
    AskResponse, ImportResponse, MessageRequest, MessageResponse, RootToggleRequest,
    RootToggleResponse, SyncRequest, SyncResponse,
};
use crate::GenesisApi;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

const IMPORT_PART_NAME: &str = "file";
const IMPORT_FILE_NAME: &str = "importedfile";
const IMPORT_MIME: &str = "application/octet-stream";

pub struct HttpApi {
    http: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Network(format!("invalid base URL '{}': {}", base_url, e)))?;
        Ok(Self {
            http: SHARED_HTTP.clone(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Network(format!("invalid endpoint '{}': {}", path, e)))
    }

    async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        read_json(response, path).await
    }
}

/// Check the status, then parse the body. A 2xx with no bytes at all is the
/// `EmptyResponse` case; a non-2xx carries up to 800 chars of body detail.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    let status = response.status();
    tracing::debug!(%status, what, "response");
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail: String = body.chars().take(800).collect();
        if detail.trim().is_empty() {
            return Err(Error::Network(format!("{}: {}", what, status)));
        }
        return Err(Error::Network(format!("{}: {}\n{}", what, status, detail)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    if bytes.is_empty() {
        return Err(Error::EmptyResponse);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Network(format!("{}: invalid response body: {}", what, e)))
}

#[async_trait]
impl GenesisApi for HttpApi {
    async fn send_message(&self, request: MessageRequest) -> Result<MessageResponse> {
        self.post_json("sendMessage", &request).await
    }

    async fn import_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<ImportResponse> {
        let url = self.endpoint("importFile")?;
        tracing::debug!(%url, file_name, size = bytes.len(), "POST multipart");

        let file_name = if file_name.is_empty() {
            IMPORT_FILE_NAME.to_string()
        } else {
            file_name.to_string()
        };
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(IMPORT_MIME)
            .map_err(|e| Error::Network(e.to_string()))?;
        let form = multipart::Form::new().part(IMPORT_PART_NAME, part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        read_json(response, "importFile").await
    }

    async fn toggle_root(&self, request: RootToggleRequest) -> Result<RootToggleResponse> {
        self.post_json("toggleRoot", &request).await
    }

    async fn get_ai_questions(&self) -> Result<AskResponse> {
        let url = self.endpoint("getAiQuestions")?;
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        read_json(response, "getAiQuestions").await
    }

    async fn sync_tasks(&self, request: SyncRequest) -> Result<SyncResponse> {
        self.post_json("syncTasks", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_the_base() {
        let api = HttpApi::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(
            api.endpoint("sendMessage").unwrap().as_str(),
            "http://127.0.0.1:8000/sendMessage"
        );
    }

    #[test]
    fn a_garbage_base_url_is_a_network_error() {
        let err = match HttpApi::new("not a url") {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(matches!(err, Error::Network(_)));
    }
}
