//! Cached access to the active backend client.
//!
//! The handle owns the mock-vs-real choice and the mutable base URL. Callers
//! grab a client per call via [`ApiHandle::api`]; changing the base URL (or
//! the mode) drops the cached client and the next call rebuilds it.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::error::Result;

use crate::http::HttpApi;
use crate::mock::MockApi;
use crate::GenesisApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    Http,
    Mock,
}

pub struct ApiHandle {
    mode: RwLock<ApiMode>,
    base_url: RwLock<String>,
    client: RwLock<Option<Arc<dyn GenesisApi>>>,
}

/// Trim surrounding whitespace and normalize to exactly one trailing slash.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

impl ApiHandle {
    pub fn new(mode: ApiMode, base_url: &str) -> Self {
        Self {
            mode: RwLock::new(mode),
            base_url: RwLock::new(normalize_base_url(base_url)),
            client: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    pub fn mode(&self) -> ApiMode {
        *self.mode.read()
    }

    /// Update the base URL. Returns whether anything changed: setting the
    /// same value (after normalization) is a no-op and keeps the cached
    /// client alive.
    pub fn set_base_url(&self, new_url: &str) -> bool {
        let normalized = normalize_base_url(new_url);
        {
            let mut base_url = self.base_url.write();
            if *base_url == normalized {
                return false;
            }
            *base_url = normalized;
        }
        *self.client.write() = None;
        true
    }

    /// Switch between the real and the mock backend. A no-op when the mode
    /// is unchanged.
    pub fn set_mode(&self, new_mode: ApiMode) -> bool {
        {
            let mut mode = self.mode.write();
            if *mode == new_mode {
                return false;
            }
            *mode = new_mode;
        }
        *self.client.write() = None;
        true
    }

    /// The active client, built lazily. Double-checked so concurrent callers
    /// after an invalidation agree on one instance.
    pub fn api(&self) -> Result<Arc<dyn GenesisApi>> {
        if let Some(client) = self.client.read().clone() {
            return Ok(client);
        }
        let mut slot = self.client.write();
        if let Some(client) = slot.clone() {
            return Ok(client);
        }
        let built = self.build()?;
        *slot = Some(built.clone());
        Ok(built)
    }

    fn build(&self) -> Result<Arc<dyn GenesisApi>> {
        match *self.mode.read() {
            ApiMode::Mock => Ok(Arc::new(MockApi::new())),
            ApiMode::Http => {
                let base_url = self.base_url.read().clone();
                Ok(Arc::new(HttpApi::new(&base_url)?))
            }
        }
    }
}
