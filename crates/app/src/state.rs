//! Background execution of API calls.
//!
//! Each call runs on its own thread with its own runtime and reports back
//! over a channel the UI polls each frame, so view mutation stays on the UI
//! thread. No retries anywhere; one failure per trigger.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use api::handle::ApiHandle;
use api::models::{MessageRequest, RootToggleRequest, SyncRequest};
use api::GenesisApi;
use shared::error::Error;

use crate::types::{ImportOutcome, QuestionsOutcome, SendOutcome, SyncOutcome, ToggleOutcome};

fn runtime() -> Result<tokio::runtime::Runtime, Error> {
    tokio::runtime::Runtime::new().map_err(Error::Io)
}

pub fn run_send_message(
    api: Arc<ApiHandle>,
    request: MessageRequest,
    user_text: String,
    tx: Sender<SendOutcome>,
) {
    std::thread::spawn(move || {
        let result = match runtime() {
            Ok(rt) => rt.block_on(async { api.api()?.send_message(request).await }),
            Err(e) => Err(e),
        };
        let _ = tx.send(SendOutcome { user_text, result });
    });
}

pub fn run_import_file(
    api: Arc<ApiHandle>,
    file_name: String,
    bytes: Vec<u8>,
    tx: Sender<ImportOutcome>,
) {
    std::thread::spawn(move || {
        let name = file_name.clone();
        let result = match runtime() {
            Ok(rt) => rt.block_on(async { api.api()?.import_file(&name, bytes).await }),
            Err(e) => Err(e),
        };
        let _ = tx.send(ImportOutcome { file_name, result });
    });
}

pub fn run_toggle_root(api: Arc<ApiHandle>, enabled: bool, tx: Sender<ToggleOutcome>) {
    std::thread::spawn(move || {
        let request = RootToggleRequest { enabled };
        let result = match runtime() {
            Ok(rt) => rt.block_on(async { api.api()?.toggle_root(request).await }),
            Err(e) => Err(e),
        };
        let _ = tx.send(ToggleOutcome { enabled, result });
    });
}

pub fn run_get_questions(api: Arc<ApiHandle>, tx: Sender<QuestionsOutcome>) {
    std::thread::spawn(move || {
        let result = match runtime() {
            Ok(rt) => rt.block_on(async { api.api()?.get_ai_questions().await }),
            Err(e) => Err(e),
        };
        let _ = tx.send(QuestionsOutcome { result });
    });
}

pub fn run_sync_tasks(api: Arc<ApiHandle>, request: SyncRequest, tx: Sender<SyncOutcome>) {
    std::thread::spawn(move || {
        let result = match runtime() {
            Ok(rt) => rt.block_on(async { api.api()?.sync_tasks(request).await }),
            Err(e) => Err(e),
        };
        let _ = tx.send(SyncOutcome { result });
    });
}
