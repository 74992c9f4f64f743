//! Core types and state for the Genesis app.
//!
//! `AppState` owns everything the screens draw from: chat history, the file
//! browser, background channels, and the injected activity tracker shared
//! with the notifier.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use api::handle::{ApiHandle, ApiMode};
use api::models::{
    AskResponse, ImportResponse, MessageRequest, MessageResponse, RootToggleResponse, SyncRequest,
    SyncResponse, Task,
};
use chrono::{DateTime, Utc};
use services::listing::{self, FileEntry};
use services::loader::{DirectoryLoader, ScanResult};
use services::notifier::{NotifierHandle, ProactiveNotifier};
use services::permissions::{AccessKind, GateDecision, GateState, Permission, PermissionGate};
use services::prefs::PreferenceStore;
use shared::activity::ActivityTracker;
use shared::error::Result;
use shared::events::ProactiveReceiver;
use shared::settings::AppSettings;

use crate::state;
use crate::utils::{self, FsProbe};

/// Result of a background `sendMessage` call.
#[derive(Debug)]
pub struct SendOutcome {
    pub user_text: String,
    pub result: Result<MessageResponse>,
}

#[derive(Debug)]
pub struct ImportOutcome {
    pub file_name: String,
    pub result: Result<ImportResponse>,
}

#[derive(Debug)]
pub struct ToggleOutcome {
    pub enabled: bool,
    pub result: Result<RootToggleResponse>,
}

#[derive(Debug)]
pub struct QuestionsOutcome {
    pub result: Result<AskResponse>,
}

#[derive(Debug)]
pub struct SyncOutcome {
    pub result: Result<SyncResponse>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Files,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Genesis,
}

/// A chat log line. Client-owned; not persisted beyond the session.
#[derive(Clone, Debug)]
pub struct ChatEntry {
    pub author: Author,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn genesis(text: impl Into<String>) -> Self {
        Self {
            author: Author::Genesis,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// What an export writes once its destination is known.
#[derive(Clone, Debug)]
pub enum ExportPayload {
    Text(String),
    File(PathBuf),
}

#[derive(Clone, Debug)]
pub struct ExportJob {
    pub dest: PathBuf,
    pub payload: ExportPayload,
}

/// File browser state: one gated listing with one scan in flight at most.
pub struct FileBrowser {
    pub current_dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected: Option<PathBuf>,
    pub loading: bool,
    pub loader: DirectoryLoader,
    pub scan_rx: Option<Receiver<ScanResult>>,
    pub load_gate: PermissionGate<PathBuf>,
    pub export_gate: PermissionGate<ExportJob>,
    /// Chat content waiting for an export destination.
    pub pending_chat_export: Option<String>,
    /// Missing permissions currently shown in the request dialog.
    pub permission_request: Option<Vec<Permission>>,
    pub denied: bool,
    pub notice: Option<String>,
}

impl FileBrowser {
    pub fn new(start: PathBuf, storage_api: u32) -> Self {
        Self {
            current_dir: start,
            entries: Vec::new(),
            selected: None,
            loading: false,
            loader: DirectoryLoader::new(),
            scan_rx: None,
            load_gate: PermissionGate::new(storage_api, AccessKind::Browse),
            export_gate: PermissionGate::new(storage_api, AccessKind::Export),
            pending_chat_export: None,
            permission_request: None,
            denied: false,
            notice: None,
        }
    }

    /// Gated entry point for loading a directory.
    pub fn request_load(&mut self, dir: PathBuf) {
        let probe = FsProbe::new(dir.clone());
        match self.load_gate.begin(dir, &probe) {
            GateDecision::Proceed(dir) => self.start_scan(dir),
            GateDecision::Request(missing) => self.permission_request = Some(missing),
        }
    }

    fn start_scan(&mut self, dir: PathBuf) {
        self.loading = true;
        self.selected = None;
        self.current_dir = dir.clone();
        let (tx, rx) = channel();
        self.scan_rx = Some(rx);
        self.loader.load(dir, tx);
    }

    pub fn reload(&mut self) {
        self.start_scan(self.current_dir.clone());
    }

    pub fn poll_scan(&mut self) {
        let Some(rx) = self.scan_rx.take() else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                if result.dir != self.current_dir {
                    tracing::debug!(dir = %result.dir.display(), "dropping stale scan result");
                    return;
                }
                self.loading = false;
                match result.outcome {
                    Ok(fresh) => {
                        let edits = listing::diff(&self.entries, &fresh);
                        if !edits.is_empty() {
                            self.entries = listing::apply(&self.entries, &edits);
                        }
                        if let Some(selected) = &self.selected {
                            if !self.entries.iter().any(|e| &e.path == selected) {
                                self.selected = None;
                            }
                        }
                    }
                    Err(e) => self.notice = Some(utils::notice_for_error(&e)),
                }
            }
            Err(TryRecvError::Empty) => self.scan_rx = Some(rx),
            Err(TryRecvError::Disconnected) => self.loading = false,
        }
    }

    /// Pick a destination, then run the export through its gate.
    pub fn begin_export(&mut self, payload: ExportPayload) {
        let suggested = match &payload {
            ExportPayload::Text(_) => "genesis-chat.txt".to_string(),
            ExportPayload::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "export".to_string()),
        };
        let Some(dest) = rfd::FileDialog::new()
            .set_title("Export file")
            .set_directory(&self.current_dir)
            .set_file_name(&suggested)
            .save_file()
        else {
            return;
        };

        let probe_target = dest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.current_dir.clone());
        let job = ExportJob { dest, payload };
        match self.export_gate.begin(job, &FsProbe::new(probe_target)) {
            GateDecision::Proceed(job) => self.run_export(job),
            GateDecision::Request(missing) => self.permission_request = Some(missing),
        }
    }

    fn run_export(&mut self, job: ExportJob) {
        let result = match &job.payload {
            ExportPayload::Text(content) => std::fs::write(&job.dest, content),
            ExportPayload::File(source) => std::fs::copy(source, &job.dest).map(|_| ()),
        };
        match result {
            Ok(()) => {
                self.notice = Some("File exported successfully".to_string());
                self.reload();
            }
            Err(e) => self.notice = Some(format!("Error writing file: {}", e)),
        }
    }

    /// Copy a picked file into the current directory and refresh.
    pub fn import_into_current(&mut self) {
        let Some(source) = rfd::FileDialog::new().set_title("Import file").pick_file() else {
            return;
        };
        let Some(name) = source.file_name() else {
            return;
        };
        let dest = self.current_dir.join(name);
        match std::fs::copy(&source, &dest) {
            Ok(_) => {
                self.notice = Some("File imported successfully".to_string());
                self.reload();
            }
            Err(e) => self.notice = Some(format!("Error reading file: {}", e)),
        }
    }

    /// The user declined the permission prompt.
    pub fn decline_permissions(&mut self) {
        self.permission_request = None;
        if self.load_gate.state() == GateState::Requested {
            let _ = self.load_gate.on_request_result(false);
        }
        if self.export_gate.state() == GateState::Requested {
            let _ = self.export_gate.on_request_result(false);
        }
        self.denied = true;
    }

    /// Re-probe parked grants (after a settings round trip or a "try again")
    /// and resume the originally intended action if one now passes.
    pub fn resume_pending(&mut self) {
        let load_target = self.load_gate.pending().cloned();
        if let Some(dir) =
            load_target.and_then(|target| self.load_gate.on_resume(&FsProbe::new(target)))
        {
            self.permission_request = None;
            self.denied = false;
            self.start_scan(dir);
            return;
        }

        let export_target = self.export_gate.pending().map(|job| {
            job.dest
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.current_dir.clone())
        });
        if let Some(job) =
            export_target.and_then(|target| self.export_gate.on_resume(&FsProbe::new(target)))
        {
            self.permission_request = None;
            self.denied = false;
            self.run_export(job);
        }
    }
}

/// Everything the screens draw from.
pub struct AppState {
    pub settings: AppSettings,
    pub prefs: PreferenceStore,
    pub api: Arc<ApiHandle>,
    pub activity: Arc<ActivityTracker>,
    pub screen: Screen,

    // Chat
    pub chat_entries: Vec<ChatEntry>,
    pub input_text: String,
    pub sending: bool,
    pub root_enabled: bool,
    pub ai_questions: Vec<String>,
    pub status_notice: Option<String>,
    pub tasks: Vec<Task>,
    pub last_sync_time: i64,
    pub syncing: bool,

    // Background channels, polled each frame
    pub send_rx: Option<Receiver<SendOutcome>>,
    pub import_rx: Option<Receiver<ImportOutcome>>,
    pub toggle_rx: Option<Receiver<ToggleOutcome>>,
    pub questions_rx: Option<Receiver<QuestionsOutcome>>,
    pub sync_rx: Option<Receiver<SyncOutcome>>,
    pub proactive_rx: ProactiveReceiver,
    pub notifier: Option<NotifierHandle>,

    pub browser: FileBrowser,

    // Settings screen
    pub api_key_input: String,
    pub base_url_input: String,
    pub settings_notice: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        let prefs = PreferenceStore::open_default().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config directory unavailable, using temp prefs");
            PreferenceStore::at(&std::env::temp_dir().join("genesis"))
        });
        let settings = prefs.load_settings();
        let mode = if settings.mock_mode {
            ApiMode::Mock
        } else {
            ApiMode::Http
        };
        let api = Arc::new(ApiHandle::new(mode, &settings.base_url));
        let activity = Arc::new(ActivityTracker::new());

        let (proactive_tx, proactive_rx) = channel();
        let notifier = ProactiveNotifier::new(activity.clone(), proactive_tx).spawn();
        let status_notice = if notifier.is_none() {
            Some("Background service could not start".to_string())
        } else {
            None
        };

        let start_dir = settings
            .browse_root
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let browser = FileBrowser::new(start_dir, settings.storage_api);
        let base_url_input = api.base_url();

        Self {
            settings,
            prefs,
            api,
            activity,
            screen: Screen::Chat,
            chat_entries: Vec::new(),
            input_text: String::new(),
            sending: false,
            root_enabled: false,
            ai_questions: Vec::new(),
            status_notice,
            tasks: Vec::new(),
            last_sync_time: 0,
            syncing: false,
            send_rx: None,
            import_rx: None,
            toggle_rx: None,
            questions_rx: None,
            sync_rx: None,
            proactive_rx,
            notifier,
            browser,
            api_key_input: String::new(),
            base_url_input,
            settings_notice: None,
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        let from = self.screen;
        self.screen = screen;
        match screen {
            Screen::Files => {
                if from == Screen::Settings {
                    // Returning from settings re-evaluates parked grants
                    // before resuming the intended action.
                    self.browser.resume_pending();
                } else if self.browser.entries.is_empty() && !self.browser.loading {
                    let dir = self.browser.current_dir.clone();
                    self.browser.request_load(dir);
                }
            }
            Screen::Settings => {
                self.api_key_input = self.prefs.api_key().unwrap_or_default();
                self.base_url_input = self.api.base_url();
            }
            Screen::Chat => {}
        }
    }

    /// Drain background channels. Called once per frame, on the UI thread.
    pub fn poll_background(&mut self) {
        if let Some(rx) = self.send_rx.take() {
            match rx.try_recv() {
                Ok(outcome) => self.on_send_outcome(outcome),
                Err(TryRecvError::Empty) => self.send_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.sending = false,
            }
        }
        if let Some(rx) = self.import_rx.take() {
            match rx.try_recv() {
                Ok(outcome) => self.on_import_outcome(outcome),
                Err(TryRecvError::Empty) => self.import_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }
        if let Some(rx) = self.toggle_rx.take() {
            match rx.try_recv() {
                Ok(outcome) => self.on_toggle_outcome(outcome),
                Err(TryRecvError::Empty) => self.toggle_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }
        if let Some(rx) = self.questions_rx.take() {
            match rx.try_recv() {
                Ok(outcome) => self.on_questions_outcome(outcome),
                Err(TryRecvError::Empty) => self.questions_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }
        if let Some(rx) = self.sync_rx.take() {
            match rx.try_recv() {
                Ok(outcome) => self.on_sync_outcome(outcome),
                Err(TryRecvError::Empty) => self.sync_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.syncing = false,
            }
        }

        while let Ok(message) = self.proactive_rx.try_recv() {
            self.chat_entries.push(ChatEntry::genesis(message.text));
        }

        self.browser.poll_scan();
    }

    pub fn has_pending_work(&self) -> bool {
        self.sending
            || self.syncing
            || self.browser.loading
            || self.send_rx.is_some()
            || self.import_rx.is_some()
            || self.toggle_rx.is_some()
            || self.questions_rx.is_some()
            || self.sync_rx.is_some()
            || self.browser.scan_rx.is_some()
    }

    pub fn send_current_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() || self.sending {
            return;
        }
        self.activity.touch();
        let user_id = match self.prefs.user_id() {
            Ok(id) => id,
            Err(e) => {
                self.status_notice = Some(format!("Could not create a user id: {}", e));
                return;
            }
        };
        tracing::debug!(%user_id, "sending message");
        let request = MessageRequest::new(text.clone(), user_id);
        let (tx, rx) = channel();
        self.send_rx = Some(rx);
        self.sending = true;
        state::run_send_message(self.api.clone(), request, text, tx);
    }

    fn on_send_outcome(&mut self, outcome: SendOutcome) {
        self.sending = false;
        match outcome.result {
            Ok(response) => {
                tracing::debug!(id = %response.id, "message delivered");
                self.chat_entries.push(ChatEntry::user(outcome.user_text));
                self.chat_entries.push(ChatEntry::genesis(response.message));
                self.input_text.clear();
            }
            Err(e) => self.status_notice = Some(utils::notice_for_error(&e)),
        }
    }

    /// Pick a local file and upload its bytes to the backend.
    pub fn import_file_to_backend(&mut self) {
        let Some(path) = rfd::FileDialog::new().set_title("Import file").pick_file() else {
            return;
        };
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.status_notice = Some(format!("Error reading file: {}", e));
                return;
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "importedfile".to_string());
        let (tx, rx) = channel();
        self.import_rx = Some(rx);
        state::run_import_file(self.api.clone(), file_name, bytes, tx);
    }

    fn on_import_outcome(&mut self, outcome: ImportOutcome) {
        match outcome.result {
            Ok(response) => {
                self.status_notice = Some(format!("Import: {}", response.status));
            }
            Err(e) => {
                tracing::warn!(file = %outcome.file_name, error = %e, "import failed");
                self.status_notice = Some("Import failed".to_string());
            }
        }
    }

    pub fn set_root_enabled(&mut self, enabled: bool) {
        self.root_enabled = enabled;
        let (tx, rx) = channel();
        self.toggle_rx = Some(rx);
        state::run_toggle_root(self.api.clone(), enabled, tx);
    }

    fn on_toggle_outcome(&mut self, outcome: ToggleOutcome) {
        match outcome.result {
            Ok(response) => self.root_enabled = response.enabled,
            Err(e) => {
                // Revert the optimistic flip.
                self.root_enabled = !outcome.enabled;
                self.status_notice = Some(utils::notice_for_error(&e));
            }
        }
    }

    pub fn fetch_ai_questions(&mut self) {
        let (tx, rx) = channel();
        self.questions_rx = Some(rx);
        state::run_get_questions(self.api.clone(), tx);
    }

    fn on_questions_outcome(&mut self, outcome: QuestionsOutcome) {
        match outcome.result {
            Ok(response) => self.ai_questions = response.questions,
            Err(e) => self.status_notice = Some(utils::notice_for_error(&e)),
        }
    }

    pub fn sync_tasks(&mut self) {
        if self.syncing {
            return;
        }
        let user_id = match self.prefs.user_id() {
            Ok(id) => id,
            Err(e) => {
                self.status_notice = Some(format!("Could not create a user id: {}", e));
                return;
            }
        };
        let request = SyncRequest {
            user_id,
            last_sync_time: self.last_sync_time,
            tasks: self.tasks.clone(),
        };
        let (tx, rx) = channel();
        self.sync_rx = Some(rx);
        self.syncing = true;
        state::run_sync_tasks(self.api.clone(), request, tx);
    }

    fn on_sync_outcome(&mut self, outcome: SyncOutcome) {
        self.syncing = false;
        match outcome.result {
            Ok(response) => {
                self.tasks = response.synced_tasks;
                self.last_sync_time = response.server_time;
                let message = if response.message.is_empty() {
                    "Tasks synchronized".to_string()
                } else {
                    response.message
                };
                self.status_notice = Some(message);
            }
            Err(e) => self.status_notice = Some(utils::notice_for_error(&e)),
        }
    }

    /// Route the transcript through the file browser for export.
    pub fn export_chat(&mut self) {
        self.browser.pending_chat_export = Some(utils::export_content(&self.chat_entries));
        self.set_screen(Screen::Files);
    }

    /// Load the selected file's content into the chat input.
    pub fn use_selected_file(&mut self) {
        let Some(path) = self.browser.selected.clone() else {
            return;
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                self.input_text = content;
                self.status_notice = Some("File loaded successfully".to_string());
                self.set_screen(Screen::Chat);
            }
            Err(e) => self.status_notice = Some(format!("Error reading file: {}", e)),
        }
    }

    pub fn apply_base_url(&mut self) {
        let input = self.base_url_input.clone();
        let changed = self.api.set_base_url(&input);
        self.settings.base_url = self.api.base_url();
        self.base_url_input = self.api.base_url();
        if let Err(e) = self.prefs.save_settings(&self.settings) {
            self.settings_notice = Some(format!("Could not save settings: {}", e));
            return;
        }
        self.settings_notice = Some(
            if changed {
                "Backend URL updated"
            } else {
                "Backend URL unchanged"
            }
            .to_string(),
        );
    }

    pub fn set_mock_mode(&mut self, mock: bool) {
        self.settings.mock_mode = mock;
        self.api.set_mode(if mock { ApiMode::Mock } else { ApiMode::Http });
        if let Err(e) = self.prefs.save_settings(&self.settings) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }
}
