// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// events from background request tasks. Owns the transcript and the state of
// the current question, and pushes UI updates to the TUI render loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ask_with_retry, AskBackend, AskError, RetryPolicy};
use crate::chat::{validate_question, Transcript};
use crate::classify::{classify, follow_up_notice, QueryKind};
use crate::config::Config;
use crate::protocol::{
    AskEvent, Notification, RequestStatus, ServiceStatus, UiUpdate, UserCommand,
};

/// Toast shown when a request ends without an answer.
pub const FAILED_TOAST: &str = "Failed to get response";

pub const CLEARED_TOAST: &str = "Chat cleared!";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub transcript: Transcript,
    /// Service that answers questions. Wrapped in Arc for sharing with
    /// spawned request tasks.
    pub backend: Arc<dyn AskBackend>,
    pub retry_policy: RetryPolicy,
    /// Retries made by the current request. Reset on success, on clear, and
    /// when a new question starts.
    pub retry_count: u32,
    pub request_status: RequestStatus,
    /// Question of the in-flight request, kept for classification once the
    /// answer arrives.
    pub pending_question: Option<String>,
    /// The in-flight request task. Its retry delay runs inside the task, so
    /// aborting it also cancels a pending retry.
    pub current_request: Option<JoinHandle<()>>,
    /// Identifies the current request task. Incremented whenever a request
    /// starts or is cancelled; events from older generations are discarded.
    pub request_generation: u64,
    pub health_task: Option<JoinHandle<()>>,
    pub visualization: Option<QueryKind>,
    pub last_error: Option<String>,
    pub service_status: ServiceStatus,
    /// Sender handed to spawned tasks so they can report back.
    pub ask_tx: mpsc::Sender<AskEvent>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn AskBackend>, ask_tx: mpsc::Sender<AskEvent>) -> Self {
        let retry_policy = RetryPolicy::from_config(&config.retry);
        AppState {
            config,
            transcript: Transcript::new(),
            backend,
            retry_policy,
            retry_count: 0,
            request_status: RequestStatus::Idle,
            pending_question: None,
            current_request: None,
            request_generation: 0,
            health_task: None,
            visualization: None,
            last_error: None,
            service_status: ServiceStatus::Unknown,
            ask_tx,
        }
    }

    /// Cancel the in-flight request, if any, together with its retry timer.
    pub fn cancel_request(&mut self) {
        if let Some(handle) = self.current_request.take() {
            handle.abort();
            info!(generation = self.request_generation, "cancelled in-flight request");
        }
        // Anything the old task already queued is now stale.
        self.request_generation += 1;
        self.pending_question = None;
    }

    /// Start a request for an already-validated question, superseding any
    /// request still in flight.
    pub fn start_request(&mut self, question: String) {
        self.cancel_request();

        let generation = self.request_generation;
        let backend = Arc::clone(&self.backend);
        let policy = self.retry_policy;
        let tx = self.ask_tx.clone();
        let task_question = question.clone();

        let handle = tokio::spawn(async move {
            ask_with_retry(backend.as_ref(), &task_question, policy, &tx, generation).await;
        });

        self.current_request = Some(handle);
        self.pending_question = Some(question);
        self.retry_count = 0;
        self.request_status = RequestStatus::Pending;
        info!(generation, "question submitted");
    }

    /// Probe the service health endpoint in the background.
    pub fn check_health(&mut self) {
        if let Some(handle) = self.health_task.take() {
            handle.abort();
        }
        let backend = Arc::clone(&self.backend);
        let tx = self.ask_tx.clone();
        self.health_task = Some(tokio::spawn(async move {
            let status = match backend.health().await {
                Ok(report) if report.is_healthy() => ServiceStatus::Healthy,
                Ok(report) => {
                    warn!(status = %report.status, "assistant reports unhealthy");
                    ServiceStatus::Unreachable
                }
                Err(e) => {
                    warn!(error = %e, "health probe failed");
                    ServiceStatus::Unreachable
                }
            };
            let _ = tx.send(AskEvent::Health(status)).await;
        }));
    }

    /// Reset the session: transcript, visualization, error, retry counter.
    pub fn clear(&mut self) {
        self.cancel_request();
        self.transcript.clear();
        self.visualization = None;
        self.last_error = None;
        self.retry_count = 0;
        self.request_status = RequestStatus::Idle;
    }

    /// Abort every background task.
    pub fn shutdown(&mut self) {
        self.cancel_request();
        if let Some(handle) = self.health_task.take() {
            handle.abort();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.request_status != RequestStatus::Idle
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until the user quits or the command
/// channel closes.
pub async fn run(
    mut ask_rx: mpsc::Receiver<AskEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    state.check_health();

    // Replaced with a disabled branch once closed so select! never spins on it.
    let mut ask_open = true;

    loop {
        tokio::select! {
            event = ask_rx.recv(), if ask_open => {
                match event {
                    Some(event) => handle_ask_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("Request channel closed");
                        ask_open = false;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.shutdown();
    Ok(())
}

/// Handle a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Submit(input) => {
            let question = match validate_question(&input) {
                Ok(q) => q,
                Err(err) => {
                    debug!("rejected empty question");
                    surface_error(state, &err, ui_tx).await;
                    return;
                }
            };

            let message = state.transcript.push_user(question.clone()).clone();
            let _ = ui_tx.send(UiUpdate::MessageAppended(Box::new(message))).await;

            state.last_error = None;
            let _ = ui_tx.send(UiUpdate::ErrorCleared).await;

            state.start_request(question);
            let _ = ui_tx.send(UiUpdate::RequestStatus(state.request_status)).await;
        }
        UserCommand::Clear => {
            state.clear();
            info!("Chat cleared");
            let _ = ui_tx.send(UiUpdate::TranscriptCleared).await;
            let _ = ui_tx.send(UiUpdate::Visualization(None)).await;
            let _ = ui_tx.send(UiUpdate::ErrorCleared).await;
            let _ = ui_tx.send(UiUpdate::RequestStatus(RequestStatus::Idle)).await;
            let _ = ui_tx.send(UiUpdate::Notify(Notification::success(CLEARED_TOAST))).await;
        }
        UserCommand::CheckHealth => {
            state.check_health();
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn surface_error(state: &mut AppState, err: &AskError, ui_tx: &mpsc::Sender<UiUpdate>) {
    let message = err.user_message();
    state.last_error = Some(message.clone());
    let _ = ui_tx.send(UiUpdate::Error(message)).await;
}

/// Handle an event from a background task.
pub async fn handle_ask_event(
    state: &mut AppState,
    event: AskEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if let Some(generation) = event.generation() {
        if generation != state.request_generation {
            debug!(
                "Discarding stale request event (event gen: {}, current gen: {})",
                generation, state.request_generation
            );
            return;
        }
    }

    match event {
        AskEvent::Answered {
            answer,
            processing_time,
            ..
        } => {
            let message = state.transcript.push_bot(answer, processing_time).clone();
            let _ = ui_tx.send(UiUpdate::MessageAppended(Box::new(message))).await;

            state.retry_count = 0;
            state.current_request = None;
            state.request_status = RequestStatus::Idle;
            state.last_error = None;
            let _ = ui_tx.send(UiUpdate::RequestStatus(RequestStatus::Idle)).await;
            let _ = ui_tx.send(UiUpdate::ErrorCleared).await;

            if let Some(question) = state.pending_question.take() {
                if let Some(kind) = classify(&question) {
                    state.visualization = Some(kind);
                    let _ = ui_tx.send(UiUpdate::Visualization(Some(kind))).await;
                    let _ = ui_tx
                        .send(UiUpdate::Notify(Notification::success(kind.notification())))
                        .await;
                }
                if let Some(notice) = follow_up_notice(&question) {
                    let _ = ui_tx.send(UiUpdate::Notify(Notification::success(notice))).await;
                }
            }
        }
        AskEvent::Retrying {
            attempt,
            max,
            message,
            ..
        } => {
            state.retry_count = attempt;
            state.request_status = RequestStatus::Retrying { attempt, max };
            state.last_error = Some(message.clone());
            let _ = ui_tx.send(UiUpdate::Error(message)).await;
            let _ = ui_tx.send(UiUpdate::RequestStatus(state.request_status)).await;
        }
        AskEvent::Failed { message, .. } => {
            state.current_request = None;
            state.pending_question = None;
            state.request_status = RequestStatus::Idle;
            state.last_error = Some(message.clone());
            let _ = ui_tx.send(UiUpdate::Error(message)).await;
            let _ = ui_tx.send(UiUpdate::RequestStatus(RequestStatus::Idle)).await;
            let _ = ui_tx.send(UiUpdate::Notify(Notification::error(FAILED_TOAST))).await;
        }
        AskEvent::Health(status) => {
            state.service_status = status;
            let _ = ui_tx.send(UiUpdate::ServiceStatus(status)).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
