// Integration tests for the portfolio assistant.
//
// These run the real HTTP client and the app event loop against a local mock
// `/ask` server, and check what reaches the TUI through the UiUpdate channel.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portfolio_assistant::api::AskClient;
use portfolio_assistant::app::{self, AppState, CLEARED_TOAST, FAILED_TOAST};
use portfolio_assistant::classify::QueryKind;
use portfolio_assistant::config::Config;
use portfolio_assistant::protocol::*;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// ===========================================================================
// Mock server
// ===========================================================================

/// Canned `/ask` responses served in order. `/health` always reports healthy
/// and is not counted.
struct MockServer {
    addr: SocketAddr,
    ask_calls: Arc<AtomicUsize>,
    questions: Arc<Mutex<Vec<String>>>,
    _handle: JoinHandle<()>,
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    l.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

async fn start_server(script: Vec<(&'static str, &'static str)>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let ask_calls = Arc::new(AtomicUsize::new(0));
    let questions = Arc::new(Mutex::new(Vec::new()));
    let script = Arc::new(Mutex::new(VecDeque::from(script)));

    let calls = ask_calls.clone();
    let seen = questions.clone();
    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let request = read_request(&mut socket).await;

            let (status, body) = if request.starts_with("GET /health") {
                ("200 OK", r#"{"status":"healthy"}"#)
            } else {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(idx) = request.find("\r\n\r\n") {
                    let json: serde_json::Value =
                        serde_json::from_str(&request[idx + 4..]).unwrap_or_default();
                    if let Some(q) = json.get("question").and_then(|q| q.as_str()) {
                        seen.lock().unwrap().push(q.to_string());
                    }
                }
                script
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or(("500 Internal Server Error", "{}"))
            };

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
        }
    });

    MockServer {
        addr,
        ask_calls,
        questions,
        _handle: handle,
    }
}

/// An address with nothing listening on it.
async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

// ===========================================================================
// App harness
// ===========================================================================

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    app: JoinHandle<anyhow::Result<()>>,
}

fn fast_config(addr: SocketAddr) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("http://{addr}");
    config.api.timeout_ms = 2_000;
    config.retry.delay_ms = 20;
    config
}

fn start_app(config: Config) -> Harness {
    let client = AskClient::from_config(&config).unwrap();
    let (ask_tx, ask_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let state = AppState::new(config, Arc::new(client), ask_tx);
    let app = tokio::spawn(app::run(ask_rx, cmd_rx, ui_tx, state));
    Harness { cmd_tx, ui_rx, app }
}

impl Harness {
    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    /// Collect updates until one matches `done`, including the match.
    async fn collect_until(&mut self, done: impl Fn(&UiUpdate) -> bool) -> Vec<UiUpdate> {
        let mut seen = Vec::new();
        let result = tokio::time::timeout(Duration::from_secs(10), async {
            while let Some(update) = self.ui_rx.recv().await {
                let finished = done(&update);
                seen.push(update);
                if finished {
                    return;
                }
            }
        })
        .await;
        assert!(result.is_ok(), "timed out; updates so far: {:#?}", seen);
        seen
    }

    async fn quit(self) {
        self.cmd_tx.send(UserCommand::Quit).await.unwrap();
        self.app.await.unwrap().unwrap();
    }
}

fn bot_messages(updates: &[UiUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            UiUpdate::MessageAppended(m) if m.sender == portfolio_assistant::chat::Sender::Bot => {
                Some(m.text.clone())
            }
            _ => None,
        })
        .collect()
}

fn errors(updates: &[UiUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            UiUpdate::Error(e) => Some(e.clone()),
            _ => None,
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn whitespace_question_never_reaches_server() {
    let server = start_server(vec![]).await;
    let mut h = start_app(fast_config(server.addr));

    h.send(UserCommand::Submit("   ".into())).await;
    let updates = h
        .collect_until(|u| matches!(u, UiUpdate::Error(_)))
        .await;

    assert_eq!(errors(&updates), vec!["Please enter a question.".to_string()]);
    assert!(!updates
        .iter()
        .any(|u| matches!(u, UiUpdate::MessageAppended(_))));
    assert_eq!(server.ask_calls.load(Ordering::SeqCst), 0);
    h.quit().await;
}

#[tokio::test]
async fn top_n_question_answers_and_confirms_number() {
    let server = start_server(vec![(
        "200 OK",
        r#"{"answer":"1. Amitabh Bachchan ...","processing_time":1.25}"#,
    )])
    .await;
    let mut h = start_app(fast_config(server.addr));

    h.send(UserCommand::Submit("  Show me the top 5 investors ".into()))
        .await;
    let updates = h
        .collect_until(|u| {
            *u == UiUpdate::Notify(Notification::success("Found top 5 results as requested!"))
        })
        .await;

    assert_eq!(
        server.questions.lock().unwrap().clone(),
        vec!["Show me the top 5 investors".to_string()]
    );
    assert_eq!(bot_messages(&updates), vec!["1. Amitabh Bachchan ...".to_string()]);
    let bot = updates.iter().find_map(|u| match u {
        UiUpdate::MessageAppended(m) if m.processing_time.is_some() => Some(m.clone()),
        _ => None,
    });
    assert_eq!(bot.unwrap().processing_time.as_deref(), Some("1.25s"));
    assert!(updates.contains(&UiUpdate::Visualization(Some(QueryKind::TopPortfolios))));
    h.quit().await;
}

#[tokio::test]
async fn payload_error_shows_message_without_bot_reply() {
    let server = start_server(vec![("200 OK", r#"{"error":"Vector store unavailable"}"#)]).await;
    let mut h = start_app(fast_config(server.addr));

    h.send(UserCommand::Submit("Who are the high risk clients?".into()))
        .await;
    let updates = h
        .collect_until(|u| *u == UiUpdate::Notify(Notification::error(FAILED_TOAST)))
        .await;

    assert!(bot_messages(&updates).is_empty());
    assert_eq!(
        errors(&updates),
        vec!["Error: Vector store unavailable".to_string()]
    );
    h.quit().await;
}

#[tokio::test]
async fn service_unavailable_is_not_retried() {
    let server = start_server(vec![(
        "503 Service Unavailable",
        r#"{"detail":"warming up"}"#,
    )])
    .await;
    let mut h = start_app(fast_config(server.addr));

    h.send(UserCommand::Submit("Top 3 transactions by amount".into()))
        .await;
    let updates = h
        .collect_until(|u| *u == UiUpdate::Notify(Notification::error(FAILED_TOAST)))
        .await;

    assert_eq!(
        errors(&updates),
        vec!["Server error (503): Service temporarily unavailable. Please try again.".to_string()]
    );
    assert_eq!(server.ask_calls.load(Ordering::SeqCst), 1);
    h.quit().await;
}

#[tokio::test]
async fn unreachable_server_retries_three_times_then_gives_up() {
    let mut h = start_app(fast_config(dead_address().await));

    h.send(UserCommand::Submit("Highest investment amounts".into()))
        .await;
    let updates = h
        .collect_until(|u| *u == UiUpdate::Notify(Notification::error(FAILED_TOAST)))
        .await;

    let retry_statuses: Vec<_> = updates
        .iter()
        .filter_map(|u| match u {
            UiUpdate::RequestStatus(RequestStatus::Retrying { attempt, max }) => {
                Some((*attempt, *max))
            }
            _ => None,
        })
        .collect();
    assert_eq!(retry_statuses, vec![(1, 3), (2, 3), (3, 3)]);

    let errs = errors(&updates);
    assert_eq!(
        errs,
        vec![
            "Network error (Attempt 1/3): Retrying...".to_string(),
            "Network error (Attempt 2/3): Retrying...".to_string(),
            "Network error (Attempt 3/3): Retrying...".to_string(),
            "Network error: Unable to connect to server. Please check your internet connection and try again.".to_string(),
        ]
    );
    assert!(bot_messages(&updates).is_empty());
    h.quit().await;
}

#[tokio::test]
async fn clear_resets_transcript_and_visualization() {
    let server = start_server(vec![("200 OK", r#"{"answer":"Risk split: 45/35/20"}"#)]).await;
    let mut h = start_app(fast_config(server.addr));

    h.send(UserCommand::Submit("show risk distribution".into()))
        .await;
    let updates = h
        .collect_until(|u| matches!(u, UiUpdate::Visualization(Some(_))))
        .await;
    assert!(updates.contains(&UiUpdate::Visualization(Some(QueryKind::RiskDistribution))));

    h.send(UserCommand::Clear).await;
    let updates = h
        .collect_until(|u| *u == UiUpdate::Notify(Notification::success(CLEARED_TOAST)))
        .await;
    assert!(updates.contains(&UiUpdate::TranscriptCleared));
    assert!(updates.contains(&UiUpdate::Visualization(None)));
    assert!(updates.contains(&UiUpdate::ErrorCleared));

    // Clearing again on an empty session is harmless.
    h.send(UserCommand::Clear).await;
    h.collect_until(|u| *u == UiUpdate::Notify(Notification::success(CLEARED_TOAST)))
        .await;
    h.quit().await;
}

#[tokio::test]
async fn health_probe_runs_at_startup() {
    let server = start_server(vec![]).await;
    let mut h = start_app(fast_config(server.addr));

    let updates = h
        .collect_until(|u| matches!(u, UiUpdate::ServiceStatus(_)))
        .await;
    assert_eq!(
        updates.last(),
        Some(&UiUpdate::ServiceStatus(ServiceStatus::Healthy))
    );
    h.quit().await;
}
