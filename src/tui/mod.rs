// Terminal chat interface: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the parts of the application state
// it draws. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::info;

use crate::chat::ChatMessage;
use crate::classify::QueryKind;
use crate::protocol::{Notification, RequestStatus, ServiceStatus, UiUpdate, UserCommand};
use crate::viz::VizMode;

use layout::{build_layout, AppLayout};

/// Example questions offered on the welcome screen and cycled with Tab.
pub const SUGGESTIONS: [&str; 6] = [
    "Show me the top 5 investors",
    "Who are the high risk clients?",
    "Top 3 transactions by amount",
    "Clients who invest in stocks",
    "Highest investment amounts",
    "Show me the names of all clients",
];

const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A notification with its expiry time.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    pub messages: Vec<ChatMessage>,
    /// Text being typed in the input box.
    pub input: String,
    pub request_status: RequestStatus,
    pub service_status: ServiceStatus,
    /// Contents of the error/notice line.
    pub error: Option<String>,
    /// Active toasts, oldest first.
    pub toasts: Vec<Toast>,
    pub toast_ttl: Duration,
    /// Kind of the sample chart on display; `None` hides the panel.
    pub visualization: Option<QueryKind>,
    pub viz_mode: VizMode,
    /// Lines scrolled up from the bottom of the transcript. Zero follows new
    /// messages.
    pub scroll_offset: usize,
    /// Position in `SUGGESTIONS` last copied into the input by Tab.
    pub suggestion_index: Option<usize>,
    /// Whether the quit confirmation dialog is shown.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::with_toast_ttl(DEFAULT_TOAST_TTL)
    }
}

impl ViewState {
    pub fn with_toast_ttl(toast_ttl: Duration) -> Self {
        ViewState {
            messages: Vec::new(),
            input: String::new(),
            request_status: RequestStatus::Idle,
            service_status: ServiceStatus::Unknown,
            error: None,
            toasts: Vec::new(),
            toast_ttl,
            visualization: None,
            viz_mode: VizMode::Chart,
            scroll_offset: 0,
            suggestion_index: None,
            confirm_quit: false,
        }
    }

    /// Drop toasts that expired at or before `now`.
    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Most recent live toast.
    pub fn current_toast(&self) -> Option<&Notification> {
        self.toasts.last().map(|t| &t.notification)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::MessageAppended(message) => {
            state.messages.push(*message);
            // Follow the conversation again once something new arrives.
            state.scroll_offset = 0;
        }
        UiUpdate::TranscriptCleared => {
            state.messages.clear();
            state.scroll_offset = 0;
        }
        UiUpdate::RequestStatus(status) => {
            state.request_status = status;
        }
        UiUpdate::Error(message) => {
            state.error = Some(message);
        }
        UiUpdate::ErrorCleared => {
            state.error = None;
        }
        UiUpdate::Notify(notification) => {
            state.toasts.push(Toast {
                notification,
                expires_at: Instant::now() + state.toast_ttl,
            });
        }
        UiUpdate::Visualization(kind) => {
            if kind.is_none() {
                state.viz_mode = VizMode::Chart;
            }
            state.visualization = kind;
        }
        UiUpdate::ServiceStatus(status) => {
            state.service_status = status;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete chat screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.visualization.is_some());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::transcript::render(frame, layout.transcript, state);
    if let Some(area) = layout.visualization {
        widgets::visualization::render(frame, area, state);
    }
    widgets::notice::render(frame, layout.notice, state);
    widgets::input_box::render(frame, layout.input, state);
    render_help_bar(frame, &layout);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " Enter:Ask | Tab:Suggest | Ctrl+L:Clear | F2:Chart/Table/Insights | F5:Health | PgUp/PgDn:Scroll | Esc:Quit";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// Initializes the terminal, installs a panic hook that restores it, then
/// selects over UI updates, keyboard input and render ticks until the user
/// quits or the app closes the update channel.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    toast_ttl: Duration,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::with_toast_ttl(toast_ttl);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                info!("Quit requested from TUI");
                                break;
                            }
                        }
                    }
                    // Mouse, resize, focus: redrawn on the next tick
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                view_state.prune_toasts(Instant::now());
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
