//! Library entry point for the gallery TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui terminal UI
//! against any [`VisualizationApi`].

mod app;
mod event;
mod notifier;
mod ui;

pub use notifier::RefreshNotifier;

use anyhow::anyhow;
use app::{App, ViewerKind};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use log::{debug, info};
use nowyouseeme_client::VisualizationApi;
use nowyouseeme_core::{ChangeNotifier, UploadError, UploadJob};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configuration for a TUI session.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Service base URL (shown in header).
    pub base_url: String,
    /// Interval between tick events (spinner animation).
    pub tick_rate: Duration,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tick_rate: Duration::from_millis(250),
        }
    }
}

/// Launch the gallery TUI.
///
/// The caller is responsible for initializing logging before calling `run`;
/// log output goes to stderr and should be redirected while the TUI is open.
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails.
pub async fn run(api: Arc<dyn VisualizationApi>, config: TuiConfig) -> anyhow::Result<()> {
    let mut app = App::new(config.base_url.clone());

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    let notifier = RefreshNotifier::new(tx.clone());
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone(), config.tick_rate);
    start_refresh(&api, &mut app, tx.clone());

    let result = loop {
        if let Err(err) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(err.into());
        }
        let Some(event) = rx.recv().await else {
            break Err(anyhow!("event channel closed unexpectedly"));
        };
        match handle_app_event(event, &api, &mut app, &notifier, tx.clone()) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(err) => break Err(err),
        }
    };

    restore_terminal(&mut terminal)?;
    result
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(
    event: AppEvent,
    api: &Arc<dyn VisualizationApi>,
    app: &mut App,
    notifier: &dyn ChangeNotifier,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Input(key) => Ok(handle_input(key, api, app, sender)),
        AppEvent::Tick => {
            app.tick();
            Ok(false)
        }
        AppEvent::Scroll(delta) => {
            if app.viewer.is_some() {
                if delta < 0 {
                    app.viewer_scroll_up(delta.unsigned_abs());
                } else {
                    app.viewer_scroll_down(delta.unsigned_abs());
                }
            } else if delta < 0 {
                app.scroll_up(delta.unsigned_abs());
            } else {
                app.scroll_down(delta.unsigned_abs());
            }
            Ok(false)
        }
        AppEvent::Refresh => {
            start_refresh(api, app, sender);
            Ok(false)
        }
        AppEvent::GalleryLoaded { ticket, result } => {
            app.apply_gallery(ticket, result);
            Ok(false)
        }
        AppEvent::DetailLoaded { id, result } => {
            app.apply_detail(&id, result);
            Ok(false)
        }
        AppEvent::UploadFinished(result) => {
            app.finish_upload(&result, notifier);
            Ok(false)
        }
    }
}

/// Handle keyboard input and dispatch actions.
fn handle_input(
    key: KeyEvent,
    api: &Arc<dyn VisualizationApi>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    match app.viewer {
        Some(ViewerKind::Upload) => {
            handle_upload_input(key, api, app, sender);
            false
        }
        Some(ViewerKind::Detail) => {
            handle_detail_input(key, app);
            false
        }
        None => handle_gallery_input(key, api, app, sender),
    }
}

/// Handle keyboard input on the gallery view.
fn handle_gallery_input(
    key: KeyEvent,
    api: &Arc<dyn VisualizationApi>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char('r') => start_refresh(api, app, sender),
        KeyCode::Char('u') => app.open_viewer(ViewerKind::Upload),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::PageUp => app.scroll_up(5),
        KeyCode::PageDown => app.scroll_down(5),
        KeyCode::Home => app.scroll_up(u16::MAX),
        KeyCode::End => app.scroll_down(u16::MAX),
        KeyCode::Enter => {
            if let Some(id) = app.open_detail() {
                spawn_detail(api.clone(), id, sender);
            }
        }
        _ => {}
    }
    false
}

/// Handle keyboard input while the detail overlay is open.
fn handle_detail_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_viewer(),
        KeyCode::Up => app.viewer_scroll_up(1),
        KeyCode::Down => app.viewer_scroll_down(1),
        KeyCode::PageUp => app.viewer_scroll_up(5),
        KeyCode::PageDown => app.viewer_scroll_down(5),
        KeyCode::Home => app.viewer_scroll_up(u16::MAX),
        KeyCode::End => app.viewer_scroll_down(u16::MAX),
        _ => {}
    }
}

/// Handle keyboard input while the upload form is open.
fn handle_upload_input(
    key: KeyEvent,
    api: &Arc<dyn VisualizationApi>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) {
    match key.code {
        KeyCode::Esc => app.close_viewer(),
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => match app.upload.begin_submit() {
            Ok(job) => {
                app.push_status("uploading");
                spawn_upload(api.clone(), job, sender);
            }
            Err(UploadError::InFlight) => app.push_status("upload already in progress"),
            Err(err) => app.push_status(err.to_string()),
        },
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.type_char(ch)
        }
        _ => {}
    }
}

/// Enter `Loading` and fetch the collection in the background.
fn start_refresh(api: &Arc<dyn VisualizationApi>, app: &mut App, sender: mpsc::Sender<AppEvent>) {
    let ticket = app.begin_refresh();
    let api = api.clone();
    tokio::spawn(async move {
        let result = api.list().await;
        let _ = sender.send(AppEvent::GalleryLoaded { ticket, result }).await;
    });
}

/// Spawn a task fetching one visualization for the detail overlay.
fn spawn_detail(api: Arc<dyn VisualizationApi>, id: String, sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = api.get(&id).await;
        let _ = sender.send(AppEvent::DetailLoaded { id, result }).await;
    });
}

/// Spawn a task running an upload job.
fn spawn_upload(api: Arc<dyn VisualizationApi>, job: UploadJob, sender: mpsc::Sender<AppEvent>) {
    info!(
        "starting upload (agent_name={}, path={})",
        job.agent_name(),
        job.file().display()
    );
    tokio::spawn(async move {
        let result = job.run(api.as_ref()).await;
        let _ = sender.send(AppEvent::UploadFinished(result)).await;
    });
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if !matches!(crossterm::event::poll(Duration::from_millis(30)), Ok(true)) {
                tokio::task::yield_now().await;
                continue;
            }
            while matches!(crossterm::event::poll(Duration::from_millis(0)), Ok(true)) {
                let event = match crossterm::event::read() {
                    Ok(event) => event,
                    Err(_) => break,
                };
                let sent = match event {
                    CrosstermEvent::Key(key) => sender.send(AppEvent::Input(key)).await,
                    CrosstermEvent::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollUp => {
                            sender.send(AppEvent::Scroll(-MOUSE_SCROLL_LINES)).await
                        }
                        MouseEventKind::ScrollDown => {
                            sender.send(AppEvent::Scroll(MOUSE_SCROLL_LINES)).await
                        }
                        _ => Ok(()),
                    },
                    _ => Ok(()),
                };
                if sent.is_err() {
                    debug!("input handler stopping: event loop closed");
                    return;
                }
            }
        }
    });
}

/// Spawn a periodic tick event generator.
fn spawn_tick(sender: mpsc::Sender<AppEvent>, tick_rate: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            if sender.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
