//! TUI event types for input and pipeline results.

use crossterm::event::KeyEvent;
use nowyouseeme_client::ClientError;
use nowyouseeme_core::{RefreshTicket, UploadError};
use nowyouseeme_protocol::{Visualization, VisualizationList};

/// Application event emitted by input handlers or background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event.
    Tick,
    /// Scroll event in the active view.
    Scroll(i16),
    /// The collection changed; fetch it again.
    Refresh,
    /// A `list()` issued for `ticket` completed.
    GalleryLoaded {
        ticket: RefreshTicket,
        result: Result<VisualizationList, ClientError>,
    },
    /// A `get()` for the detail view completed.
    DetailLoaded {
        id: String,
        result: Result<Visualization, ClientError>,
    },
    /// The upload job finished.
    UploadFinished(Result<Visualization, UploadError>),
}
