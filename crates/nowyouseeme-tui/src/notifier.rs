//! Bridges upload completion into the TUI event loop.

use crate::event::AppEvent;
use log::{debug, warn};
use nowyouseeme_core::ChangeNotifier;
use tokio::sync::mpsc;

/// Queues an [`AppEvent::Refresh`] whenever the collection changes.
#[derive(Clone, Debug)]
pub struct RefreshNotifier {
    sender: mpsc::Sender<AppEvent>,
}

impl RefreshNotifier {
    pub fn new(sender: mpsc::Sender<AppEvent>) -> Self {
        Self { sender }
    }
}

impl ChangeNotifier for RefreshNotifier {
    fn notify_changed(&self) {
        match self.sender.try_send(AppEvent::Refresh) {
            Ok(()) => debug!("gallery refresh queued"),
            Err(mpsc::error::TrySendError::Closed(_)) => {}
            Err(err) => warn!("failed to queue gallery refresh (error={})", err),
        }
    }
}
