//! Gallery pipeline: fetch the collection, order it, track view state.

use crate::render::Card;
use chrono::{DateTime, Utc};
use log::{debug, info};
use nowyouseeme_client::{ClientError, VisualizationApi};
use nowyouseeme_protocol::{Visualization, VisualizationList};
use std::cmp::Ordering;

/// What the gallery view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GalleryState {
    /// A fetch is in flight.
    #[default]
    Loading,
    /// The last fetch failed; holds the message to display.
    Error(String),
    /// The last fetch succeeded with no records.
    Empty,
    /// Records from the last fetch, newest first.
    Populated(Vec<Visualization>),
}

/// Identifies one fetch; results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Owner of the gallery state machine.
#[derive(Debug, Default)]
pub struct Gallery {
    state: GalleryState,
    generation: u64,
}

impl Gallery {
    /// A fresh gallery starts out loading.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Records currently on display; empty unless populated.
    pub fn visualizations(&self) -> &[Visualization] {
        match &self.state {
            GalleryState::Populated(items) => items,
            _ => &[],
        }
    }

    /// Cards for every record on display, in display order.
    pub fn cards(&self) -> Vec<Card> {
        self.visualizations().iter().map(Card::from).collect()
    }

    /// Enter `Loading` and hand out a ticket for the fetch about to start.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.state = GalleryState::Loading;
        debug!("gallery refresh started (generation={})", self.generation);
        RefreshTicket(self.generation)
    }

    /// Whether `ticket` belongs to the most recent refresh.
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a `list()` outcome. Returns `false` when the ticket is stale and
    /// the result was discarded.
    pub fn apply(
        &mut self,
        ticket: RefreshTicket,
        result: Result<VisualizationList, ClientError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "discarding stale gallery result (ticket={}, generation={})",
                ticket.0, self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(list) => {
                let mut items = list.visualizations;
                sort_newest_first(&mut items);
                info!("gallery loaded (count={})", items.len());
                if items.is_empty() {
                    GalleryState::Empty
                } else {
                    GalleryState::Populated(items)
                }
            }
            Err(err) => {
                info!("gallery load failed (error={})", err);
                GalleryState::Error(err.message())
            }
        };
        true
    }
}

/// Order records by `created_at`, newest first.
///
/// Equal timestamps keep their response order. Timestamps that cannot be
/// parsed sort after every parseable one.
pub fn sort_newest_first(items: &mut [Visualization]) {
    items.sort_by(|a, b| newest_first(a.created_at.to_utc(), b.created_at.to_utc()));
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Run one complete refresh of `gallery` against `api`.
pub async fn load(api: &dyn VisualizationApi, gallery: &mut Gallery) -> bool {
    let ticket = gallery.begin_refresh();
    let result = api.list().await;
    gallery.apply(ticket, result)
}
