//! Application state for the gallery TUI.

use log::{debug, info};
use nowyouseeme_client::ClientError;
use nowyouseeme_core::{
    Card, ChangeNotifier, Gallery, GalleryState, RefreshTicket, SHORT_ID_LEN, SectionBody,
    UploadError, UploadForm,
};
use nowyouseeme_protocol::{Visualization, VisualizationList};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::cmp::min;
use std::path::PathBuf;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Overlay drawn on top of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKind {
    /// Full card of the selected visualization.
    Detail,
    /// Upload form.
    Upload,
}

/// Field focused in the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    AgentName,
    Description,
    File,
}

impl UploadField {
    fn next(self) -> Self {
        match self {
            UploadField::AgentName => UploadField::Description,
            UploadField::Description => UploadField::File,
            UploadField::File => UploadField::AgentName,
        }
    }

    fn previous(self) -> Self {
        match self {
            UploadField::AgentName => UploadField::File,
            UploadField::Description => UploadField::AgentName,
            UploadField::File => UploadField::Description,
        }
    }
}

/// Detail overlay content, keyed by the id it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Loading(String),
    Ready(Card),
    Failed(String),
}

/// Top-level application state for the TUI.
pub struct App {
    /// Gallery state machine.
    pub gallery: Gallery,
    /// Cards for the populated gallery, in display order.
    pub cards: Vec<Card>,
    /// Index of the selected card.
    pub selected: usize,
    /// Upload form state.
    pub upload: UploadForm,
    /// Raw text of the file path field.
    pub file_input: String,
    /// Focused upload field.
    pub focus: UploadField,
    /// Detail overlay content.
    pub detail: Option<Detail>,
    /// Current overlay, if any.
    pub viewer: Option<ViewerKind>,
    /// Current viewer scroll offset.
    pub viewer_scroll: u16,
    /// Maximum viewer scroll offset.
    pub viewer_max_scroll: u16,
    /// Current gallery scroll offset.
    pub scroll: u16,
    /// Maximum scroll offset for the gallery view.
    pub max_scroll: u16,
    /// Status line text.
    pub status: String,
    /// Service base URL (shown in header).
    pub base_url: String,
    ticks: usize,
}

impl App {
    /// Create a new application state with defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            gallery: Gallery::new(),
            cards: Vec::new(),
            selected: 0,
            upload: UploadForm::new(),
            file_input: String::new(),
            focus: UploadField::AgentName,
            detail: None,
            viewer: None,
            viewer_scroll: 0,
            viewer_max_scroll: 0,
            scroll: 0,
            max_scroll: 0,
            status: "idle".to_string(),
            base_url: base_url.into(),
            ticks: 0,
        }
    }

    /// Start a gallery refresh and return the ticket for its result.
    ///
    /// Cards from the previous fetch are dropped so nothing can be opened
    /// while the list is loading.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.cards.clear();
        self.selected = 0;
        self.push_status("loading");
        self.gallery.begin_refresh()
    }

    /// Apply a list result; stale results are ignored.
    pub fn apply_gallery(
        &mut self,
        ticket: RefreshTicket,
        result: Result<VisualizationList, ClientError>,
    ) {
        if !self.gallery.apply(ticket, result) {
            return;
        }
        self.cards = self.gallery.cards();
        self.selected = min(self.selected, self.cards.len().saturating_sub(1));
        self.scroll = 0;
        let status = match self.gallery.state() {
            GalleryState::Populated(items) => format!("{} visualizations", items.len()),
            GalleryState::Empty => "gallery is empty".to_string(),
            GalleryState::Error(_) => "load failed".to_string(),
            GalleryState::Loading => "loading".to_string(),
        };
        self.push_status(status);
    }

    /// Update the status line.
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        debug!("status updated (status={})", self.status);
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.ticks % SPINNER.len()]
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.cards.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    /// Open the detail overlay for the selected card and return its id.
    pub fn open_detail(&mut self) -> Option<String> {
        let id = self.selected_card()?.id.clone();
        info!("opening detail (id={})", id);
        self.detail = Some(Detail::Loading(id.clone()));
        self.open_viewer(ViewerKind::Detail);
        Some(id)
    }

    /// Apply a `get` result if it still matches the open detail request.
    pub fn apply_detail(&mut self, id: &str, result: Result<Visualization, ClientError>) {
        if !matches!(&self.detail, Some(Detail::Loading(pending)) if pending == id) {
            debug!("discarding stale detail (id={})", id);
            return;
        }
        self.detail = Some(match result {
            Ok(viz) => Detail::Ready(Card::from(&viz)),
            Err(err) => Detail::Failed(err.to_string()),
        });
    }

    /// Append a character to the focused upload field.
    pub fn type_char(&mut self, ch: char) {
        match self.focus {
            UploadField::AgentName => self.upload.agent_name.push(ch),
            UploadField::Description => self.upload.description.push(ch),
            UploadField::File => self.file_input.push(ch),
        }
        self.sync_file();
    }

    /// Remove the last character of the focused upload field.
    pub fn backspace(&mut self) {
        match self.focus {
            UploadField::AgentName => {
                self.upload.agent_name.pop();
            }
            UploadField::Description => {
                self.upload.description.pop();
            }
            UploadField::File => {
                self.file_input.pop();
            }
        }
        self.sync_file();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Record an upload outcome; success closes the form and notifies.
    pub fn finish_upload(
        &mut self,
        result: &Result<Visualization, UploadError>,
        notifier: &dyn ChangeNotifier,
    ) {
        self.upload.settle(result, notifier);
        match result {
            Ok(created) => {
                self.file_input.clear();
                self.focus = UploadField::AgentName;
                if self.viewer == Some(ViewerKind::Upload) {
                    self.close_viewer();
                }
                let short: String = created.id.chars().take(SHORT_ID_LEN).collect();
                self.push_status(format!("uploaded {short}"));
            }
            Err(err) => self.push_status(format!("upload failed: {err}")),
        }
    }

    fn sync_file(&mut self) {
        let path = self.file_input.trim();
        self.upload.file = (!path.is_empty()).then(|| PathBuf::from(path));
    }

    /// Scroll the gallery view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the gallery view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.max_scroll);
    }

    /// Update scroll bounds after layout changes.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        self.max_scroll = max_scroll;
        self.scroll = self.scroll.min(max_scroll);
    }

    /// Render the gallery body for the current state.
    pub fn gallery_lines(&self) -> Vec<Line<'static>> {
        let muted = Style::default().fg(Color::Rgb(128, 128, 128));
        match self.gallery.state() {
            GalleryState::Loading => vec![Line::from(Span::styled(
                format!(" {} Loading visualizations...", self.spinner()),
                muted,
            ))],
            GalleryState::Error(message) => vec![
                Line::from(Span::styled(
                    " Could not load the gallery",
                    Style::default()
                        .fg(error_color())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(" {message}"),
                    Style::default().fg(error_color()),
                )),
                Line::from(""),
                Line::from(Span::styled(" Press r to try again.", muted)),
            ],
            GalleryState::Empty => vec![
                Line::from(Span::styled(" No visualizations yet.", muted)),
                Line::from(Span::styled(" Press u to upload the first one.", muted)),
            ],
            GalleryState::Populated(_) => self
                .cards
                .iter()
                .enumerate()
                .flat_map(|(index, card)| summary_lines(card, index == self.selected))
                .collect(),
        }
    }

    /// Render the detail overlay body.
    pub fn detail_lines(&self) -> Vec<Line<'static>> {
        match &self.detail {
            None => Vec::new(),
            Some(Detail::Loading(id)) => vec![Line::from(format!(
                " {} Loading {id}...",
                self.spinner()
            ))],
            Some(Detail::Failed(message)) => vec![Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(error_color()),
            ))],
            Some(Detail::Ready(card)) => detail_lines(card),
        }
    }

    /// Open a viewer overlay.
    pub fn open_viewer(&mut self, kind: ViewerKind) {
        self.viewer = Some(kind);
        self.viewer_scroll = 0;
        self.viewer_max_scroll = 0;
    }

    /// Close the viewer overlay.
    pub fn close_viewer(&mut self) {
        if self.viewer == Some(ViewerKind::Detail) {
            self.detail = None;
        }
        self.viewer = None;
        self.viewer_scroll = 0;
        self.viewer_max_scroll = 0;
    }

    /// Scroll viewer up by a number of lines.
    pub fn viewer_scroll_up(&mut self, lines: u16) {
        self.viewer_scroll = self.viewer_scroll.saturating_sub(lines);
    }

    /// Scroll viewer down by a number of lines.
    pub fn viewer_scroll_down(&mut self, lines: u16) {
        self.viewer_scroll = min(
            self.viewer_scroll.saturating_add(lines),
            self.viewer_max_scroll,
        );
    }

    /// Update viewer scroll bounds after layout changes.
    pub fn update_viewer_scroll_bounds(&mut self, max_scroll: u16) {
        self.viewer_max_scroll = max_scroll;
        self.viewer_scroll = self.viewer_scroll.min(max_scroll);
    }
}

/// Compact gallery entry: header plus a few leading sections.
fn summary_lines(card: &Card, selected: bool) -> Vec<Line<'static>> {
    let marker = if selected { "> " } else { "  " };
    let name_style = if selected {
        Style::default()
            .fg(accent_color())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(238, 238, 238))
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(accent_color())),
        Span::styled(card.agent_name.clone(), name_style),
        Span::styled(
            format!("  {}  {}", card.short_id, card.created),
            Style::default().fg(Color::Rgb(128, 128, 128)),
        ),
    ])];
    for section in card
        .sections
        .iter()
        .filter(|section| matches!(section.title, "Description" | "Tags" | "Mood"))
    {
        lines.push(section_line(section.title, &section.body));
    }
    lines.push(Line::from(""));
    lines
}

/// Every section of a card, including the full timeline.
fn detail_lines(card: &Card) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Rgb(128, 128, 128));
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", card.agent_name),
            Style::default()
                .fg(accent_color())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(" id ", label),
            Span::raw(card.id.clone()),
            Span::styled("  created ", label),
            Span::raw(card.created.clone()),
        ]),
        Line::from(vec![
            Span::styled(" image ", label),
            Span::raw(match card.image_len {
                Some(len) => format!("{len} bytes (image/png)"),
                None => "unreadable payload".to_string(),
            }),
        ]),
        Line::from(""),
    ];
    for section in &card.sections {
        match &section.body {
            SectionBody::Timeline(entries) => {
                lines.push(Line::from(Span::styled(
                    format!(" {}", section.title),
                    label,
                )));
                for entry in entries {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("   v{} ", entry.version),
                            Style::default().fg(accent_color()),
                        ),
                        Span::styled(format!("{}  ", entry.timestamp), label),
                        Span::raw(entry.changes.clone()),
                    ]));
                    lines.push(Line::from(Span::styled(
                        format!("      {}", entry.reasoning),
                        label,
                    )));
                }
            }
            body => lines.push(section_line(section.title, body)),
        }
    }
    lines
}

fn section_line(title: &str, body: &SectionBody) -> Line<'static> {
    let value = match body {
        SectionBody::Text(text) => text.clone(),
        SectionBody::List(items) => items.join(", "),
        SectionBody::Timeline(entries) => format!("{} versions", entries.len()),
    };
    Line::from(vec![
        Span::styled(
            format!("    {title}: "),
            Style::default().fg(Color::Rgb(128, 128, 128)),
        ),
        Span::raw(value),
    ])
}

fn accent_color() -> Color {
    Color::Rgb(238, 121, 72)
}

fn error_color() -> Color {
    Color::Rgb(255, 110, 110)
}
