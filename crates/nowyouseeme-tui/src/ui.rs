//! Rendering routines for the gallery TUI.

use crate::app::{App, UploadField, ViewerKind};
use nowyouseeme_core::GalleryState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};

const PRIMARY: Color = Color::Rgb(236, 91, 43);
const SECONDARY: Color = Color::Rgb(238, 121, 72);
const TEXT: Color = Color::Rgb(238, 238, 238);
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
const BORDER: Color = Color::Rgb(60, 60, 60);
const BORDER_ACTIVE: Color = Color::Rgb(238, 121, 72);
const ERROR: Color = Color::Rgb(255, 110, 110);

const HEADER_HEIGHT: u16 = 6;
const UPLOAD_HEIGHT: u16 = 13;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HERO_ART: [&str; 2] = [
    " █▄ █ █▀█ █ █ █ █ █▀█ █ █ █▀ █▀▀ █▀▀ █▀▄▀█ █▀▀",
    " █ ▀█ █▄█ ▀▄▀▄▀  █  █▄█ █▄█ ▄█ ██▄ ██▄ █ ▀ █ ██▄",
];

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // header bar
            Constraint::Min(0),                // gallery or viewer
            Constraint::Length(1),             // key hints
            Constraint::Length(1),             // status bar
        ])
        .split(area);

    draw_header(frame, app, root[0]);
    match app.viewer {
        Some(ViewerKind::Detail) => draw_detail(frame, app, root[1]),
        Some(ViewerKind::Upload) => {
            draw_gallery(frame, app, root[1]);
            draw_upload_form(frame, app, root[1]);
        }
        None => draw_gallery(frame, app, root[1]),
    }
    draw_hints(frame, app, root[2]);
    draw_status_bar(frame, app, root[3]);
}

/// Draw the banner, endpoint and collection size.
fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let art_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line<'_>> = HERO_ART
        .iter()
        .map(|art_line| Line::from(Span::styled(*art_line, art_style)))
        .collect();

    let count = match app.gallery.state() {
        GalleryState::Populated(items) => items.len().to_string(),
        GalleryState::Empty => "0".to_string(),
        GalleryState::Loading | GalleryState::Error(_) => "-".to_string(),
    };
    let label_style = Style::default().fg(TEXT_MUTED);
    let value_style = Style::default().fg(TEXT);
    lines.push(Line::from(vec![
        Span::styled("  api ", label_style),
        Span::styled(app.base_url.as_str(), value_style),
        Span::styled("  visualizations ", label_style),
        Span::styled(count, value_style),
        Span::styled(format!("  v{VERSION}"), label_style),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the gallery list (or its loading/error/empty banner) with scrollbar.
fn draw_gallery(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.gallery_lines();
    let title_color = match app.gallery.state() {
        GalleryState::Error(_) => ERROR,
        _ => TEXT_MUTED,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Gallery ", Style::default().fg(title_color)));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1); // -1 for scrollbar
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);
    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let list_area = Rect {
        width: content_width,
        ..inner
    };
    let gallery = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(gallery, list_area);
    draw_scrollbar(frame, inner, total_lines, content_height, scroll);
}

/// Draw the detail overlay for one visualization.
fn draw_detail(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.detail_lines();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACTIVE))
        .title(Span::styled(" Visualization ", Style::default().fg(SECONDARY)));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1);
    let content_height = inner.height as usize;
    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);
    app.update_viewer_scroll_bounds(total_lines.saturating_sub(content_height) as u16);
    let scroll = app.viewer_scroll;

    let body_area = Rect {
        width: content_width,
        ..inner
    };
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(body, body_area);
    draw_scrollbar(frame, inner, total_lines, content_height, scroll);
}

/// Draw the upload form centered over the gallery.
fn draw_upload_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let width = area.width.saturating_sub(4).min(72);
    let height = UPLOAD_HEIGHT.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let title = if app.upload.is_pending() {
        format!(" Upload {} ", app.spinner())
    } else {
        " Upload ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACTIVE))
        .title(Span::styled(title, Style::default().fg(SECONDARY)));
    let inner = block.inner(popup);

    let mut lines = Vec::new();
    for (field, label, value, placeholder) in [
        (
            UploadField::AgentName,
            "Agent name",
            app.upload.agent_name.as_str(),
            "required",
        ),
        (
            UploadField::Description,
            "Description",
            app.upload.description.as_str(),
            "optional",
        ),
        (
            UploadField::File,
            "Image file",
            app.file_input.as_str(),
            "path to a .png",
        ),
    ] {
        let focused = app.focus == field;
        let label_style = if focused {
            Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MUTED)
        };
        lines.push(Line::from(Span::styled(format!(" {label}"), label_style)));
        let prompt = if focused { " > " } else { "   " };
        let value_span = if value.is_empty() {
            Span::styled(placeholder, Style::default().fg(TEXT_MUTED))
        } else {
            Span::styled(value.to_string(), Style::default().fg(TEXT))
        };
        lines.push(Line::from(vec![
            Span::styled(prompt, Style::default().fg(PRIMARY)),
            value_span,
        ]));
        lines.push(Line::from(""));
    }
    if let Some(error) = app.upload.error() {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(ERROR),
        )));
    } else if app.upload.is_pending() {
        lines.push(Line::from(Span::styled(
            " uploading...",
            Style::default().fg(TEXT_MUTED),
        )));
    }

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_scrollbar(
    frame: &mut Frame<'_>,
    inner: Rect,
    total_lines: usize,
    content_height: usize,
    scroll: u16,
) {
    if total_lines <= content_height {
        return;
    }
    let mut scrollbar_state = ScrollbarState::default()
        .content_length(total_lines)
        .position(scroll as usize)
        .viewport_content_length(content_height);
    let scrollbar_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Style::default().fg(BORDER))
            .thumb_style(Style::default().fg(TEXT_MUTED)),
        scrollbar_area,
        &mut scrollbar_state,
    );
}

/// Draw key hints for the active view.
fn draw_hints(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hints = match app.viewer {
        Some(ViewerKind::Upload) => "tab next field  enter submit  esc close",
        Some(ViewerKind::Detail) => "↑/↓ scroll  esc back",
        None => "↑/↓ select  enter open  u upload  r refresh  q quit",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {hints}"),
            Style::default().fg(TEXT_MUTED),
        ))),
        area,
    );
}

/// Draw the single-line status bar.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let style = if app.status.starts_with("upload failed") || app.status == "load failed" {
        Style::default().fg(ERROR)
    } else {
        Style::default().fg(SECONDARY)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", app.status), style))),
        area,
    );
}
