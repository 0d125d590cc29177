//! File browser pane content
//!
//! The first line is a header: the live error note, the selected file, or a
//! prompt. The browser's fixed-height window of entries follows.

use crate::browser::{Entry, EntryBrowser};
use crate::ui::engine::ErrorNote;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};
use std::path::Path;

/// Build the browser pane text
pub fn browser_text(
    browser: &EntryBrowser,
    selected: Option<&Path>,
    error: Option<&ErrorNote>,
) -> Text<'static> {
    let mut lines = vec![header_line(selected, error)];

    if let Some(err) = browser.error() {
        lines.push(Line::styled(
            err.to_string(),
            Style::default().fg(DEFAULT_THEME.error),
        ));
    } else if browser.entries().is_empty() {
        lines.push(Line::styled(
            "(empty directory)",
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    } else {
        for (idx, entry) in browser.visible() {
            lines.push(entry_line(entry, idx == browser.cursor()));
        }
    }

    Text::from(lines)
}

fn header_line(selected: Option<&Path>, error: Option<&ErrorNote>) -> Line<'static> {
    if let Some(note) = error {
        return Line::styled(
            note.message.clone(),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        );
    }
    match selected {
        Some(path) => Line::from(vec![
            Span::raw("Selected file: "),
            Span::styled(
                path.display().to_string(),
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::raw("Pick a file:"),
    }
}

fn entry_line(entry: &Entry, is_cursor: bool) -> Line<'static> {
    let marker = if is_cursor { "> " } else { "  " };
    let name = if entry.is_dir {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };

    let mut style = if entry.is_dir {
        Style::default().fg(DEFAULT_THEME.directory)
    } else if entry.is_allowed {
        Style::default().fg(DEFAULT_THEME.fg)
    } else {
        // Disabled: visible but not selectable
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::DIM)
    };
    if is_cursor {
        style = style.bg(DEFAULT_THEME.cursor_bg).add_modifier(Modifier::BOLD);
    }

    Line::from(vec![
        Span::styled(marker, Style::default().fg(DEFAULT_THEME.primary)),
        Span::styled(name, style),
    ])
}
