//! Scrollable, focusable text region
//!
//! A [`Pane`] holds no business logic. The engine hands it content each cycle
//! and routes scroll input to it while it has focus. The scroll offset is
//! clamped to `[0, max(0, lines - viewport_height)]` after every
//! [`Pane::set_content`], [`Pane::set_size`] and [`Pane::scroll`].

use crate::ui::theme::DEFAULT_THEME;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// The three logical views, in focus-key order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaneId {
    #[default]
    Browser,
    Content,
    Output,
}

impl PaneId {
    pub const ALL: [PaneId; 3] = [PaneId::Browser, PaneId::Content, PaneId::Output];

    /// Focus key `'1'..='3'` to pane
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(PaneId::Browser),
            '2' => Some(PaneId::Content),
            '3' => Some(PaneId::Output),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PaneId::Browser => 0,
            PaneId::Content => 1,
            PaneId::Output => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PaneId::Browser => " Files ",
            PaneId::Content => " File Content ",
            PaneId::Output => " Command Output ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    content: Text<'static>,
    scroll_offset: usize,
    viewport_width: u16,
    viewport_height: u16,
    focused: bool,
}

impl Pane {
    pub fn new(id: PaneId) -> Self {
        Pane {
            id,
            content: Text::default(),
            scroll_offset: 0,
            viewport_width: 0,
            viewport_height: 0,
            focused: false,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.clamp_scroll();
    }

    pub fn set_content(&mut self, content: impl Into<Text<'static>>) {
        self.content = content.into();
        self.clamp_scroll();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Move the view by `delta` lines, clamped to the content
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta as usize)
        };
        self.clamp_scroll();
    }

    /// Scroll the least distance that puts `line` inside the viewport
    pub fn scroll_into_view(&mut self, line: usize) {
        let height = self.viewport_height as usize;
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if height > 0 && line >= self.scroll_offset + height {
            self.scroll_offset = line + 1 - height;
        }
        self.clamp_scroll();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    /// Viewer navigation keys. Returns false for keys the pane ignores.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let page = self.viewport_height.max(1) as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll(1),
            KeyCode::PageUp | KeyCode::Char('b') => self.scroll(-page),
            KeyCode::PageDown | KeyCode::Char('f') | KeyCode::Char(' ') => self.scroll(page),
            KeyCode::Char('u') => self.scroll(-(page / 2).max(1)),
            KeyCode::Char('d') => self.scroll((page / 2).max(1)),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.scroll_to_bottom(),
            _ => return false,
        }
        true
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn line_count(&self) -> usize {
        self.content.lines.len()
    }

    /// Content without styling, lines joined by `\n`
    pub fn plain_text(&self) -> String {
        self.content
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn max_scroll(&self) -> usize {
        self.line_count()
            .saturating_sub(self.viewport_height as usize)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Draw the pane into `area` with a focus-dependent border
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.border_normal)
        };

        let block = Block::default()
            .title(self.id.title())
            .borders(Borders::ALL)
            .border_style(border_style);

        // Only the visible slice is handed to ratatui
        let visible: Vec<_> = self
            .content
            .lines
            .iter()
            .skip(self.scroll_offset)
            .take(self.viewport_height as usize)
            .cloned()
            .collect();

        let paragraph = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.fg));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_scroll_clamps_both_bounds() {
        let mut pane = Pane::new(PaneId::Output);
        pane.set_size(20, 4);
        pane.set_content(numbered(10));

        pane.scroll(-3);
        assert_eq!(pane.scroll_offset(), 0);

        pane.scroll(100);
        assert_eq!(pane.scroll_offset(), 6);

        pane.scroll(-2);
        assert_eq!(pane.scroll_offset(), 4);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut pane = Pane::new(PaneId::Content);
        pane.set_size(20, 4);
        pane.set_content(numbered(30));
        pane.scroll_to_bottom();
        assert_eq!(pane.scroll_offset(), 26);

        pane.set_content(numbered(6));
        assert_eq!(pane.scroll_offset(), 2);

        pane.set_content("short");
        assert_eq!(pane.scroll_offset(), 0);
    }

    #[test]
    fn test_growing_viewport_clamps_offset() {
        let mut pane = Pane::new(PaneId::Content);
        pane.set_size(20, 2);
        pane.set_content(numbered(5));
        pane.scroll(10);
        assert_eq!(pane.scroll_offset(), 3);

        pane.set_size(20, 10);
        assert_eq!(pane.scroll_offset(), 0);
    }

    #[test]
    fn test_scroll_into_view() {
        let mut pane = Pane::new(PaneId::Browser);
        pane.set_size(20, 4);
        pane.set_content(numbered(12));

        pane.scroll_into_view(2);
        assert_eq!(pane.scroll_offset(), 0);
        pane.scroll_into_view(9);
        assert_eq!(pane.scroll_offset(), 6);
        pane.scroll_into_view(7);
        assert_eq!(pane.scroll_offset(), 6);
        pane.scroll_into_view(1);
        assert_eq!(pane.scroll_offset(), 1);
    }

    #[test]
    fn test_plain_text_round_trip() {
        let mut pane = Pane::new(PaneId::Output);
        pane.set_content(crate::ui::ansi::to_text("{\n  \"a\": 1\n}"));
        assert_eq!(pane.plain_text(), "{\n  \"a\": 1\n}");
        assert_eq!(pane.line_count(), 3);
    }

    #[test]
    fn test_viewer_keys() {
        use crossterm::event::KeyModifiers;
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        let mut pane = Pane::new(PaneId::Output);
        pane.set_size(20, 4);
        pane.set_content(numbered(20));

        assert!(pane.handle_key(press(KeyCode::PageDown)));
        assert_eq!(pane.scroll_offset(), 4);
        assert!(pane.handle_key(press(KeyCode::Char('d'))));
        assert_eq!(pane.scroll_offset(), 6);
        assert!(pane.handle_key(press(KeyCode::Char('G'))));
        assert_eq!(pane.scroll_offset(), 16);
        assert!(pane.handle_key(press(KeyCode::Up)));
        assert_eq!(pane.scroll_offset(), 15);
        assert!(pane.handle_key(press(KeyCode::Char('g'))));
        assert_eq!(pane.scroll_offset(), 0);

        assert!(!pane.handle_key(press(KeyCode::Char('x'))));
        assert_eq!(pane.scroll_offset(), 0);
    }

    #[test]
    fn test_focus_digits() {
        assert_eq!(PaneId::from_digit('1'), Some(PaneId::Browser));
        assert_eq!(PaneId::from_digit('3'), Some(PaneId::Output));
        assert_eq!(PaneId::from_digit('4'), None);
    }
}
