//! Pane placement as a pure function of the terminal size
//!
//! ```text
//! ┌ Files ──────┐┌ Command Output ┐
//! │             ││                │
//! └─────────────┘│                │
//! ┌ Content ────┐│                │
//! │             ││                │
//! └─────────────┘└────────────────┘
//!  status bar
//! ```

use crate::ui::pane::PaneId;
use ratatui::layout::Rect;

/// Rows taken by borders around a pane
const BORDER: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneLayout {
    pub browser: Rect,
    pub content: Rect,
    pub output: Rect,
    pub status: Rect,
}

impl PaneLayout {
    pub fn compute(width: u16, height: u16) -> Self {
        let body_height = height.saturating_sub(1);
        let left_width = width / 2;
        let top_height = body_height / 2;

        PaneLayout {
            browser: Rect::new(0, 0, left_width, top_height),
            content: Rect::new(0, top_height, left_width, body_height - top_height),
            output: Rect::new(left_width, 0, width - left_width, body_height),
            status: Rect::new(0, body_height, width, height - body_height),
        }
    }

    pub fn area(&self, pane: PaneId) -> Rect {
        match pane {
            PaneId::Browser => self.browser,
            PaneId::Content => self.content,
            PaneId::Output => self.output,
        }
    }

    /// Text area inside a pane's borders
    pub fn viewport(&self, pane: PaneId) -> (u16, u16) {
        let area = self.area(pane);
        (
            area.width.saturating_sub(BORDER),
            area.height.saturating_sub(BORDER),
        )
    }
}
