//! Pane content builders and fixed-chrome renderers
//!
//! - [`browser`]: header line plus the browser's entry window
//! - [`status`]: status bar with keybindings and the focused pane
//!
//! The viewer panes need no builder; their content is the decoded command
//! output (see [`crate::ui::ansi`]).

pub mod browser;
pub mod status;

pub use browser::browser_text;
pub use status::render_status_bar;
