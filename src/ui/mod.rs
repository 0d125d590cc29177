//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into these layers:
//!
//! - **[`engine`]** — the interaction state machine: session state, focus routing,
//!   selection handling, error notes
//! - **[`app`]** — runtime loop: terminal input, effect execution, timers
//! - **[`pane`]** / **[`layout`]** — scrollable panes and their placement
//! - **[`panes`]** — content builders for the browser pane and the status bar
//! - **[`ansi`]** — SGR colour decoding for command output
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an [`Engine`] and
//! call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod ansi;
pub mod app;
pub mod engine;
pub mod layout;
pub mod pane;
pub mod panes;
pub mod theme;
pub mod timer;

pub use app::App;
pub use engine::{Effect, Engine, ErrorNote, Event, NoteId, Session};
pub use pane::{Pane, PaneId};
