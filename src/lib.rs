//! # Introduction
//!
//! hurlview is a terminal front-end for a directory of request files. The user
//! browses the tree, commits a file, and sees both its raw contents and the
//! formatted output of running it through an external tool chain.
//!
//! ## Event flow
//!
//! ```text
//! crossterm input / timers → Event → Engine::handle → Effects → App runtime
//!                                          │
//!                                          └→ ProcessRunner (blocking)
//! ```
//!
//! 1. [`browser`] — filtered, navigable listing; reports allowed and disabled
//!    selections.
//! 2. [`runner`] — external process execution and the request → formatter
//!    pipeline.
//! 3. [`ui`] — the interaction engine, panes, and the ratatui runtime loop.
//! 4. [`config`] — TOML configuration with defaults for every field.
//! 5. [`logging`] — opt-in diagnostic event log.

pub mod browser;
pub mod config;
pub mod errors;
pub mod logging;
pub mod runner;
pub mod ui;
