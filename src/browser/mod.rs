//! Entry browser: a navigable, filtered listing under a root directory
//!
//! The browser never touches the file system. It asks for listings through
//! [`BrowserUpdate::read_dir`] and receives them back as [`BrowserEvent`]s.
//! Each update reports at most one of two outcomes: an allowed file was
//! committed ([`BrowserUpdate::selected`]) or a disabled one was
//! ([`BrowserUpdate::disabled`]).

mod listing;

pub use listing::{is_hidden, read_dir, DirItem};

use crossterm::event::{KeyCode, KeyEvent};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A listed entry after filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    /// Files matching an allowed extension; directories are never allowed
    pub is_allowed: bool,
}

/// Results of directory reads requested by the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    Listing { dir: PathBuf, items: Vec<DirItem> },
    ListingFailed { dir: PathBuf, error: String },
}

/// Input accepted by [`EntryBrowser::update`]
#[derive(Debug, Clone)]
pub enum BrowserInput {
    Key(KeyEvent),
    Event(BrowserEvent),
}

/// What happened during one browser update
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BrowserUpdate {
    /// Path of an allowed file the user committed
    pub selected: Option<PathBuf>,
    /// Path of a disabled file the user tried to commit
    pub disabled: Option<PathBuf>,
    /// Directory the runtime must list and report back
    pub read_dir: Option<PathBuf>,
}

/// Cursor position saved when descending so `back` can restore it
#[derive(Debug, Clone, Copy)]
struct SavedView {
    cursor: usize,
    window_start: usize,
}

pub struct EntryBrowser {
    root: PathBuf,
    current: PathBuf,
    allowed_extensions: FxHashSet<String>,
    show_hidden: bool,
    visible_rows: usize,
    entries: Vec<Entry>,
    cursor: usize,
    window_start: usize,
    history: Vec<SavedView>,
    error: Option<String>,
}

impl EntryBrowser {
    pub fn new(
        root: PathBuf,
        allowed_extensions: FxHashSet<String>,
        visible_rows: usize,
        show_hidden: bool,
    ) -> Self {
        EntryBrowser {
            current: root.clone(),
            root,
            allowed_extensions,
            show_hidden,
            visible_rows: visible_rows.max(1),
            entries: Vec::new(),
            cursor: 0,
            window_start: 0,
            history: Vec::new(),
            error: None,
        }
    }

    /// Request the initial listing of the root directory
    pub fn init(&self) -> BrowserUpdate {
        BrowserUpdate {
            read_dir: Some(self.current.clone()),
            ..BrowserUpdate::default()
        }
    }

    pub fn update(&mut self, input: BrowserInput) -> BrowserUpdate {
        match input {
            BrowserInput::Key(key) => self.handle_key(key),
            BrowserInput::Event(event) => {
                self.handle_event(event);
                BrowserUpdate::default()
            }
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The entry under the cursor, if the listing is non-empty
    pub fn focused(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    /// Last listing error for the current directory
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Entries inside the fixed-height window, with their absolute indices
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .skip(self.window_start)
            .take(self.visible_rows)
    }

    /// Whether a file name matches the allowed extensions
    pub fn is_allowed_name(&self, name: &str) -> bool {
        self.allowed_extensions.is_empty()
            || self
                .allowed_extensions
                .iter()
                .any(|ext| name.ends_with(ext.as_str()))
    }

    fn handle_event(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::Listing { dir, items } => {
                if dir != self.current {
                    debug!(dir = %dir.display(), "dropping stale listing");
                    return;
                }
                self.entries = items
                    .into_iter()
                    .filter(|item| self.show_hidden || !is_hidden(&item.name))
                    .map(|item| Entry {
                        is_allowed: !item.is_dir && self.is_allowed_name(&item.name),
                        name: item.name,
                        is_dir: item.is_dir,
                    })
                    .collect();
                self.error = None;
                self.clamp_cursor();
            }
            BrowserEvent::ListingFailed { dir, error } => {
                if dir == self.current {
                    self.entries.clear();
                    self.error = Some(error);
                    self.clamp_cursor();
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> BrowserUpdate {
        let rows = self.visible_rows;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp | KeyCode::Char('K') => self.move_cursor(-(rows as isize)),
            KeyCode::PageDown | KeyCode::Char('J') => self.move_cursor(rows as isize),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(isize::MIN),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX),
            KeyCode::Enter => return self.open(true),
            KeyCode::Right | KeyCode::Char('l') => return self.open(false),
            KeyCode::Left | KeyCode::Backspace | KeyCode::Esc | KeyCode::Char('h') => {
                return self.back()
            }
            _ => {}
        }
        BrowserUpdate::default()
    }

    /// Descend into a directory, or commit a file when `select` is set
    fn open(&mut self, select: bool) -> BrowserUpdate {
        let Some(entry) = self.focused().cloned() else {
            return BrowserUpdate::default();
        };
        let path = self.current.join(&entry.name);

        if entry.is_dir {
            self.history.push(SavedView {
                cursor: self.cursor,
                window_start: self.window_start,
            });
            self.current = path;
            self.entries.clear();
            self.cursor = 0;
            self.window_start = 0;
            self.error = None;
            return BrowserUpdate {
                read_dir: Some(self.current.clone()),
                ..BrowserUpdate::default()
            };
        }

        if !select {
            return BrowserUpdate::default();
        }
        if entry.is_allowed {
            BrowserUpdate {
                selected: Some(path),
                ..BrowserUpdate::default()
            }
        } else {
            BrowserUpdate {
                disabled: Some(path),
                ..BrowserUpdate::default()
            }
        }
    }

    /// Return to the parent directory; a no-op at the root
    fn back(&mut self) -> BrowserUpdate {
        if self.current == self.root {
            return BrowserUpdate::default();
        }
        let Some(parent) = self.current.parent().map(Path::to_path_buf) else {
            return BrowserUpdate::default();
        };
        let saved = self.history.pop().unwrap_or(SavedView {
            cursor: 0,
            window_start: 0,
        });
        self.current = parent;
        self.entries.clear();
        self.cursor = saved.cursor;
        self.window_start = saved.window_start;
        self.error = None;
        BrowserUpdate {
            read_dir: Some(self.current.clone()),
            ..BrowserUpdate::default()
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta as usize).min(last)
        };
        self.scroll_to_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        let max_start = self.entries.len().saturating_sub(self.visible_rows);
        self.window_start = self.window_start.min(max_start);
        self.scroll_to_cursor();
    }

    /// Keep the cursor inside the visible window
    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.window_start {
            self.window_start = self.cursor;
        } else if self.cursor >= self.window_start + self.visible_rows {
            self.window_start = self.cursor + 1 - self.visible_rows;
        }
    }
}
