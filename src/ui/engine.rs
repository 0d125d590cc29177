//! Interaction engine: the message-driven state machine behind the TUI
//!
//! Every input is an [`Event`] handed to [`Engine::handle`], one at a time, in
//! arrival order. Handling an event mutates the [`Session`] and the panes and
//! returns the [`Effect`]s the runtime must carry out (list a directory,
//! schedule an error expiry, quit). [`Engine::render`] is a pure projection of
//! the current state and may be called any number of times.
//!
//! Committing an allowed file runs the external pipeline synchronously inside
//! `handle`, so a slow command blocks the loop until it returns.

use crate::browser::{BrowserEvent, BrowserInput, BrowserUpdate, EntryBrowser};
use crate::config::Config;
use crate::runner::{Pipeline, ProcessRunner};
use crate::ui::ansi;
use crate::ui::layout::PaneLayout;
use crate::ui::pane::{Pane, PaneId};
use crate::ui::panes;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{widgets::Paragraph, Frame};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Lines moved per mouse wheel notch
const WHEEL_LINES: isize = 3;

/// Identifies an [`ErrorNote`] so its expiry can be traced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

/// Transient error shown in the browser header until its timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNote {
    pub id: NoteId,
    pub message: String,
    /// Logical time (events handled so far) when the note was raised
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub enum Event {
    Resize { width: u16, height: u16 },
    Key(KeyEvent),
    /// Mouse wheel input; scrolls the focused viewer pane
    Mouse(MouseEvent),
    TimerExpired(NoteId),
    Browser(BrowserEvent),
}

/// Work the runtime performs on the engine's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// List a directory and feed the result back as [`Event::Browser`]
    ReadDir(PathBuf),
    /// Deliver [`Event::TimerExpired`] after `after`
    ScheduleExpiry { note: NoteId, after: Duration },
    /// Stop the event loop
    Quit,
}

/// Per-run session state, owned by the engine
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub selected_path: Option<PathBuf>,
    /// Raw file contents shown in the content pane
    pub selected_content: String,
    pub last_output: String,
    pub last_error: Option<ErrorNote>,
    pub focused: PaneId,
    pub terminal_size: (u16, u16),
    pub initialized: bool,
    pub quitting: bool,
}

pub struct Engine {
    session: Session,
    browser: EntryBrowser,
    panes: [Pane; 3],
    layout: PaneLayout,
    runner: Box<dyn ProcessRunner>,
    pipeline: Pipeline,
    error_timeout: Duration,
    /// Logical clock, advanced once per handled event
    clock: u64,
    next_note: u64,
}

impl Engine {
    pub fn new(config: &Config, runner: Box<dyn ProcessRunner>) -> Self {
        let browser = EntryBrowser::new(
            config.root_dir.clone(),
            config.allowed_extensions.clone(),
            config.visible_rows,
            config.show_hidden,
        );
        let mut engine = Engine {
            session: Session::default(),
            browser,
            panes: PaneId::ALL.map(Pane::new),
            layout: PaneLayout::default(),
            runner,
            pipeline: Pipeline::new(config.commands.clone(), config.variables_file.clone()),
            error_timeout: config.error_timeout,
            clock: 0,
            next_note: 0,
        };
        engine.sync_panes();
        engine
    }

    /// Startup effects: the browser's first directory listing
    pub fn initialize(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.apply_browser_update(self.browser.init(), &mut effects);
        self.sync_panes();
        effects
    }

    /// Apply one event and return the effects it produced
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        debug!(?event, clock = self.clock, "incoming event");
        self.clock += 1;

        let mut effects = Vec::new();
        match event {
            Event::Resize { width, height } => self.resize(width, height),
            Event::Key(key) => {
                if is_quit_key(&key) {
                    self.session.quitting = true;
                    return vec![Effect::Quit];
                }
                self.handle_key(key, &mut effects);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::TimerExpired(note) => {
                // Clears whatever note is live, even a newer one than `note`
                if let Some(current) = self.session.last_error.take() {
                    if current.id != note {
                        debug!(?note, current = ?current.id, "expiry cleared a newer note");
                    }
                }
            }
            Event::Browser(event) => {
                let update = self.browser.update(BrowserInput::Event(event));
                self.apply_browser_update(update, &mut effects);
            }
        }

        self.sync_panes();
        effects
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.session.terminal_size = (width, height);
        self.session.initialized = true;
        self.layout = PaneLayout::compute(width, height);
        for pane in &mut self.panes {
            let (w, h) = self.layout.viewport(pane.id());
            pane.set_size(w, h);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Vec<Effect>) {
        if let KeyCode::Char(c) = key.code {
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                if let Some(pane) = PaneId::from_digit(c) {
                    self.session.focused = pane;
                    return;
                }
            }
        }

        match self.session.focused {
            PaneId::Browser => {
                let update = self.browser.update(BrowserInput::Key(key));
                self.apply_browser_update(update, effects);
            }
            viewer => {
                if !self.panes[viewer.index()].handle_key(key) {
                    debug!(?key, pane = ?viewer, "key ignored");
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let delta = match mouse.kind {
            MouseEventKind::ScrollUp => -WHEEL_LINES,
            MouseEventKind::ScrollDown => WHEEL_LINES,
            _ => return,
        };
        match self.session.focused {
            PaneId::Browser => debug!(?mouse, "wheel ignored by browser"),
            viewer => self.panes[viewer.index()].scroll(delta),
        }
    }

    fn apply_browser_update(&mut self, update: BrowserUpdate, effects: &mut Vec<Effect>) {
        if let Some(dir) = update.read_dir {
            effects.push(Effect::ReadDir(dir));
        }
        if let Some(path) = update.selected {
            self.select(path);
        } else if let Some(path) = update.disabled {
            effects.push(self.reject(&path));
        }
    }

    /// Run the pipeline for a committed allowed file
    fn select(&mut self, path: PathBuf) {
        debug!(path = %path.display(), "file selected");
        self.session.last_error = None;
        self.session.last_output = self.pipeline.run_request(self.runner.as_ref(), &path);
        self.session.selected_content = self.pipeline.view_file(self.runner.as_ref(), &path);
        self.session.selected_path = Some(path);
    }

    /// Raise an error note for a disabled file and schedule its expiry
    fn reject(&mut self, path: &Path) -> Effect {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.next_note += 1;
        let note = ErrorNote {
            id: NoteId(self.next_note),
            message: format!("{} is not valid.", name),
            created_at: self.clock,
        };
        debug!(?note, "disabled entry selected");

        let effect = Effect::ScheduleExpiry {
            note: note.id,
            after: self.error_timeout,
        };
        self.session.last_error = Some(note);
        self.session.selected_path = None;
        self.session.selected_content.clear();
        effect
    }

    /// Recompute every pane's content and focus style from the session
    fn sync_panes(&mut self) {
        let focused = self.session.focused;
        for pane in &mut self.panes {
            pane.set_focused(pane.id() == focused);
        }

        let browser_text = panes::browser_text(
            &self.browser,
            self.session.selected_path.as_deref(),
            self.session.last_error.as_ref(),
        );
        let browser_pane = &mut self.panes[PaneId::Browser.index()];
        browser_pane.set_content(browser_text);
        // Entry lines follow the one-line header
        let cursor = self.browser.cursor();
        if let Some(pos) = self.browser.visible().position(|(idx, _)| idx == cursor) {
            browser_pane.scroll_into_view(pos + 1);
        }
        self.panes[PaneId::Content.index()]
            .set_content(ansi::to_text(&self.session.selected_content));
        self.panes[PaneId::Output.index()].set_content(ansi::to_text(&self.session.last_output));
    }

    /// Draw the current state. Does not mutate anything.
    pub fn render(&self, frame: &mut Frame) {
        if self.session.quitting {
            return;
        }
        if !self.session.initialized {
            let paragraph = Paragraph::new("Initializing...");
            frame.render_widget(paragraph, frame.area());
            return;
        }

        for pane in &self.panes {
            pane.render(frame, self.layout.area(pane.id()));
        }
        panes::render_status_bar(
            frame,
            self.layout.status,
            self.session.focused,
            self.session.last_error.is_some(),
        );
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pane(&self, id: PaneId) -> &Pane {
        &self.panes[id.index()]
    }

    pub fn browser(&self) -> &EntryBrowser {
        &self.browser
    }

    pub fn is_quitting(&self) -> bool {
        self.session.quitting
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
