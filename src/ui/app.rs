//! Runtime loop around the [`Engine`]
//!
//! The app owns the terminal-facing side: it turns crossterm input into engine
//! events, carries out the engine's effects, and delivers timer expiries. Events
//! are queued and handled strictly one after another.

use crate::browser::{self, BrowserEvent};
use crate::ui::engine::{Effect, Engine, Event};
use crate::ui::timer::NotificationTimer;
use crossterm::event::{self, Event as TermEvent, KeyEventKind, MouseEventKind};
use ratatui::{backend::Backend, Terminal};
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::warn;

/// Longest time the loop waits for input when no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct App {
    engine: Engine,
    timer: NotificationTimer,
    queue: VecDeque<Event>,
}

impl App {
    pub fn new(engine: Engine) -> Self {
        App {
            engine,
            timer: NotificationTimer::new(),
            queue: VecDeque::new(),
        }
    }

    /// Run the TUI until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let effects = self.engine.initialize();
        self.apply(effects);

        // No resize arrives on startup, so seed one from the current size
        let (width, height) = crossterm::terminal::size()?;
        self.process(Event::Resize { width, height });

        loop {
            terminal.draw(|f| self.engine.render(f))?;

            if self.engine.is_quitting() {
                break;
            }

            let timeout = self
                .timer
                .next_deadline()
                .map(|at| at.saturating_duration_since(Instant::now()).min(IDLE_POLL))
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout)? {
                if let Some(event) = translate(event::read()?) {
                    self.process(event);
                }
            }

            self.fire_due(Instant::now());
        }

        Ok(())
    }

    /// Queue `event` and handle it plus everything its effects enqueue
    pub fn process(&mut self, event: Event) {
        self.queue.push_back(event);
        self.drain();
    }

    /// Deliver expiry events for every timer due at `now`
    pub fn fire_due(&mut self, now: Instant) {
        for note in self.timer.take_due(now) {
            self.queue.push_back(Event::TimerExpired(note));
        }
        self.drain();
    }

    fn drain(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            let effects = self.engine.handle(event);
            self.apply(effects);
            if self.engine.is_quitting() {
                self.queue.clear();
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ReadDir(dir) => {
                    self.queue.push_back(Event::Browser(list_dir(&dir)));
                }
                Effect::ScheduleExpiry { note, after } => {
                    self.timer.schedule(Instant::now(), after, note);
                }
                // The engine records the quit itself; the loop checks it
                Effect::Quit => {}
            }
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn timer(&self) -> &NotificationTimer {
        &self.timer
    }
}

fn list_dir(dir: &Path) -> BrowserEvent {
    match browser::read_dir(dir) {
        Ok(items) => BrowserEvent::Listing {
            dir: dir.to_path_buf(),
            items,
        },
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list directory");
            BrowserEvent::ListingFailed {
                dir: dir.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

/// Map terminal input to engine events; key releases and mouse input other
/// than the wheel are dropped
fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Mouse(mouse)
            if matches!(
                mouse.kind,
                MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
            ) =>
        {
            Some(Event::Mouse(mouse))
        }
        TermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::runner::{ProcessRunner, RunnerError};
    use crate::ui::pane::PaneId;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};
    use std::fs;

    struct Quiet;

    impl ProcessRunner for Quiet {
        fn run(&self, _program: &str, _args: &[String]) -> Result<String, RunnerError> {
            Ok(String::new())
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_for(root: &Path) -> App {
        let config = Config::with_root(root.to_path_buf());
        let mut app = App::new(Engine::new(&config, Box::new(Quiet)));
        let effects = app.engine.initialize();
        app.apply(effects);
        app.drain();
        app
    }

    #[test]
    fn test_initial_listing_reaches_browser() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("get.hurl"), "GET http://localhost").unwrap();
        fs::write(tmp.path().join(".hidden.hurl"), "").unwrap();

        let app = app_for(tmp.path());
        let names: Vec<_> = app
            .engine()
            .browser()
            .entries()
            .iter()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(names, vec!["get.hurl"]);
    }

    #[test]
    fn test_descending_lists_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("auth")).unwrap();
        fs::write(tmp.path().join("auth").join("login.hurl"), "").unwrap();

        let mut app = app_for(tmp.path());
        app.process(press(KeyCode::Enter));
        assert_eq!(app.engine().browser().current_dir(), tmp.path().join("auth"));
        assert_eq!(app.engine().browser().entries()[0].name, "login.hurl");
    }

    #[test]
    fn test_disabled_selection_schedules_and_expires() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();

        let mut app = app_for(tmp.path());
        app.process(press(KeyCode::Enter));
        assert!(app.engine().session().last_error.is_some());
        assert_eq!(app.timer().len(), 1);

        // Not yet due
        app.fire_due(Instant::now());
        assert!(app.engine().session().last_error.is_some());

        app.fire_due(Instant::now() + Duration::from_secs(3));
        assert!(app.engine().session().last_error.is_none());
        assert!(app.timer().is_empty());
    }

    #[test]
    fn test_missing_root_shows_listing_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = app_for(&tmp.path().join("missing"));
        assert!(app.engine().browser().error().is_some());
        assert!(app
            .engine()
            .pane(PaneId::Browser)
            .plain_text()
            .starts_with("Pick a file:"));
    }

    #[test]
    fn test_quit_drops_queued_events() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_for(tmp.path());
        app.queue.push_back(press(KeyCode::Char('q')));
        app.process(Event::Resize {
            width: 80,
            height: 24,
        });
        assert!(app.engine().is_quitting());
        assert!(!app.engine().session().initialized);
        assert!(app.queue.is_empty());
    }

    #[test]
    fn test_translate_filters_releases() {
        let mut release = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(translate(TermEvent::Key(release)).is_none());
        assert!(matches!(
            translate(TermEvent::Resize(10, 5)),
            Some(Event::Resize {
                width: 10,
                height: 5
            })
        ));
    }

    #[test]
    fn test_translate_keeps_only_wheel() {
        let mouse = |kind| {
            TermEvent::Mouse(MouseEvent {
                kind,
                column: 3,
                row: 4,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert!(matches!(
            translate(mouse(MouseEventKind::ScrollDown)),
            Some(Event::Mouse(_))
        ));
        assert!(translate(mouse(MouseEventKind::Moved)).is_none());
        assert!(translate(mouse(MouseEventKind::Down(MouseButton::Left))).is_none());
    }
}
