// hurlview: browse request files and view their output side by side

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use hurlview::config::Config;
use hurlview::logging;
use hurlview::runner::SystemRunner;
use hurlview::ui::{App, Engine};

fn main() -> Result<()> {
    // The event log is opt-in; failing to open it is a misconfiguration
    match logging::init_from_env() {
        Ok(true) => tracing::info!("event log enabled"),
        Ok(false) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let config = Config::load();
    tracing::debug!(?config, "configuration loaded");

    let engine = Engine::new(&config, Box::new(SystemRunner));
    let mut app = App::new(engine);

    // Set up terminal
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("switch to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal backend")?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;

    if let Err(err) = res {
        eprintln!("could not run program: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
