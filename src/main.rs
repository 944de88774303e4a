//! puzzlelab - terminal editor shell for tile puzzle games
//!
//! A TUI for writing, running, and managing small puzzle game sources.
//!
//! Features:
//! - Code pane with folded asset literals (bitmaps, tunes, maps)
//! - Saved games menu with open, delete, save, and share
//! - Built-in lessons with a "next" shortcut
//! - Asset editor overlay
//!
//! Usage: puzzlelab [--data-dir <DIR>]

mod app;
mod challenges;
mod config;
mod dispatch;
mod editor;
mod state;
mod store;
mod template;
mod types;
mod ui;
mod view;

use anyhow::{bail, Context, Result};
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;
use store::FileStore;
use ui::HitMap;

fn main() -> Result<()> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("puzzlelab {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let data_dir = match data_dir_arg(&args) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    // Run the application
    let result = run_app(data_dir);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Value of `--data-dir`, if given
fn data_dir_arg(args: &[String]) -> Result<Option<PathBuf>> {
    match args.iter().position(|a| a == "--data-dir") {
        Some(i) => match args.get(i + 1) {
            Some(dir) if !dir.starts_with('-') => Ok(Some(PathBuf::from(dir))),
            _ => bail!("--data-dir needs a directory"),
        },
        None => Ok(None),
    }
}

fn print_help() {
    println!(
        r#"puzzlelab - editor for tile puzzle games

USAGE:
    puzzlelab [OPTIONS]

OPTIONS:
    --data-dir <DIR>  Where saved games are kept
    -h, --help        Print help information
    -v, --version     Print version information

KEYBINDINGS:
    F5 / Ctrl-R      Run the game
    Ctrl-S           Save
    Ctrl-N           New game
    Ctrl-E           Edit the asset under the cursor
    Ctrl-L           Next lesson
    F1               Open/close help
    F2               Rename
    F9               Cycle theme
    Esc              Close menus and the asset editor
    Ctrl-Q           Quit

MOUSE:
    Click menu items, saved games, and folded assets

CONFIG:
    ~/.config/puzzlelab/config.toml
"#
    );
}

fn run_app(data_dir: Option<PathBuf>) -> Result<()> {
    // Load configuration
    let config = config::Config::load().context("Failed to load configuration")?;

    let data_dir = match data_dir.or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => FileStore::default_dir().context("Failed to find a data directory")?,
    };
    eprintln!("Data directory: {}", data_dir.display());

    // Create application state
    eprintln!("Loading saved games...");
    let store = FileStore::new(&data_dir);
    let mut app = App::new(config, Box::new(store), data_dir);
    eprintln!("Saved games: {}", app.state.saved_games.len());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run main loop
    let result = main_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Render UI
        let view = app.view();
        let mut hits = HitMap::default();
        terminal.draw(|frame| {
            hits = ui::render(frame, app, &view);
        })?;
        app.after_render(view, hits)?;

        // Flash expiry and share label reset
        app.tick()?;

        // Poll for events with timeout (for timer updates)
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key)?,
                Event::Mouse(mouse) => app.handle_mouse(mouse)?,
                _ => {}
            }
        }

        // Check if should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_help_does_not_panic() {
        print_help();
    }

    #[test]
    fn test_data_dir_arg() {
        assert_eq!(data_dir_arg(&args(&["puzzlelab"])).unwrap(), None);
        assert_eq!(
            data_dir_arg(&args(&["puzzlelab", "--data-dir", "/tmp/games"])).unwrap(),
            Some(PathBuf::from("/tmp/games"))
        );
        assert!(data_dir_arg(&args(&["puzzlelab", "--data-dir"])).is_err());
        assert!(data_dir_arg(&args(&["puzzlelab", "--data-dir", "-h"])).is_err());
    }
}
