pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

/// Tick often enough that the thinking spinner animates smoothly.
const TICK_RATE_MS: u64 = 100;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
                app.poll_recommendation();
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Quit works from every mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => match app.current_view {
            app::View::Configurator => match key.code {
                KeyCode::Char('q') => app.should_quit = true,

                // Field navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_field(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_field(),

                // Option cycling
                KeyCode::Char('l') | KeyCode::Right => app.cycle_option(true),
                KeyCode::Char('h') | KeyCode::Left => app.cycle_option(false),

                KeyCode::Char('a') => app.adopt_recommendation(),
                KeyCode::Char('b') => app.show_breakdown(),
                KeyCode::Char('s') => app.save_design(),
                KeyCode::Tab => app.toggle_view(),
                KeyCode::Char('?') => app.show_help(),
                _ => {}
            },
            app::View::Leaderboard => match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
                KeyCode::Enter => app.pick_selected_row(),
                KeyCode::Tab => app.toggle_view(),
                KeyCode::Char('?') => app.show_help(),
                _ => {}
            },
        },
        app::InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.dismiss_breakdown(),
            // Keep editing while the breakdown is open so it updates live
            KeyCode::Char('j') | KeyCode::Down => app.next_field(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_field(),
            KeyCode::Char('l') | KeyCode::Right => app.cycle_option(true),
            KeyCode::Char('h') | KeyCode::Left => app.cycle_option(false),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
