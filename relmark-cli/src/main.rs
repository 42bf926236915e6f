//! relmark - mark passages of a text file by relevance in the terminal

mod config;
mod io;
mod ui;

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use relmark_core::{App, Focus, InputTarget, Mode, RelevanceLevel};

/// Session-wide settings the key handlers need
struct Session {
    config: Config,
    relmark_dir: PathBuf,
}

fn main() -> Result<()> {
    // Get file path from args
    let args: Vec<String> = std::env::args().collect();
    let file_path = args.get(1);

    let relmark_dir = io::relmark_dir()?;
    let config = Config::load(&relmark_dir)?;
    init_logging(&relmark_dir, &config)?;
    tracing::info!(?config, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::with_default_level(config.default_level);

    // Load file if provided
    if let Some(path) = file_path {
        open_file(&mut app, path);
    } else {
        app.set_status("No file loaded. Press 'o' to open one.");
    }

    let session = Session { config, relmark_dir };

    // Main loop
    let res = run_app(&mut terminal, &mut app, &session);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        tracing::error!(error = %e, "exited with error");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Log to `<relmark_dir>/relmark.log`; the terminal belongs to the UI.
fn init_logging(relmark_dir: &Path, config: &Config) -> Result<()> {
    let log_path = relmark_dir.join("relmark.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("RELMARK_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("relmark=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

fn open_file(app: &mut App, path: &str) {
    match io::load_file(path) {
        Ok(doc) => {
            app.load_document(doc);
            app.set_status(&format!("Loaded {}", path));
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "load failed");
            app.set_status(&format!("Error: {}", e));
        }
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, session: &Session) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app, session.config.sidebar_width))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // Clear status on any key
            app.clear_status();

            match app.mode {
                Mode::Normal => handle_normal_mode(app, key.code, session),
                Mode::Visual => handle_visual_mode(app, key.code),
                Mode::Input => handle_input_mode(app, key.code),
                Mode::LevelPicker => handle_level_picker(app, key.code),
                Mode::Help => {
                    app.mode = Mode::Normal;
                }
            }
        }
    }
    Ok(())
}

fn handle_normal_mode(app: &mut App, code: KeyCode, session: &Session) {
    match code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.mode = Mode::Help,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            if app.focus == Focus::Editor {
                app.move_down();
            } else {
                app.next_annotation();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.focus == Focus::Editor {
                app.move_up();
            } else {
                app.prev_annotation();
            }
        }
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(),
        KeyCode::Char('w') => app.move_word_forward(),
        KeyCode::Char('b') => app.move_word_back(),
        KeyCode::Char('0') | KeyCode::Home => app.move_to_line_start(),
        KeyCode::Char('$') | KeyCode::End => app.move_to_line_end(),
        KeyCode::Char('g') => app.move_to_top(),
        KeyCode::Char('G') => app.move_to_bottom(),

        // Annotation navigation
        KeyCode::Char(']') => app.next_annotation(),
        KeyCode::Char('[') => app.prev_annotation(),

        // Visual mode
        KeyCode::Char('v') => app.enter_visual_mode(),

        // Annotation actions
        KeyCode::Char('c') => app.begin_edit_comment(),
        KeyCode::Char('d') => {
            app.delete_selected_annotation();
        }
        KeyCode::Char('X') => app.clear_annotations(),
        KeyCode::Char('s') => app.toggle_stats(),

        // Focus toggle
        KeyCode::Tab => app.toggle_focus(),

        // Export
        KeyCode::Char('e') => {
            if let Some(doc) = &app.document {
                match io::export_document(doc, &session.relmark_dir) {
                    Ok(path) => app.set_status(&format!("Exported to {}", path.display())),
                    Err(e) => app.set_status(&format!("Export failed: {}", e)),
                }
            }
        }

        // Open file
        KeyCode::Char('o') => {
            app.input_buffer.clear();
            app.input_target = InputTarget::FilePath;
            app.mode = Mode::Input;
        }

        _ => {}
    }
}

fn handle_visual_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_visual_mode(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            app.update_selection();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            app.update_selection();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.move_left();
            app.update_selection();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.move_right();
            app.update_selection();
        }
        KeyCode::Char('w') => {
            app.move_word_forward();
            app.update_selection();
        }
        KeyCode::Char('b') => {
            app.move_word_back();
            app.update_selection();
        }
        KeyCode::Char('$') | KeyCode::End => {
            app.move_to_line_end();
            app.update_selection();
        }
        KeyCode::Char('a') | KeyCode::Enter => app.start_annotation(),
        _ => {}
    }
}

fn handle_input_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => match app.input_target {
            InputTarget::Comment => {
                app.complete_comment();
            }
            InputTarget::FilePath => {
                let path = std::mem::take(&mut app.input_buffer);
                app.mode = Mode::Normal;
                open_file(app, path.trim());
            }
        },
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
        }
        _ => {}
    }
}

fn handle_level_picker(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Char('j') | KeyCode::Down => app.next_level(),
        KeyCode::Char('k') | KeyCode::Up => app.prev_level(),
        KeyCode::Enter => {
            app.choose_selected_level();
        }
        // Quick select
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.choose_level(RelevanceLevel::all()[index]);
        }
        _ => {}
    }
}
