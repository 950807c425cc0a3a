mod app;
mod models;
mod store;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use store::SimStore;

#[derive(Parser, Debug)]
#[command(name = "simboard")]
#[command(version = "0.1.0")]
#[command(about = "A terminal dashboard for managing simulation records")]
struct Args {
    /// Print the simulation collection as JSON
    #[arg(short, long)]
    list: bool,

    /// Add a simulation with the given name and exit
    #[arg(short, long)]
    add: Option<String>,

    /// Remove the simulation with the given id and exit
    #[arg(short, long)]
    remove: Option<u64>,

    /// Use an alternate data file
    #[arg(long)]
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let path = match args.data {
        Some(path) => path,
        None => SimStore::default_path()?,
    };
    let store = SimStore::load(path)?;

    // Handle CLI-only commands
    if args.list {
        return print_list(&store);
    }

    if let Some(name) = args.add {
        return add_simulation(store, &name);
    }

    if let Some(id) = args.remove {
        return remove_simulation(store, id);
    }

    // Run TUI
    run_tui(store)
}

fn print_list(store: &SimStore) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(store.simulations())?);
    Ok(())
}

fn add_simulation(mut store: SimStore, name: &str) -> Result<()> {
    let id = store.add(name, "ready")?;
    println!("Added simulation {} ({})", id, name);
    Ok(())
}

fn remove_simulation(mut store: SimStore, id: u64) -> Result<()> {
    let removed = store.remove(id)?;
    println!("Removed simulation {} ({})", id, removed.name);
    Ok(())
}

fn run_tui(store: SimStore) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c')
                        if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                    {
                        return Ok(())
                    }
                    _ => {
                        // Handle key and catch any errors to prevent crashes
                        if let Err(e) = app.handle_key(key) {
                            app.status_message = Some(format!("Error: {}", e));
                        }
                    }
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        app.tick();
    }
}
