//! Terminal dashboard for administering business records
//!
//! One list screen is mounted at a time; switching sections through the
//! sidebar remounts it and moves the query subscription to the new key.

pub mod app;
pub mod components;
pub mod screens;
pub mod traits;
pub mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

pub use app::App;

use crate::api::RemoteApi;
use crate::config::Config;

/// Set up the terminal, run the dashboard and restore the terminal
pub async fn run(config: &Config, api: Arc<dyn RemoteApi>) -> Result<()> {
    let mut app = App::new(config, api)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("Dashboard exited successfully"),
        Err(e) => error!("Dashboard encountered an error: {}", e),
    }
    result
}
