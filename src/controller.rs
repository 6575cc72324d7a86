//! Viewer controller.
//!
//! This module orchestrates the viewer loop:
//! - Terminal initialization and cleanup
//! - Event polling and handling
//! - State updates and rendering

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::model::AppState;
use crate::ui::{calculate_visible_columns, render};

/// The comparison viewer.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Sets up the terminal and creates the viewer.
    pub fn new(state: AppState) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the viewer loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        self.update_viewport_size()?;

        loop {
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event, &self.state.mode);

                if let Action::Resize(_, _) = action {
                    self.update_viewport_size()?;
                }

                if !apply_action(&mut self.state, action) {
                    break;
                }
            }
        }

        Ok(())
    }

    fn update_viewport_size(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        self.state.update_viewport_size(calculate_visible_columns(size.width));
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Opens the viewer on a comparison and blocks until it is closed.
pub fn run_viewer(state: AppState) -> Result<()> {
    log::debug!(
        "Opening viewer on {} columns, {} mutation(s)",
        state.alignment_length(),
        state.comparison.alignment.mutation_count()
    );
    let mut app = App::new(state)?;
    app.run()
}
