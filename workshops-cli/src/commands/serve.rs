//! Web server command

use anyhow::{Context, Result};
use console::style;
use workshops::{app, config::WorkshopsConfig, state::AppState};

/// Start the web server
pub struct ServeCommand {
    config: WorkshopsConfig,
}

impl ServeCommand {
    /// Create a new command instance
    pub const fn new(config: WorkshopsConfig) -> Self {
        Self { config }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the listener
    /// fails.
    pub async fn execute(self) -> Result<()> {
        let address = self.config.bind_address();

        let state = AppState::connect(self.config)
            .await
            .context("Failed to prepare application state")?;

        println!(
            "{} {}",
            style("Serving").green().bold(),
            style(format!("http://{address}")).cyan().bold()
        );
        println!("{}", style("Press Ctrl-C to stop").dim());
        println!();

        app::serve(state).await.context("Server stopped with an error")?;

        println!("{}", style("✓ Server stopped").green().bold());
        Ok(())
    }
}
