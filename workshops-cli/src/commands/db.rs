//! Database management commands

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use sqlx::SqlitePool;
use workshops::{config::WorkshopsConfig, db};

/// Database command variants
pub enum DbCommand {
    /// Run pending migrations
    Migrate,
    /// Recreate the demo user and insert the demo workshops
    Seed,
    /// Drop everything, migrate and seed
    Reset {
        /// Skip the confirmation prompt
        confirmed: bool,
    },
}

impl DbCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or an operation on
    /// it fails.
    pub async fn execute(&self, config: &WorkshopsConfig) -> Result<()> {
        if let Self::Reset { confirmed: false } = self {
            if !Self::confirm_reset(&config.database.url)? {
                println!("{}", style("Reset cancelled").yellow());
                return Ok(());
            }
        }

        let pool = db::connect(&config.database)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;

        match self {
            Self::Migrate => Self::migrate(&pool).await,
            Self::Seed => Self::seed(&pool).await,
            Self::Reset { .. } => Self::reset(&pool).await,
        }
    }

    /// Run pending migrations
    async fn migrate(pool: &SqlitePool) -> Result<()> {
        println!(
            "{} {}",
            style("Running").green().bold(),
            style("database migrations...").bold()
        );

        db::migrate(pool).await.context("Failed to run migrations")?;

        println!("{}", style("✓ Migrations completed successfully!").green().bold());
        Ok(())
    }

    /// Insert demo data
    async fn seed(pool: &SqlitePool) -> Result<()> {
        let spinner = spinner()?;
        spinner.set_message("Seeding database...");

        let report = db::seed(pool).await.context("Failed to seed database")?;

        spinner.finish_and_clear();
        println!(
            "{} {} workshops, login as {}",
            style("✓ Seeded").green().bold(),
            report.workshops.len(),
            style(&report.user.email).cyan()
        );
        Ok(())
    }

    /// Drop the schema, migrate and seed
    async fn reset(pool: &SqlitePool) -> Result<()> {
        println!(
            "{} {}",
            style("Resetting").yellow().bold(),
            style("database...").bold()
        );
        println!();

        println!("  {} Dropping tables...", style("1.").cyan());
        db::drop_all(pool).await.context("Failed to drop tables")?;

        println!("  {} Running migrations...", style("2.").cyan());
        db::migrate(pool).await.context("Failed to run migrations")?;

        println!("  {} Seeding...", style("3.").cyan());
        let report = db::seed(pool).await.context("Failed to seed database")?;

        println!();
        println!(
            "{} ({} workshops)",
            style("✓ Database reset successfully!").green().bold(),
            report.workshops.len()
        );
        Ok(())
    }

    fn confirm_reset(url: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(format!("Delete all data in {url}?"))
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

fn spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}
