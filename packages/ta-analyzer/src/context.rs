//! Application context with shared state and output helpers

use analyzer_core::{CategoryCount, Place, Session};
use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::config::Config;

/// Application context passed to all commands
pub struct AppContext {
    pub config: Config,
    pub quiet: bool,
    pub session: Session,
}

impl AppContext {
    /// Start a session on `place` with the configured radius.
    pub fn new(config: Config, place: Place, quiet: bool) -> Self {
        let session = Session::new(place, config.search.radius_m);
        Self {
            config,
            quiet,
            session,
        }
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    /// Soft warnings (e.g. nothing found) are shown even in quiet mode.
    pub fn print_warning(&self, msg: &str) {
        eprintln!("{}", style(msg).yellow());
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{}", style(msg).red().bold());
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }

    /// Print `"<category>: <count>"` rows, longest label padded.
    pub fn print_counts(&self, counts: &CategoryCount) {
        if counts.is_empty() {
            self.print_warning("No amenities recorded yet.");
            return;
        }
        let width = counts.labels().map(|l| l.chars().count()).max().unwrap_or(0);
        for (label, n) in counts.iter() {
            println!("  {:<width$}  {}", label, style(n).bold(), width = width);
        }
        println!("  {:<width$}  {}", "total", counts.total(), width = width);
    }
}
