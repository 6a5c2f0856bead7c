//! Terminal styles for each kind of output line.

use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Currency amounts in report summaries
    pub money: Style,
}

impl Theme {
    /// Build the theme, with every style reset to plain text when `colored`
    /// is false.
    pub fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            header: pick(Style::new().cyan().bold()),
            success: pick(Style::new().green().bold()),
            error: pick(Style::new().red().bold()),
            warn: pick(Style::new().yellow().bold()),
            info: pick(Style::new().blue()),
            dim: pick(Style::new().dimmed()),
            money: pick(Style::new().green()),
        }
    }

    /// Colors when stdout is a terminal and `NO_COLOR`/`CLICOLOR` allow it
    pub fn detect() -> Self {
        Self::new(console::Term::stdout().is_term() && console::colors_enabled())
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

/// Format a currency amount with two decimals in the money style
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount).style(theme().money).to_string()
}
