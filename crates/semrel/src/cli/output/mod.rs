//! Terminal styling for text reports

use std::fmt::Display;

use console::{style, StyledObject};

/// Title printed above a report
pub fn title(text: &str) -> StyledObject<&str> {
    style(text).bold().underlined()
}

/// Print one aligned `label: value` line of a report
pub fn field(label: &str, value: impl Display) {
    println!("  {:<18}{}", format!("{}:", label), value);
}

/// A version number, highlighted
pub fn version<D>(value: D) -> StyledObject<D> {
    style(value).green().bold()
}

/// A tag name
pub fn tag<D>(name: D) -> StyledObject<D> {
    style(name).yellow()
}

/// Report a step that completed
pub fn done(message: impl Display) {
    println!("{} {message}", style("✓").green());
}
