//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Data goes to
//! stdout uncolored so listings stay pipeable; diagnostics go to stderr.

use std::fmt::Display;

use colored::Colorize;

use crate::domain::Card;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Section title of a `check` report with its item count
pub fn section(title: &str, count: usize) {
    println!("{} ({})", title.cyan().bold(), count);
}

/// One problem inside a report section
pub fn finding(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

/// Labelled value, e.g. a config path
pub fn entry(label: &str, value: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), value);
}

/// Tab-separated card row: id, field, layer and link target if any
pub fn card(card: &Card) {
    match card.link() {
        Some(target) => println!("{}\t{}\t{}\t-> {}", card.id, card.field, card.layer, target),
        None => println!("{}\t{}\t{}", card.id, card.field, card.layer),
    }
}

/// Print plain data (no color)
pub fn data(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
