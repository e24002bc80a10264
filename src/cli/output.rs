//! Colored terminal output.
//!
//! `colored` honours NO_COLOR and CLICOLOR_FORCE on its own. Diagnostics go
//! to stderr, everything a script might parse goes to stdout.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Outcome line for a command that changed the store.
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "ok".green().bold(), msg);
}

/// `Moved: 3, 4` style line; the verb is highlighted.
pub fn action(verb: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", verb.green(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Indented key/value line below a header.
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored, for ids, rendered trees and config dumps.
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
