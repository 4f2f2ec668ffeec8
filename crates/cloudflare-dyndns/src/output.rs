//! Terminal output helpers.
//!
//! Command results go to stdout. Errors go to stderr in red; warnings are
//! printed in yellow. Colors are dropped when the stream is not a terminal
//! or `NO_COLOR` is set.

use std::fmt::Display;
use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

/// Whether a stream should receive ANSI colors
fn should_color(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os("NO_COLOR").is_none()
}

fn paint_red(message: &str, color: bool) -> String {
    if color {
        message.red().to_string()
    } else {
        message.to_string()
    }
}

fn paint_yellow(message: &str, color: bool) -> String {
    if color {
        message.yellow().to_string()
    } else {
        message.to_string()
    }
}

/// Print an error line to stderr
pub fn error(message: impl Display) {
    let color = should_color(io::stderr().is_terminal());
    eprintln!("{}", paint_red(&message.to_string(), color));
}

/// Print a warning line to stdout
pub fn warning(message: impl Display) {
    let color = should_color(io::stdout().is_terminal());
    println!("{}", paint_yellow(&message.to_string(), color));
}

/// Print a plain line to stdout
pub fn line(message: impl Display) {
    println!("{message}");
}

/// Render rows as a borderless, column-aligned table
pub fn table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::blank()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "NAME")]
        name: &'static str,
        #[tabled(rename = "IP")]
        ip: &'static str,
    }

    #[test]
    fn plain_when_color_disabled() {
        assert_eq!(paint_red("Error: boom", false), "Error: boom");
        assert_eq!(paint_yellow("Warning", false), "Warning");
    }

    #[test]
    fn ansi_when_color_enabled() {
        let painted = paint_red("Error: boom", true);

        assert!(painted.contains("Error: boom"));
        assert!(painted.starts_with("\u{1b}["));
    }

    #[test]
    fn non_terminal_never_colors() {
        assert!(!should_color(false));
    }

    #[test]
    fn table_has_header_and_rows() {
        let rendered = table(&[
            Row {
                name: "home.example.com",
                ip: "1.1.1.1",
            },
            Row {
                name: "v6.example.com",
                ip: "2001:db8::1",
            },
        ]);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("NAME") && lines[0].contains("IP"));
        assert!(lines[1].contains("home.example.com"));
        assert!(lines[2].contains("2001:db8::1"));
    }
}
