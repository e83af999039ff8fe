//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::time::Duration;

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Format one timing line: ` <title>: <seconds> seconds`.
pub fn timing_line(title: &str, elapsed: Duration) -> String {
    format!(" {}: {:.3e} seconds", title, elapsed.as_secs_f64())
}

/// Print one timing line followed by the dimmed result.
pub fn timing(title: &str, elapsed: Duration, result: f64) {
    println!(
        "{}  {}",
        timing_line(title, elapsed),
        format!("(= {result})").dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_line_uses_seconds() {
        let line = timing_line("bottom-up", Duration::from_millis(1500));
        assert_eq!(line, " bottom-up: 1.500e0 seconds");
    }
}
