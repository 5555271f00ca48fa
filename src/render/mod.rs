//! Terminal rendering of log event blocks.
//!
//! Each event is one block: a blue, left-justified 21-column timestamp
//! followed by the first wrapped chunk, then every further chunk behind
//! a 21-space gutter. Status text is printed dimmed with a trailing
//! carriage return so the next block overwrites it in place.

use std::io::{self, Write};

use colored::Colorize;

use crate::normalizer;
use crate::store::LogEvent;

pub const TIMESTAMP_COL_WIDTH: usize = 21;
const FALLBACK_TERMINAL_WIDTH: usize = 80;

pub struct Renderer {
    terminal_width: usize,
}

impl Renderer {
    /// Detect the terminal width once; piped output falls back to 80
    /// columns.
    pub fn new() -> Self {
        let terminal_width = crossterm::terminal::size()
            .map(|(columns, _)| columns as usize)
            .unwrap_or(FALLBACK_TERMINAL_WIDTH);
        Self::with_width(terminal_width)
    }

    pub fn with_width(terminal_width: usize) -> Self {
        Self { terminal_width }
    }

    /// Columns left for message text next to the timestamp gutter.
    pub fn message_width(&self) -> usize {
        self.terminal_width
            .saturating_sub(TIMESTAMP_COL_WIDTH)
            .max(1)
    }

    pub fn print_event(&self, event: &LogEvent) {
        let mut chunks = normalizer::normalize(&event.message, self.message_width()).into_iter();

        let timestamp = format!(
            "{:<width$}",
            event.display_timestamp(),
            width = TIMESTAMP_COL_WIDTH
        );
        let first = chunks.next().unwrap_or_default();
        println!("{}{}", timestamp.blue(), first);

        for chunk in chunks {
            println!("{}{}", " ".repeat(TIMESTAMP_COL_WIDTH), chunk);
        }
    }

    /// Transient status on the current line; the cursor returns to the
    /// start of the line so the next block replaces it.
    pub fn print_status(&self, text: &str) {
        print!("{}\r", text.dimmed());
        let _ = io::stdout().flush();
    }

    pub fn print_line(&self, text: &str) {
        println!("{text}");
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_width_subtracts_timestamp_column() {
        assert_eq!(Renderer::with_width(30).message_width(), 9);
        assert_eq!(Renderer::with_width(80).message_width(), 59);
    }

    #[test]
    fn test_message_width_floor_on_narrow_terminal() {
        assert_eq!(Renderer::with_width(0).message_width(), 1);
        assert_eq!(Renderer::with_width(21).message_width(), 1);
    }
}
