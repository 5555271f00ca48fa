//! Message normalization for terminal display.
//!
//! One raw message becomes one logical block: surrounding newlines are
//! stripped and interior newlines and tabs collapsed so the block stays
//! contiguous. Messages that parse as JSON are pretty-printed with a
//! 4-space indent instead, one logical line per serialized line. Every
//! logical line is then hard-cut into width-sized chunks; there is no
//! word-boundary awareness.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

/// Split one raw message into display chunks of at most `width`
/// characters. Always yields at least one (possibly empty) chunk.
pub fn normalize(message: &str, width: usize) -> Vec<String> {
    // Degenerate terminals still make progress one character at a time.
    let width = width.max(1);
    let collapsed = collapse(message);

    logical_lines(&collapsed)
        .iter()
        .flat_map(|line| chunk_line(line, width))
        .collect()
}

fn collapse(message: &str) -> String {
    message
        .trim_matches('\n')
        .replace('\n', " ")
        .replace('\t', "  ")
}

/// JSON messages expand into the lines of their pretty-printed form;
/// anything that fails to parse stays a single raw line.
fn logical_lines(collapsed: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(collapsed) {
        Ok(value) => match pretty_print(&value) {
            Some(pretty) => pretty.lines().map(str::to_string).collect(),
            None => vec![collapsed.to_string()],
        },
        Err(_) => vec![collapsed.to_string()],
    }
}

fn pretty_print(value: &Value) -> Option<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(buf).ok()
}

fn chunk_line(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
