//! Prosody-oriented text normalisation.
//!
//! Three transformations, applied per line:
//!
//! 1. a space is appended after every ASCII digit, so `123` is read
//!    "one two three" instead of "one hundred twenty-three";
//! 2. every ASCII punctuation character becomes a space;
//! 3. a blank line follows each line, giving the synthesiser a breathing
//!    pause between lines.
//!
//! `"Hello, World! 123"` therefore becomes `"Hello  World  1 2 3 \n\n"`.

use std::io;
use std::path::Path;

/// Normalise `input` for speech synthesis.
///
/// ```
/// use pi_text_reader::text::clean_text;
///
/// assert_eq!(clean_text("Hello, World! 123"), "Hello  World  1 2 3 \n\n");
/// assert_eq!(clean_text("no changes"), "no changes\n\n");
/// ```
pub fn clean_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        for ch in line.chars() {
            if ch.is_ascii_digit() {
                out.push(ch);
                out.push(' ');
            } else if ch.is_ascii_punctuation() {
                out.push(' ');
            } else {
                out.push(ch);
            }
        }

        // Blank line after every line, whether or not the source line
        // carried its own newline.
        out.push_str("\n\n");
    }

    out
}

/// Rewrite the text artifact at `path` in place with [`clean_text`].
pub fn clean_file(path: &Path) -> io::Result<()> {
    let raw = std::fs::read_to_string(path)?;
    std::fs::write(path, clean_text(&raw))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
