//! OCR text cleanup.
//!
//! Raw OCR output reads badly when fed straight into speech synthesis:
//! punctuation turns into odd pauses and digit runs are rattled off as one
//! breathless number.  [`clean_text`] normalises the text for prosody and
//! [`clean_file`] rewrites the text artifact in place between the OCR and
//! speech stages.

pub mod clean;

pub use clean::{clean_file, clean_text};
