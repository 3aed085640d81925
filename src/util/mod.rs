//! Terminal text helpers for the table output.
//!
//! - **Width**: Unicode-aware column counting, truncation and padding
//! - **Sanitizing**: stripping control characters from untrusted feed text
//!
//! # Examples
//!
//! ```
//! use feedmeta::util::{pad_to_width, strip_control_chars};
//!
//! let cell = pad_to_width(&strip_control_chars("\x1b[31mTitle\x1b[0m"), 8);
//! assert_eq!(cell, "Title   ");
//! ```

mod text;

pub use text::{display_width, pad_to_width, strip_control_chars, truncate_to_width};
