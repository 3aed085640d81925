use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Number of terminal columns `s` occupies (CJK and emoji count as two).
///
/// ```
/// use feedmeta::util::display_width;
///
/// assert_eq!(display_width("views"), 5);
/// assert_eq!(display_width("小明"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cuts `s` so it fits in `max_width` columns.
///
/// When there is room for more than the ellipsis, a cut string ends in
/// `...`; narrower limits just keep as many leading characters as fit.
/// Strings that already fit come back borrowed.
///
/// ```
/// use feedmeta::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Pixel 8 Pro", 20), "Pixel 8 Pro");
/// assert_eq!(truncate_to_width("Pixel 8 Pro", 8), "Pixel...");
/// assert_eq!(truncate_to_width("Pixel", 2), "Pi");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let with_ellipsis = max_width > ELLIPSIS_WIDTH;
    let budget = if with_ellipsis {
        max_width - ELLIPSIS_WIDTH
    } else {
        max_width
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    let mut out = s[..end].to_string();
    if with_ellipsis {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Truncates `s` to `width` columns, then right-pads it with spaces to
/// exactly `width` columns.
///
/// A double-width character that would straddle the edge is dropped, so the
/// result can need one extra space of padding.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let cut = truncate_to_width(s, width);
    let fill = width.saturating_sub(display_width(&cut));
    let mut out = String::with_capacity(cut.len() + fill);
    out.push_str(&cut);
    out.extend(std::iter::repeat(' ').take(fill));
    out
}

/// Removes terminal control characters and ANSI escape sequences.
///
/// Feed titles and author names are user-supplied and get printed straight
/// to the terminal. Dropped: C0 controls other than tab, newline and
/// carriage return; DEL; CSI sequences (`ESC [` up to a final byte in
/// `@`..=`~`); OSC sequences (`ESC ]` up to BEL or `ESC \`); any other ESC.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_stripped(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    c == '\x7f' || (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r'))
}
