//! String helpers for log lines and terminal output.
//!
//! Model replies and tool observations can be long and multi-line; these
//! helpers shorten them without slicing inside a multibyte character.

/// Collapse runs of whitespace (newlines included) into single spaces.
pub fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `n` characters of `s` on one line, with `...` when cut.
pub fn preview(s: &str, n: usize) -> String {
    let flat = one_line(s);
    if flat.chars().count() <= n {
        return flat;
    }
    let mut prefix: String = flat.chars().take(n).collect();
    prefix.push_str("...");
    prefix
}
