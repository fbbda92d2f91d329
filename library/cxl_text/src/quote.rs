//! Shell-style single quoting.

/// Append `src` to `out` quoted for a POSIX shell.
///
/// Runs without an apostrophe are wrapped in single quotes; each apostrophe
/// becomes `\'` outside the quotes. An empty input produces `''`.
///
/// ```
/// let mut out = Vec::new();
/// cxl_text::shell_quote(b"it's", &mut out);
/// assert_eq!(out, b"'it'\\''s'");
/// ```
pub fn shell_quote(src: &[u8], out: &mut Vec<u8>) {
    if src.is_empty() {
        out.extend_from_slice(b"''");
        return;
    }

    let mut rest = src;
    while let Some(&first) = rest.first() {
        if first == b'\'' {
            out.extend_from_slice(b"\\'");
            rest = &rest[1..];
            continue;
        }
        let run = rest.iter().position(|&b| b == b'\'').unwrap_or(rest.len());
        out.push(b'\'');
        out.extend_from_slice(&rest[..run]);
        out.push(b'\'');
        rest = &rest[run..];
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
