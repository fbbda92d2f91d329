//! Visible-character rendering.
//!
//! Control and 8-bit bytes are shown in a printable form so that text can be
//! written to a terminal or log without side effects:
//!
//! | byte        | rendering            |
//! |-------------|----------------------|
//! | `\n`        | `<NL>`               |
//! | `\r`        | `<CR>`               |
//! | `0x1B`      | `<ESC>`              |
//! | space       | `<SPC>` with `SPACE` |
//! | other 7-bit | `^X` (`byte ^ 0x40`) |
//! | 8-bit       | `<hh>` or `<ooo>`    |

use bitflags::bitflags;

bitflags! {
    /// Options for [`viz_byte`].
    ///
    /// With neither base flag set, 8-bit bytes are shown in upper-case hex.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VizFlags: u8 {
        /// Show 8-bit bytes in octal (`<351>`). Wins over `LOWER_HEX`.
        const OCTAL = 0b0001;
        /// Show 8-bit bytes in lower-case hex (`<e9>`).
        const LOWER_HEX = 0b0010;
        /// Show the space character as `<SPC>`.
        const SPACE = 0b0100;
    }
}

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";

/// Append byte `b` to `out` in visible form.
pub fn viz_byte(b: u8, flags: VizFlags, out: &mut Vec<u8>) {
    match b {
        b'\n' => out.extend_from_slice(b"<NL>"),
        b'\r' => out.extend_from_slice(b"<CR>"),
        0x1B => out.extend_from_slice(b"<ESC>"),
        b' ' if flags.contains(VizFlags::SPACE) => out.extend_from_slice(b"<SPC>"),
        b' '..=b'~' => out.push(b),
        0..=0x7F => out.extend_from_slice(&[b'^', b ^ 0x40]),
        _ => {
            out.push(b'<');
            if flags.contains(VizFlags::OCTAL) {
                out.extend_from_slice(&[b'0' + (b >> 6), b'0' + ((b >> 3) & 7), b'0' + (b & 7)]);
            } else {
                let table = if flags.contains(VizFlags::LOWER_HEX) {
                    HEX_LOWER
                } else {
                    HEX_UPPER
                };
                out.extend_from_slice(&[table[usize::from(b >> 4)], table[usize::from(b & 0x0F)]]);
            }
            out.push(b'>');
        }
    }
}

/// Append every byte of `bytes` to `out` in visible form.
pub fn viz_bytes(bytes: &[u8], flags: VizFlags, out: &mut Vec<u8>) {
    for &b in bytes {
        viz_byte(b, flags, out);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
