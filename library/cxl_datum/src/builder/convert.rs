//! Converting puts: quoting, escaping and visible-character forms.

use bitflags::bitflags;
use cxl_text::{escape_byte, viz_byte, VizFlags};

use super::{Builder, FabMode};
use crate::errors::{invalid_argument, invalid_operation, DatumResult};

bitflags! {
    /// Conversions applied by [`Builder::put_converted`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ConvFlags: u16 {
        /// Show control and 8-bit bytes in visible form.
        const VIZ = 0x0001;
        /// Backslash-escape control bytes, DEL and backslash.
        const ESCAPE = 0x0002;
        /// Surround with `"`, escaping embedded `"` and `\`.
        const DQUOTE = 0x0004;
        /// Surround with `'`, escaping embedded `'` and `\`.
        const SQUOTE = 0x0008;
        /// Visible 8-bit bytes in octal.
        const OCTAL = 0x0010;
        /// Visible 8-bit bytes in lower-case hex.
        const LOWER_HEX = 0x0020;
        /// Visible space as `<SPC>`.
        const SHOW_SPACE = 0x0040;
    }
}

impl ConvFlags {
    pub fn from_viz(flags: VizFlags) -> Self {
        let mut conv = ConvFlags::empty();
        conv.set(ConvFlags::OCTAL, flags.contains(VizFlags::OCTAL));
        conv.set(ConvFlags::LOWER_HEX, flags.contains(VizFlags::LOWER_HEX));
        conv.set(ConvFlags::SHOW_SPACE, flags.contains(VizFlags::SPACE));
        conv
    }

    pub fn viz_flags(self) -> VizFlags {
        let mut viz = VizFlags::empty();
        viz.set(VizFlags::OCTAL, self.contains(ConvFlags::OCTAL));
        viz.set(VizFlags::LOWER_HEX, self.contains(ConvFlags::LOWER_HEX));
        viz.set(VizFlags::SPACE, self.contains(ConvFlags::SHOW_SPACE));
        viz
    }

    fn quote_byte(self) -> Option<u8> {
        if self.contains(ConvFlags::DQUOTE) {
            Some(b'"')
        } else if self.contains(ConvFlags::SQUOTE) {
            Some(b'\'')
        } else {
            None
        }
    }
}

impl Builder<'_> {
    /// Put `bytes` with the conversions in `flags` applied.
    ///
    /// Conversions are tried in order for each byte: quote escaping, then
    /// backslash escaping, then visible form. A byte no conversion claims is
    /// put as is. Converted output is multi-byte, so prepend mode is not
    /// supported.
    pub fn put_converted(&mut self, bytes: &[u8], flags: ConvFlags) -> DatumResult<()> {
        if self.mode == FabMode::Prepend {
            return Err(invalid_operation("converted puts are not supported when prepending"));
        }
        if flags.contains(ConvFlags::DQUOTE | ConvFlags::SQUOTE) {
            return Err(invalid_argument("DQUOTE and SQUOTE are mutually exclusive"));
        }

        let quote = flags.quote_byte();
        let viz = flags.viz_flags();
        let mut out = Vec::with_capacity(bytes.len() + 2);
        if let Some(q) = quote {
            out.push(q);
        }
        for &b in bytes {
            if quote.is_some_and(|q| b == q || b == b'\\') {
                out.extend_from_slice(&[b'\\', b]);
            } else if flags.contains(ConvFlags::ESCAPE) && (b < 0x20 || b == 0x7F || b == b'\\') {
                escape_byte(b, &mut out);
            } else if flags.contains(ConvFlags::VIZ) && needs_viz(b, viz) {
                viz_byte(b, viz, &mut out);
            } else {
                out.push(b);
            }
        }
        if let Some(q) = quote {
            out.push(q);
        }
        self.put_bytes(&out)
    }
}

fn needs_viz(b: u8, viz: VizFlags) -> bool {
    match b {
        b' ' => viz.contains(VizFlags::SPACE),
        b'!'..=b'~' => false,
        _ => true,
    }
}
