//! Decoding of the compact bitmap font format and folding of UTF-8 text into font codepoints.
//!
//! A font blob starts with a 4 byte header `{width (unused), glyph height, first codepoint,
//! glyph count}`, followed by one 4 byte jump table entry per glyph
//! `{offset high, offset low, byte size, pixel width}`, followed by the packed glyph bitmaps.
//! Glyph bitmaps use the same column-major page layout as `PixelBuffer`: each column is
//! `ceil(height / 8)` bytes, LSB on top. Trailing empty columns may be omitted, which is why the
//! jump table carries the byte size separately from the pixel width.

const HEIGHT_POS: usize = 1;
const FIRST_CHAR_POS: usize = 2;
const CHAR_NUM_POS: usize = 3;
const JUMPTABLE_START: usize = 4;
const JUMPTABLE_BYTES: usize = 4;

/// Jump table offset bytes marking a glyph with no bitmap.
const NOT_DRAWABLE: u8 = 0xFF;

/// A bitmap font backed by a borrowed font blob.
#[derive(Clone, Copy, Debug)]
pub struct Font<'a> {
    data: &'a [u8],
}

/// One decoded jump table entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Glyph<'a> {
    /// Horizontal advance in pixels.
    pub width: u8,
    /// Packed bitmap, `None` for codepoints that advance the cursor without drawing.
    pub bitmap: Option<&'a [u8]>,
}

impl<'a> Font<'a> {
    /// Wrap a font blob. Returns `None` if the blob is too short to hold its header and jump
    /// table.
    pub fn new(data: &'a [u8]) -> Option<Self> {
        if data.len() < JUMPTABLE_START {
            return None;
        }
        let count = data[CHAR_NUM_POS] as usize;
        if data.len() < JUMPTABLE_START + count * JUMPTABLE_BYTES {
            return None;
        }
        Some(Font { data })
    }

    /// Glyph height in pixels, which is also the line height.
    pub fn height(&self) -> u8 {
        self.data[HEIGHT_POS]
    }

    pub fn first_char(&self) -> u8 {
        self.data[FIRST_CHAR_POS]
    }

    pub fn char_count(&self) -> u8 {
        self.data[CHAR_NUM_POS]
    }

    /// Look up the glyph for a font codepoint. Codepoints outside
    /// `first_char..first_char + char_count` have no glyph and yield `None`.
    pub fn glyph(&self, code: u8) -> Option<Glyph<'a>> {
        let index = code.checked_sub(self.first_char())? as usize;
        if index >= self.char_count() as usize {
            return None;
        }
        let entry = JUMPTABLE_START + index * JUMPTABLE_BYTES;
        let (msb, lsb) = (self.data[entry], self.data[entry + 1]);
        let size = self.data[entry + 2] as usize;
        let width = self.data[entry + 3];

        let bitmap = if msb == NOT_DRAWABLE && lsb == NOT_DRAWABLE {
            None
        } else {
            let start = JUMPTABLE_START
                + self.char_count() as usize * JUMPTABLE_BYTES
                + ((msb as usize) << 8 | lsb as usize);
            // A truncated blob leaves the glyph undrawable rather than reading past the end.
            self.data.get(start..start + size)
        };
        Some(Glyph { width, bitmap })
    }

    /// Horizontal advance of a codepoint, zero when the font has no glyph for it.
    pub fn advance(&self, code: u8) -> u16 {
        self.glyph(code).map_or(0, |g| g.width as u16)
    }
}

/// State carried between bytes by a font table lookup: the previous non-ASCII byte.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Utf8Fold {
    last: u8,
}

/// Maps one input byte to a font codepoint, or `None` if the byte is to be dropped.
pub type FontTableLookup = fn(&mut Utf8Fold, u8) -> Option<u8>;

/// The default lookup: ASCII passes through, two byte UTF-8 sequences for Latin-1 are folded to
/// their single byte code (`C2 xx` to `xx`, `C3 xx` to `xx | 0xC0`), the Euro sign's trailing
/// `82 AC` maps to `0x80`, and every other non-ASCII byte is dropped.
pub fn utf8_latin1(fold: &mut Utf8Fold, ch: u8) -> Option<u8> {
    if ch < 0x80 {
        fold.last = 0;
        return Some(ch);
    }

    let last = fold.last;
    fold.last = ch;

    match last {
        0xC2 => Some(ch),
        0xC3 => Some(ch | 0xC0),
        0x82 if ch == 0xAC => Some(0x80),
        _ => None,
    }
}

/// Run `text` through `lookup` with fresh state, yielding font codepoints.
pub fn decode<'t>(text: &'t str, lookup: FontTableLookup) -> impl Iterator<Item = u8> + 't {
    text.bytes()
        .scan(Utf8Fold::default(), move |fold, b| Some(lookup(fold, b)))
        .flatten()
}
