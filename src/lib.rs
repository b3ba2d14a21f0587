/*!
Parses TrueType fonts and subsets them down to the glyphs a document
actually uses.

The crate is split into two halves that share the per-table modules:

- [`Face`] parses a raw `.ttf` buffer into a queryable view: character to
  glyph lookup, per-glyph metrics, name records and whole-string
  measurement. Parsing is all-or-nothing; a `Face` you hold is fully valid.
- [`Subsetter`] collects the characters a document renders, resolves the
  glyph closure (composite glyphs pull in their components) and emits a
  fresh, internally consistent TrueType file containing only those glyphs.

# Example

```no_run
# fn main() -> Result<(), Box<dyn std::error::Error>> {
let data = std::fs::read("NotoSans-Regular.ttf")?;
let face = fontslice::Face::parse(&data)?;

let mut subsetter = fontslice::Subsetter::new(&face);
subsetter.add_string("Hello, world!");
let subset = subsetter.generate()?;

std::fs::write("NotoSans-Subset.ttf", subset)?;
# Ok(())
# }
```

The emitted font keeps the original design-unit metrics for every retained
glyph, so widths measured against the original [`Face`] stay valid for the
subset. Glyph IDs are reassigned densely, with `.notdef` pinned at 0.
*/

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod cmap;
mod face;
mod glyf;
mod head;
mod hhea;
mod hmtx;
mod maxp;
mod name;
mod post;
mod stream;
mod subset;

pub use face::{BBox, Face, GlyphMetrics};
pub use subset::{SubsetStats, Subsetter};

use crate::stream::{Reader, Structure, Writer};
use std::fmt::{self, Debug, Display, Formatter};

/// What kind of outlines the font carries.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FontKind {
    /// TrueType outlines.
    TrueType,
    /// CFF outlines.
    Cff,
    /// A font collection.
    Collection,
}

impl Structure<'_> for FontKind {
    fn read(r: &mut Reader) -> Result<Self> {
        match r.read::<u32>()? {
            0x00010000 | 0x74727565 => Ok(FontKind::TrueType),
            0x4F54544F => Ok(FontKind::Cff),
            0x74746366 => Ok(FontKind::Collection),
            _ => Err(Error::UnknownKind),
        }
    }

    fn write(&self, w: &mut Writer) {
        w.write::<u32>(match self {
            FontKind::TrueType => 0x00010000,
            FontKind::Cff => 0x4F54544F,
            FontKind::Collection => 0x74746366,
        })
    }
}

/// A 4-byte OpenType tag.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub(crate) const CMAP: Self = Self(*b"cmap");
    pub(crate) const GLYF: Self = Self(*b"glyf");
    pub(crate) const HEAD: Self = Self(*b"head");
    pub(crate) const HHEA: Self = Self(*b"hhea");
    pub(crate) const HMTX: Self = Self(*b"hmtx");
    pub(crate) const LOCA: Self = Self(*b"loca");
    pub(crate) const MAXP: Self = Self(*b"maxp");
    pub(crate) const NAME: Self = Self(*b"name");
    pub(crate) const POST: Self = Self(*b"post");
}

impl Structure<'_> for Tag {
    fn read(r: &mut Reader) -> Result<Self> {
        r.read::<[u8; 4]>().map(Self)
    }

    fn write(&self, w: &mut Writer) {
        w.write::<[u8; 4]>(self.0)
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(std::str::from_utf8(&self.0).unwrap_or("..."))
    }
}

/// Locates a table in the font file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl Structure<'_> for TableRecord {
    fn read(r: &mut Reader) -> Result<Self> {
        Ok(TableRecord {
            tag: r.read::<Tag>()?,
            checksum: r.read::<u32>()?,
            offset: r.read::<u32>()?,
            length: r.read::<u32>()?,
        })
    }

    fn write(&self, w: &mut Writer) {
        w.write::<Tag>(self.tag);
        w.write::<u32>(self.checksum);
        w.write::<u32>(self.offset);
        w.write::<u32>(self.length);
    }
}

/// Calculate a checksum over the sliced data as a sum of big-endian u32s.
/// If the data length is not a multiple of four, it is treated as if padded
/// with zeros to a length that is a multiple of four.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut bytes = [0; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(bytes));
    }
    sum
}

/// The result type for everything.
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing failed because the font face is malformed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// The file contains an unknown or unsupported kind of font.
    UnknownKind,
    /// An offset pointed outside of the data.
    InvalidOffset,
    /// Parsing expected more data.
    MissingData,
    /// Parsed data was invalid.
    InvalidData,
    /// A required table is missing.
    MissingTable(Tag),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnknownKind => f.pad("unknown font kind"),
            Self::InvalidOffset => f.pad("invalid offset"),
            Self::MissingData => f.pad("missing more data"),
            Self::InvalidData => f.pad("invalid data"),
            Self::MissingTable(tag) => write!(f, "missing {tag} table"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_pads_with_zeros() {
        // 0x00010203 + 0x04050000
        assert_eq!(checksum(&[0, 1, 2, 3, 4, 5]), 0x00010203 + 0x04050000);
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[0xFF; 8]), 0xFFFFFFFFu32.wrapping_add(0xFFFFFFFF));
    }

    #[test]
    fn error_display_names_the_table() {
        assert_eq!(Error::MissingTable(Tag::HMTX).to_string(), "missing hmtx table");
    }
}
