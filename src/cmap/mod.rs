//! The `cmap` table maps character codes to glyph indices.
//!
//! On the parse side, every subtable listed in the header is decoded and
//! merged into one map, in header order, so later subtables win for
//! duplicate characters. A malformed subtable is logged and skipped; an
//! unrecognized format is skipped silently. A font where no subtable
//! survives simply supports no characters.
//!
//! On the build side, the subset font gets a single format 12 subtable
//! (platform 3, encoding 10), grouped over the sorted used characters.
//! A group only grows while the character codes stay contiguous and the new
//! glyph ids advance in lockstep, since a group encodes
//! `glyph = start_glyph_id + (code - start_char_code)`.

use crate::stream::{Reader, Structure, Writer};
use crate::subset::Context;
use crate::{Result, Tag};
use rustc_hash::FxHashMap;

mod subtable0;
mod subtable12;
mod subtable4;
mod subtable6;

use subtable0::Subtable0;
use subtable12::{SequentialMapGroup, Subtable12};
use subtable4::Subtable4;
use subtable6::Subtable6;

#[derive(Debug)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    subtable_offset: u32,
}

impl Structure<'_> for EncodingRecord {
    fn read(r: &mut Reader) -> Result<Self> {
        let platform_id = r.read::<u16>()?;
        let encoding_id = r.read::<u16>()?;
        let subtable_offset = r.read::<u32>()?;

        Ok(EncodingRecord { platform_id, encoding_id, subtable_offset })
    }

    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.platform_id);
        w.write::<u16>(self.encoding_id);
        w.write::<u32>(self.subtable_offset);
    }
}

/// A decoded cmap subtable, one variant per supported format.
enum Subtable<'a> {
    Format0(Subtable0),
    Format4(Subtable4<'a>),
    Format6(Subtable6),
    Format12(Subtable12),
}

impl<'a> Subtable<'a> {
    /// Decode the subtable at the start of `data`. Returns `None` for a
    /// recognized-but-unsupported format.
    fn parse(data: &'a [u8]) -> Result<Option<Self>> {
        Ok(match u16::read_at(data, 0)? {
            0 => Some(Self::Format0(Subtable0::read_at(data, 0)?)),
            4 => Some(Self::Format4(Subtable4::read_at(data, 0)?)),
            6 => Some(Self::Format6(Subtable6::read_at(data, 0)?)),
            12 => Some(Self::Format12(Subtable12::read_at(data, 0)?)),
            _ => None,
        })
    }

    /// Insert every mapping this subtable defines into `map`.
    fn merge_into(&self, map: &mut FxHashMap<u32, u16>) {
        match self {
            Self::Format0(s) => s.merge_into(map),
            Self::Format4(s) => s.merge_into(map),
            Self::Format6(s) => s.merge_into(map),
            Self::Format12(s) => s.merge_into(map),
        }
    }
}

/// Build the character map of a face by merging all of its cmap subtables.
///
/// Never fails: a font whose cmap yields nothing usable maps no characters.
pub(crate) fn parse(cmap: &[u8]) -> FxHashMap<u32, u16> {
    let mut map = FxHashMap::default();

    let mut r = Reader::new(cmap);
    let records = (|| {
        r.read::<u16>()?; // version
        let num_tables = r.read::<u16>()?;
        r.read_vector::<EncodingRecord>(num_tables as usize)
    })();

    let records = match records {
        Ok(records) => records,
        Err(e) => {
            log::warn!("malformed cmap header: {e}");
            return map;
        }
    };

    for record in records {
        let Some(data) = cmap.get(record.subtable_offset as usize..) else {
            log::warn!(
                "cmap subtable offset out of bounds \
                 (platform {}, encoding {})",
                record.platform_id,
                record.encoding_id,
            );
            continue;
        };

        match Subtable::parse(data) {
            Ok(Some(subtable)) => subtable.merge_into(&mut map),
            Ok(None) => {}
            Err(e) => log::warn!(
                "skipping malformed cmap subtable \
                 (platform {}, encoding {}): {e}",
                record.platform_id,
                record.encoding_id,
            ),
        }
    }

    map
}

/// Build the subset cmap: a single format 12 subtable over the used
/// characters, remapped to the new glyph ids.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut groups: Vec<SequentialMapGroup> = vec![];
    let mut current: Option<SequentialMapGroup> = None;

    for &code in &ctx.chars {
        let old_gid = ctx.face.glyph_index(code);
        let Some(&new_gid) = ctx.glyph_map.get(&old_gid) else {
            // A character whose glyph didn't make it into the subset breaks
            // the run even if the next code is contiguous.
            groups.extend(current.take());
            continue;
        };

        match &mut current {
            Some(group)
                if code == group.end_char_code + 1
                    && u32::from(new_gid)
                        == group.start_glyph_id + (code - group.start_char_code) =>
            {
                group.end_char_code = code;
            }
            _ => {
                groups.extend(current.take());
                current = Some(SequentialMapGroup {
                    start_char_code: code,
                    end_char_code: code,
                    start_glyph_id: u32::from(new_gid),
                });
            }
        }
    }

    groups.extend(current);

    let subtable = Subtable12 { language: 0, groups };

    let mut sub_cmap = Writer::new();
    sub_cmap.write::<u16>(0); // version
    sub_cmap.write::<u16>(1); // num tables
    sub_cmap.write::<EncodingRecord>(EncodingRecord {
        platform_id: 3,
        encoding_id: 10,
        subtable_offset: 12, // header + the single record
    });
    sub_cmap.write::<Subtable12>(subtable);

    ctx.push(Tag::CMAP, sub_cmap.finish());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_formats_are_skipped() {
        // format 2 is recognized as a format code but not supported
        let data = 2u16.to_be_bytes();
        assert!(matches!(Subtable::parse(&data), Ok(None)));
    }

    #[test]
    fn truncated_subtable_is_an_error() {
        let mut data = vec![];
        data.extend(12u16.to_be_bytes()); // format 12
        data.extend(0u16.to_be_bytes()); // reserved, then nothing
        assert!(Subtable::parse(&data).is_err());
    }

    #[test]
    fn malformed_header_maps_nothing() {
        assert!(parse(&[0x00]).is_empty());
    }
}
