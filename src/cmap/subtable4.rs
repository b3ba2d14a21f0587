use crate::stream::{Reader, Structure, Writer};
use crate::{Error, Result};
use rustc_hash::FxHashMap;

/// A format 4 subtable: segment mapping to delta values, the workhorse
/// encoding for the Basic Multilingual Plane.
pub(crate) struct Subtable4<'a> {
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<i16>,
    id_range_offsets: Vec<u16>,
    /// The data from the start of the `idRangeOffset` array onwards. Range
    /// offsets are relative to their own position in the file, so indirect
    /// lookups index into this slice.
    glyph_id_array: &'a [u8],
}

impl Subtable4<'_> {
    /// Insert every mapping defined by this subtable into `map`.
    pub fn merge_into(&self, map: &mut FxHashMap<u32, u16>) {
        let segments = self
            .start_codes
            .iter()
            .zip(&self.end_codes)
            .zip(self.id_deltas.iter().zip(&self.id_range_offsets));

        for (i, ((&start, &end), (&id_delta, &id_range_offset))) in
            segments.enumerate()
        {
            // The search-terminating sentinel segment carries no mappings.
            if start == 0xFFFF && end == 0xFFFF {
                break;
            }

            if start > end {
                continue;
            }

            for code in start..=end {
                if id_range_offset == 0 {
                    map.insert(
                        u32::from(code),
                        code.wrapping_add(id_delta as u16),
                    );
                    continue;
                }

                // The glyph id lives at
                // `&id_range_offsets[i] + id_range_offset + 2 * (code - start)`,
                // which `glyph_id_array` is based at.
                let pos = 2 * i
                    + usize::from(id_range_offset)
                    + 2 * usize::from(code - start);

                if let Ok(mut gid) = u16::read_at(self.glyph_id_array, pos) {
                    if gid != 0 {
                        gid = gid.wrapping_add(id_delta as u16);
                    }
                    map.insert(u32::from(code), gid);
                }
            }
        }
    }
}

impl<'a> Structure<'a> for Subtable4<'a> {
    fn read(r: &mut Reader<'a>) -> Result<Self> {
        r.skip(4)?; // format + length
        r.skip(2)?; // language
        let seg_count_x2 = r.read::<u16>()?;

        if seg_count_x2 < 2 {
            return Err(Error::InvalidData);
        }

        let seg_count = seg_count_x2 / 2;
        r.skip(6)?; // search range + entry selector + range shift
        let end_codes = r.read_vector::<u16>(seg_count as usize)?;
        r.skip(2)?; // reserved pad
        let start_codes = r.read_vector::<u16>(seg_count as usize)?;
        let id_deltas = r.read_vector::<i16>(seg_count as usize)?;

        let glyph_id_array = r.tail();
        let id_range_offsets = r.read_vector::<u16>(seg_count as usize)?;

        Ok(Subtable4 {
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            glyph_id_array,
        })
    }

    fn write(&self, _: &mut Writer) {
        unreachable!("subset fonts carry a format 12 subtable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(
        segments: &[(u16, u16, i16, u16)],
        glyph_ids: &[u16],
    ) -> Vec<u8> {
        let seg_count = segments.len() as u16;
        let mut data = vec![];
        data.extend(4u16.to_be_bytes()); // format
        data.extend(0u16.to_be_bytes()); // length, unchecked
        data.extend(0u16.to_be_bytes()); // language
        data.extend((seg_count * 2).to_be_bytes());
        data.extend([0u8; 6]); // search fields, unchecked
        for seg in segments {
            data.extend(seg.1.to_be_bytes());
        }
        data.extend(0u16.to_be_bytes()); // reserved pad
        for seg in segments {
            data.extend(seg.0.to_be_bytes());
        }
        for seg in segments {
            data.extend(seg.2.to_be_bytes());
        }
        for seg in segments {
            data.extend(seg.3.to_be_bytes());
        }
        for gid in glyph_ids {
            data.extend(gid.to_be_bytes());
        }
        data
    }

    #[test]
    fn delta_segments() {
        // 'A'..='C' map to glyphs 36..=38, sentinel closes the table.
        let data = build(&[(65, 67, -29, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]);
        let subtable = Subtable4::read_at(&data, 0).unwrap();

        let mut map = FxHashMap::default();
        subtable.merge_into(&mut map);

        assert_eq!(map[&65], 36);
        assert_eq!(map[&67], 38);
        assert_eq!(map.len(), 3);
        // The sentinel itself contributes nothing, but (code + delta) wraps.
        assert!(!map.contains_key(&0xFFFF));
    }

    #[test]
    fn range_offset_segments() {
        // One mapped segment {48..=49} with an indirect lookup: the offset
        // points past the two id_range_offset entries into the glyph array.
        let data = build(
            &[(48, 49, 0, 4), (0xFFFF, 0xFFFF, 1, 0)],
            &[700, 701],
        );
        let subtable = Subtable4::read_at(&data, 0).unwrap();

        let mut map = FxHashMap::default();
        subtable.merge_into(&mut map);

        assert_eq!(map[&48], 700);
        assert_eq!(map[&49], 701);
    }

    #[test]
    fn zero_segments_is_invalid() {
        let mut data = vec![];
        data.extend(4u16.to_be_bytes());
        data.extend([0u8; 4]);
        data.extend(0u16.to_be_bytes()); // segCountX2 = 0
        data.extend([0u8; 6]);
        assert_eq!(
            Subtable4::read_at(&data, 0).err(),
            Some(Error::InvalidData)
        );
    }
}
