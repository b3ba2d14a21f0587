use crate::stream::{Reader, Structure, Writer};
use crate::Result;
use rustc_hash::FxHashMap;

/// A contiguous run of characters mapping to a contiguous run of glyphs.
pub(crate) struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl Structure<'_> for SequentialMapGroup {
    fn read(r: &mut Reader<'_>) -> Result<Self> {
        let start_char_code = r.read::<u32>()?;
        let end_char_code = r.read::<u32>()?;
        let start_glyph_id = r.read::<u32>()?;

        Ok(Self { start_char_code, end_char_code, start_glyph_id })
    }

    fn write(&self, w: &mut Writer) {
        w.write::<u32>(self.start_char_code);
        w.write::<u32>(self.end_char_code);
        w.write::<u32>(self.start_glyph_id);
    }
}

/// A format 12 subtable: segmented coverage over the full Unicode range.
pub(crate) struct Subtable12 {
    pub language: u32,
    pub groups: Vec<SequentialMapGroup>,
}

impl Subtable12 {
    /// Insert every mapping defined by this subtable into `map`.
    pub fn merge_into(&self, map: &mut FxHashMap<u32, u16>) {
        for group in &self.groups {
            if group.start_char_code > group.end_char_code {
                continue;
            }

            for code in group.start_char_code..=group.end_char_code {
                let gid = group
                    .start_glyph_id
                    .wrapping_add(code - group.start_char_code);
                if let Ok(gid) = u16::try_from(gid) {
                    map.insert(code, gid);
                }
            }
        }
    }
}

impl Structure<'_> for Subtable12 {
    fn read(r: &mut Reader<'_>) -> Result<Self> {
        r.read::<u16>()?; // format
        r.read::<u16>()?; // reserved
        r.read::<u32>()?; // length
        let language = r.read::<u32>()?;
        let num_groups = r.read::<u32>()?;

        let groups = r.read_vector::<SequentialMapGroup>(num_groups as usize)?;
        Ok(Self { language, groups })
    }

    fn write(&self, w: &mut Writer) {
        // format + reserved + length + language + num_groups + the groups
        let length = 2 + 2 + 4 + 4 + 4 + 12 * self.groups.len();

        w.write::<u16>(12);
        w.write::<u16>(0);
        w.write::<u32>(length as u32);
        w.write::<u32>(self.language);
        w.write::<u32>(self.groups.len() as u32);

        for group in &self.groups {
            group.write(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplementary_plane_codes() {
        let subtable = Subtable12 {
            language: 0,
            groups: vec![SequentialMapGroup {
                start_char_code: 0x1F600,
                end_char_code: 0x1F602,
                start_glyph_id: 5,
            }],
        };

        let mut map = FxHashMap::default();
        subtable.merge_into(&mut map);

        assert_eq!(map[&0x1F600], 5);
        assert_eq!(map[&0x1F602], 7);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn round_trip() {
        let subtable = Subtable12 {
            language: 0,
            groups: vec![
                SequentialMapGroup {
                    start_char_code: 65,
                    end_char_code: 67,
                    start_glyph_id: 1,
                },
                SequentialMapGroup {
                    start_char_code: 70,
                    end_char_code: 71,
                    start_glyph_id: 4,
                },
            ],
        };

        let mut w = Writer::new();
        w.write::<Subtable12>(subtable);
        let data = w.finish();

        assert_eq!(u32::read_at(&data, 4).unwrap(), data.len() as u32);

        let reread = Subtable12::read_at(&data, 0).unwrap();
        assert_eq!(reread.groups.len(), 2);
        assert_eq!(reread.groups[1].start_char_code, 70);
        assert_eq!(reread.groups[1].start_glyph_id, 4);
    }
}
