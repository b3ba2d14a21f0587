use crate::stream::{Reader, Structure, Writer};
use crate::Result;
use rustc_hash::FxHashMap;

/// A format 0 subtable: one glyph index per character code 0–255.
pub(crate) struct Subtable0 {
    glyph_ids: Vec<u8>,
}

impl Subtable0 {
    /// Insert every mapping defined by this subtable into `map`.
    pub fn merge_into(&self, map: &mut FxHashMap<u32, u16>) {
        for (code, &gid) in self.glyph_ids.iter().enumerate() {
            map.insert(code as u32, u16::from(gid));
        }
    }
}

impl Structure<'_> for Subtable0 {
    fn read(r: &mut Reader) -> Result<Self> {
        r.skip(6)?; // format + length + language
        let glyph_ids = r.read_bytes(256)?.to_vec();
        Ok(Self { glyph_ids })
    }

    fn write(&self, w: &mut Writer) {
        w.write::<u16>(0);
        w.write::<u16>(6 + 256); // length
        w.write::<u16>(0); // language
        w.extend(&self.glyph_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_all_byte_codes() {
        let mut data = vec![];
        data.extend(0u16.to_be_bytes());
        data.extend(262u16.to_be_bytes());
        data.extend(0u16.to_be_bytes());
        data.extend((0..=255u8).map(|b| b.wrapping_mul(2)));

        let subtable = Subtable0::read_at(&data, 0).unwrap();
        let mut map = FxHashMap::default();
        subtable.merge_into(&mut map);

        assert_eq!(map.len(), 256);
        assert_eq!(map[&0x41], 0x82);
    }

    #[test]
    fn truncated_table_fails() {
        let data = [0u8; 100];
        assert!(Subtable0::read_at(&data, 0).is_err());
    }
}
