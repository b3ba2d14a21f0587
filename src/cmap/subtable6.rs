use crate::stream::{Reader, Structure, Writer};
use crate::Result;
use rustc_hash::FxHashMap;

/// A format 6 subtable: a trimmed run of glyph indices starting at a given
/// character code.
pub(crate) struct Subtable6 {
    first_code: u16,
    glyph_ids: Vec<u16>,
}

impl Subtable6 {
    /// Insert every mapping defined by this subtable into `map`.
    pub fn merge_into(&self, map: &mut FxHashMap<u32, u16>) {
        for (i, &gid) in self.glyph_ids.iter().enumerate() {
            map.insert(u32::from(self.first_code) + i as u32, gid);
        }
    }
}

impl Structure<'_> for Subtable6 {
    fn read(r: &mut Reader) -> Result<Self> {
        r.skip(6)?; // format + length + language
        let first_code = r.read::<u16>()?;
        let entry_count = r.read::<u16>()?;
        let glyph_ids = r.read_vector::<u16>(entry_count as usize)?;
        Ok(Self { first_code, glyph_ids })
    }

    fn write(&self, w: &mut Writer) {
        let length = 10 + 2 * self.glyph_ids.len() as u16;
        w.write::<u16>(6);
        w.write::<u16>(length);
        w.write::<u16>(0); // language
        w.write::<u16>(self.first_code);
        w.write::<u16>(self.glyph_ids.len() as u16);
        w.write_vector(&self.glyph_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_run() {
        let subtable = Subtable6 { first_code: 0x20, glyph_ids: vec![3, 0, 7] };
        let mut map = FxHashMap::default();
        subtable.merge_into(&mut map);

        assert_eq!(map[&0x20], 3);
        assert_eq!(map[&0x21], 0);
        assert_eq!(map[&0x22], 7);
        assert!(!map.contains_key(&0x23));
    }

    #[test]
    fn round_trip() {
        let subtable = Subtable6 { first_code: 65, glyph_ids: vec![1, 2] };
        let mut w = Writer::new();
        w.write::<Subtable6>(subtable);
        let data = w.finish();

        let reread = Subtable6::read_at(&data, 0).unwrap();
        assert_eq!(reread.first_code, 65);
        assert_eq!(reread.glyph_ids, vec![1, 2]);
    }
}
