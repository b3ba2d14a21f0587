//! The `glyf` table holds the glyph outlines, indexed through `loca`.
//!
//! Subsetting it means three things: discovering which extra glyphs the
//! requested ones pull in through composite components, rewriting those
//! component references to the new glyph ids, and laying the surviving
//! outlines out back to back with a fresh `loca` table. The subset always
//! uses the long (32-bit) loca format.

use crate::stream::{Reader, Structure, Writer};
use crate::subset::Context;
use crate::{Error, Result, Tag};
use rustc_hash::FxHashMap;

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Parse a `loca` table into byte offsets, one per glyph plus the end
/// sentinel. Short-format offsets are stored halved and scale back up.
pub(crate) fn parse_loca(
    loca: &[u8],
    long: bool,
    num_glyphs: u16,
) -> Result<Vec<u32>> {
    let mut r = Reader::new(loca);
    let count = usize::from(num_glyphs) + 1;

    if long {
        r.read_vector::<u32>(count)
    } else {
        Ok(r.read_vector::<u16>(count)?
            .into_iter()
            .map(|offset| 2 * u32::from(offset))
            .collect())
    }
}

/// The glyph ids a composite outline references. Simple and empty glyphs
/// reference none.
pub(crate) fn components(data: &[u8]) -> Result<Vec<u16>> {
    component_positions(data)?
        .into_iter()
        .map(|pos| u16::read_at(data, pos))
        .collect()
}

/// Byte positions of the component glyph ids within a composite outline.
fn component_positions(data: &[u8]) -> Result<Vec<usize>> {
    let mut positions = vec![];
    if data.is_empty() {
        return Ok(positions);
    }

    if i16::read_at(data, 0)? >= 0 {
        // A simple glyph.
        return Ok(positions);
    }

    // Skip the header (numberOfContours + bounding box), then walk the
    // component records.
    let mut offset = 10;
    loop {
        let flags = u16::read_at(data, offset)?;
        positions.push(offset + 2);

        offset += 4; // flags + glyph index
        offset += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            offset += 8;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            offset += 4;
        } else if flags & WE_HAVE_A_SCALE != 0 {
            offset += 2;
        }

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok(positions)
}

/// Rewrite the component references of an outline to the new glyph ids.
fn remap_components(
    data: &[u8],
    glyph_map: &FxHashMap<u16, u16>,
) -> Result<Vec<u8>> {
    let mut out = data.to_vec();

    for pos in component_positions(data)? {
        let old = u16::read_at(data, pos)?;
        let new = glyph_map.get(&old).copied().ok_or(Error::InvalidData)?;
        out[pos..pos + 2].copy_from_slice(&new.to_be_bytes());
    }

    Ok(out)
}

/// Build the subset `glyf` and `loca` tables: outlines in new-id order,
/// each padded to a 4-byte boundary, with composite references rewritten.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut sub_glyf = Writer::new();
    let mut sub_loca = Writer::new();

    for glyph in ctx.glyphs {
        debug_assert!(
            glyph.components.iter().all(|gid| ctx.glyph_map.contains_key(gid)),
            "glyph closure is missing a component"
        );

        sub_loca.write::<u32>(sub_glyf.len() as u32);
        let data = remap_components(glyph.data, ctx.glyph_map)?;
        sub_glyf.extend(&data);
        sub_glyf.align(4);
    }

    // The final sentinel offset.
    sub_loca.write::<u32>(sub_glyf.len() as u32);

    ctx.push(Tag::LOCA, sub_loca.finish());
    ctx.push(Tag::GLYF, sub_glyf.finish());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite(entries: &[(u16, u16)]) -> Vec<u8> {
        let mut data = vec![];
        data.extend((-1i16).to_be_bytes());
        data.extend([0u8; 8]); // bounding box
        for (flags, gid) in entries {
            data.extend(flags.to_be_bytes());
            data.extend(gid.to_be_bytes());
            let args = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
            data.extend(std::iter::repeat(0u8).take(args));
        }
        data
    }

    #[test]
    fn loca_short_offsets_are_doubled() {
        let data: Vec<u8> =
            [0u16, 10, 30].iter().flat_map(|v| v.to_be_bytes()).collect();
        assert_eq!(parse_loca(&data, false, 2).unwrap(), vec![0, 20, 60]);
    }

    #[test]
    fn loca_requires_the_sentinel() {
        let data = [0u8; 8];
        assert_eq!(parse_loca(&data, true, 2), Err(Error::MissingData));
        assert_eq!(parse_loca(&data, true, 1).unwrap(), vec![0, 0]);
    }

    #[test]
    fn simple_glyphs_have_no_components() {
        let mut data = vec![];
        data.extend(1i16.to_be_bytes());
        data.extend([0u8; 8]);
        assert_eq!(components(&data).unwrap(), vec![]);
        assert_eq!(components(&[]).unwrap(), vec![]);
    }

    #[test]
    fn composite_component_walk() {
        let data = composite(&[
            (MORE_COMPONENTS | ARG_1_AND_2_ARE_WORDS, 7),
            (WE_HAVE_A_SCALE, 12),
        ]);
        // The second entry has a 2-byte scale after its args.
        let mut data = data;
        data.extend([0u8; 2]);

        assert_eq!(components(&data).unwrap(), vec![7, 12]);
    }

    #[test]
    fn remap_rewrites_references() {
        let data = composite(&[(0, 7)]);
        let mut map = FxHashMap::default();
        map.insert(7u16, 1u16);

        let out = remap_components(&data, &map).unwrap();
        assert_eq!(u16::read_at(&out, 12).unwrap(), 1);
        // Everything else is untouched.
        assert_eq!(out[..12], data[..12]);
        assert_eq!(out[14..], data[14..]);
    }

    #[test]
    fn remap_fails_on_unmapped_component() {
        let data = composite(&[(0, 7)]);
        let map = FxHashMap::default();
        assert_eq!(remap_components(&data, &map), Err(Error::InvalidData));
    }
}
