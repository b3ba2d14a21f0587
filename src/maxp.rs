//! The `maxp` table is rebuilt as version 1.0 with the subset glyph count.
//! The interpreter maxima are coarse fixed values, not recomputed from the
//! outlines.

use crate::stream::Writer;
use crate::subset::Context;
use crate::{Result, Tag};

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut w = Writer::new();
    w.write::<u32>(0x00010000); // version 1.0
    w.write::<u16>(ctx.glyphs.len() as u16);
    w.write::<u16>(255); // max points
    w.write::<u16>(64); // max contours
    w.write::<u16>(255); // max composite points
    w.write::<u16>(64); // max composite contours
    w.write::<u16>(2); // max zones
    w.write::<u16>(0); // max twilight points
    w.write::<u16>(0); // max storage
    w.write::<u16>(0); // max function defs
    w.write::<u16>(0); // max instruction defs
    w.write::<u16>(64); // max stack elements
    w.write::<u16>(0); // max size of instructions
    w.write::<u16>(8); // max component elements
    w.write::<u16>(4); // max component depth

    ctx.push(Tag::MAXP, w.finish());
    Ok(())
}
