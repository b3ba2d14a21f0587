//! The `hhea` table is copied from the original font except for its final
//! field, `numberOfHMetrics`, which becomes the subset glyph count since
//! the rebuilt `hmtx` carries a full long metric per glyph.

use crate::stream::Writer;
use crate::subset::Context;
use crate::{Error, Result, Tag};

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let hhea = ctx.face.expect_table(Tag::HHEA)?;
    if hhea.len() < 36 {
        return Err(Error::MissingData);
    }

    let mut sub_hhea = Writer::new();
    sub_hhea.extend(&hhea[..hhea.len() - 2]);
    sub_hhea.write::<u16>(ctx.glyphs.len() as u16);

    ctx.push(Tag::HHEA, sub_hhea.finish());
    Ok(())
}
