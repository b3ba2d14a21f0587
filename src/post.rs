//! The `post` table is rebuilt as version 3.0, which declares that no
//! glyph names are present. All spacing and memory fields are zeroed.

use crate::stream::Writer;
use crate::subset::Context;
use crate::{Result, Tag};

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut w = Writer::new();
    w.write::<u32>(0x00030000); // version 3.0
    w.write::<u32>(0); // italic angle
    w.write::<i16>(0); // underline position
    w.write::<i16>(0); // underline thickness
    w.write::<u32>(0); // fixed pitch
    w.write::<u32>(0); // min memory type 42
    w.write::<u32>(0); // max memory type 42
    w.write::<u32>(0); // min memory type 1
    w.write::<u32>(0); // max memory type 1

    ctx.push(Tag::POST, w.finish());
    Ok(())
}
