//! The `head` table is copied from the original font, with three fields
//! forced: the checksum adjustment is zeroed (the real value is patched in
//! after the whole file is assembled), the magic number is restored, and
//! the loca format is pinned to long offsets.

use crate::subset::Context;
use crate::{Error, Result, Tag};

const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut head = ctx.face.expect_table(Tag::HEAD)?.to_vec();

    head.get_mut(8..12).ok_or(Error::MissingData)?.fill(0);
    head.get_mut(12..16)
        .ok_or(Error::MissingData)?
        .copy_from_slice(&MAGIC_NUMBER.to_be_bytes());
    head.get_mut(50..52)
        .ok_or(Error::MissingData)?
        .copy_from_slice(&1i16.to_be_bytes());

    ctx.push(Tag::HEAD, head);
    Ok(())
}
