//! The `name` table stores localized strings keyed by a name id.
//!
//! Lookup prefers Microsoft records (platform 3, UTF-16BE strings) and
//! falls back to Macintosh ones (platform 1, treated as UTF-8). The subset
//! font keeps a single record: the PostScript name of the original face
//! with a `-Subset` suffix.

use crate::stream::{Reader, Structure, Writer};
use crate::subset::Context;
use crate::{Result, Tag};

const PLATFORM_MICROSOFT: u16 = 3;
const PLATFORM_MACINTOSH: u16 = 1;
const NAME_ID_POSTSCRIPT: u16 = 6;

#[derive(Clone, Copy, Debug)]
struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: u16,
    string_offset: u16,
}

impl Structure<'_> for NameRecord {
    fn read(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            platform_id: r.read::<u16>()?,
            encoding_id: r.read::<u16>()?,
            language_id: r.read::<u16>()?,
            name_id: r.read::<u16>()?,
            length: r.read::<u16>()?,
            string_offset: r.read::<u16>()?,
        })
    }

    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.platform_id);
        w.write::<u16>(self.encoding_id);
        w.write::<u16>(self.language_id);
        w.write::<u16>(self.name_id);
        w.write::<u16>(self.length);
        w.write::<u16>(self.string_offset);
    }
}

/// Find the string for a name id, or `None` if no record matches.
pub(crate) fn string_by_id(name: &[u8], name_id: u16) -> Option<String> {
    let mut r = Reader::new(name);
    r.read::<u16>().ok()?; // version
    let count = r.read::<u16>().ok()?;
    let storage_offset = r.read::<u16>().ok()?;
    let records = r.read_vector::<NameRecord>(usize::from(count)).ok()?;
    let storage = name.get(usize::from(storage_offset)..)?;

    for platform in [PLATFORM_MICROSOFT, PLATFORM_MACINTOSH] {
        let record = records
            .iter()
            .find(|r| r.platform_id == platform && r.name_id == name_id);

        if let Some(record) = record {
            let start = usize::from(record.string_offset);
            let end = start + usize::from(record.length);
            let bytes = storage.get(start..end)?;
            return Some(decode(platform, bytes));
        }
    }

    None
}

fn decode(platform: u16, bytes: &[u8]) -> String {
    if platform == PLATFORM_MICROSOFT {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Build the subset `name` table: one Microsoft PostScript-name record.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let postscript_name = format!("{}-Subset", ctx.face.font_name());
    let encoded: Vec<u8> = postscript_name
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect();

    let mut w = Writer::new();
    w.write::<u16>(0); // version
    w.write::<u16>(1); // record count
    w.write::<u16>(6 + 12); // storage offset: the header plus one record
    w.write::<NameRecord>(NameRecord {
        platform_id: PLATFORM_MICROSOFT,
        encoding_id: 1, // Unicode BMP
        language_id: 0x0409,
        name_id: NAME_ID_POSTSCRIPT,
        length: encoded.len() as u16,
        string_offset: 0,
    });
    w.extend(&encoded);

    ctx.push(Tag::NAME, w.finish());
    Ok(())
}
