//! A parsed view over a TrueType font file.

use crate::stream::{Reader, Structure};
use crate::{cmap, glyf, hmtx, name};
use crate::{Error, FontKind, Result, TableRecord, Tag};
use rustc_hash::FxHashMap;

/// The tables a face cannot be used without.
const REQUIRED_TABLES: [Tag; 6] =
    [Tag::HEAD, Tag::NAME, Tag::HMTX, Tag::HHEA, Tag::CMAP, Tag::MAXP];

/// A font-wide bounding box in design units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    /// Leftmost extent over all glyphs.
    pub x_min: i16,
    /// Lowest extent over all glyphs.
    pub y_min: i16,
    /// Rightmost extent over all glyphs.
    pub x_max: i16,
    /// Highest extent over all glyphs.
    pub y_max: i16,
}

/// Metrics for a single glyph, normalized to em-relative units (design
/// units divided by `unitsPerEm`).
///
/// The bounding box fields are zero when the font carries no outline for
/// the glyph (or no `glyf` table at all). Ascent and descent are font-wide.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Left edge of the glyph's bounding box.
    pub left: f64,
    /// Top edge of the glyph's bounding box.
    pub top: f64,
    /// Right edge of the glyph's bounding box.
    pub right: f64,
    /// Bottom edge of the glyph's bounding box.
    pub bottom: f64,
    /// Font-wide ascent.
    pub ascent: f64,
    /// Font-wide descent, typically negative.
    pub descent: f64,
    /// Horizontal advance of the glyph.
    pub advance_width: f64,
    /// Left side bearing of the glyph.
    pub left_bearing: f64,
}

/// A parsed font face.
///
/// Parsing is all-or-nothing: [`Face::parse`] either returns a face with
/// its character map and glyph metrics fully built, or an [`Error`]. All
/// queries are side-effect-free.
pub struct Face<'a> {
    data: &'a [u8],
    records: Vec<TableRecord>,
    units_per_em: u16,
    bbox: BBox,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    num_glyphs: u16,
    char_map: FxHashMap<u32, u16>,
    hor_metrics: Vec<hmtx::HorMetric>,
    metrics: Vec<GlyphMetrics>,
    /// Byte offsets into `glyf`, one per glyph plus the end sentinel.
    /// Empty when the font has no outlines.
    loca: Vec<u32>,
}

impl<'a> Face<'a> {
    /// Parse a font face from raw TrueType data.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        if r.read::<FontKind>()? != FontKind::TrueType {
            return Err(Error::UnknownKind);
        }

        let num_tables = r.read::<u16>()?;
        r.skip(6)?; // search range + entry selector + range shift
        let records = r.read_vector::<TableRecord>(num_tables as usize)?;

        let mut face = Face {
            data,
            records,
            units_per_em: 0,
            bbox: BBox::default(),
            ascent: 0,
            descent: 0,
            line_gap: 0,
            num_glyphs: 0,
            char_map: FxHashMap::default(),
            hor_metrics: vec![],
            metrics: vec![],
            loca: vec![],
        };

        for tag in REQUIRED_TABLES {
            face.expect_table(tag)?;
        }

        let head = face.expect_table(Tag::HEAD)?;
        face.units_per_em = u16::read_at(head, 18)?;
        if face.units_per_em == 0 {
            return Err(Error::InvalidData);
        }
        face.bbox = BBox {
            x_min: i16::read_at(head, 36)?,
            y_min: i16::read_at(head, 38)?,
            x_max: i16::read_at(head, 40)?,
            y_max: i16::read_at(head, 42)?,
        };
        let index_to_loc_format = i16::read_at(head, 50)?;

        let hhea = face.expect_table(Tag::HHEA)?;
        face.ascent = i16::read_at(hhea, 4)?;
        face.descent = i16::read_at(hhea, 6)?;
        face.line_gap = i16::read_at(hhea, 8)?;
        let num_h_metrics = u16::read_at(hhea, 34)?;

        let maxp = face.expect_table(Tag::MAXP)?;
        face.num_glyphs = u16::read_at(maxp, 4)?;

        face.char_map = cmap::parse(face.expect_table(Tag::CMAP)?);

        face.hor_metrics = hmtx::parse(
            face.expect_table(Tag::HMTX)?,
            num_h_metrics,
            face.num_glyphs,
        )?;

        if let (Some(loca), Some(_)) =
            (face.table(Tag::LOCA), face.table(Tag::GLYF))
        {
            face.loca =
                glyf::parse_loca(loca, index_to_loc_format != 0, face.num_glyphs)?;
        }

        face.metrics = face.build_metrics();

        Ok(face)
    }

    fn build_metrics(&self) -> Vec<GlyphMetrics> {
        let upem = f64::from(self.units_per_em);
        let ascent = f64::from(self.ascent) / upem;
        let descent = f64::from(self.descent) / upem;

        (0..self.num_glyphs)
            .map(|gid| {
                let hor = self.hor_metrics[usize::from(gid)];
                let outline = self.glyph_data(gid);

                // An outline header is numberOfContours plus the box.
                let bbox = if outline.len() >= 10 {
                    [
                        i16::read_at(outline, 2).unwrap_or(0),
                        i16::read_at(outline, 4).unwrap_or(0),
                        i16::read_at(outline, 6).unwrap_or(0),
                        i16::read_at(outline, 8).unwrap_or(0),
                    ]
                } else {
                    [0; 4]
                };

                GlyphMetrics {
                    left: f64::from(bbox[0]) / upem,
                    bottom: f64::from(bbox[1]) / upem,
                    right: f64::from(bbox[2]) / upem,
                    top: f64::from(bbox[3]) / upem,
                    ascent,
                    descent,
                    advance_width: f64::from(hor.advance) / upem,
                    left_bearing: f64::from(hor.lsb) / upem,
                }
            })
            .collect()
    }

    /// Look up a table by its tag.
    pub(crate) fn table(&self, tag: Tag) -> Option<&'a [u8]> {
        let record = self.records.iter().find(|record| record.tag == tag)?;
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        self.data.get(start..end)
    }

    /// Look up a table that must be present.
    pub(crate) fn expect_table(&self, tag: Tag) -> Result<&'a [u8]> {
        self.table(tag).ok_or(Error::MissingTable(tag))
    }

    /// The raw outline bytes of a glyph, or an empty slice if the font has
    /// no outlines or the glyph is empty.
    pub(crate) fn glyph_data(&self, glyph_id: u16) -> &'a [u8] {
        let (Some(&start), Some(&end)) = (
            self.loca.get(usize::from(glyph_id)),
            self.loca.get(usize::from(glyph_id) + 1),
        ) else {
            return &[];
        };

        let Some(glyf) = self.table(Tag::GLYF) else { return &[] };

        if start >= end {
            return &[];
        }

        glyf.get(start as usize..end as usize).unwrap_or(&[])
    }

    /// The advance and left side bearing of a glyph in design units.
    pub(crate) fn hor_metric(&self, glyph_id: u16) -> Option<hmtx::HorMetric> {
        self.hor_metrics.get(usize::from(glyph_id)).copied()
    }

    /// The number of characters the face maps to glyphs.
    pub(crate) fn char_count(&self) -> usize {
        self.char_map.len()
    }

    /// The glyph a character code maps to, or 0 (`.notdef`) if the face
    /// does not cover the character.
    pub fn glyph_index(&self, code: u32) -> u16 {
        self.char_map.get(&code).copied().unwrap_or(0)
    }

    /// Whether the character map covers the character code.
    pub fn is_char_supported(&self, code: u32) -> bool {
        self.char_map.contains_key(&code)
    }

    /// Metrics of a glyph, or `None` if the glyph id is out of range.
    pub fn glyph_metrics(&self, glyph_id: u16) -> Option<GlyphMetrics> {
        self.metrics.get(usize::from(glyph_id)).copied()
    }

    /// Metrics of the glyph a character maps to.
    pub fn char_metrics(&self, code: u32) -> Option<GlyphMetrics> {
        self.glyph_metrics(self.glyph_index(code))
    }

    /// The summed advance width of a string, in design units.
    ///
    /// Characters outside the font's coverage contribute the `.notdef`
    /// advance.
    pub fn measure_text(&self, text: &str) -> f64 {
        text.chars()
            .map(|c| {
                let gid = self.glyph_index(u32::from(c));
                self.hor_metric(gid).map_or(0.0, |m| f64::from(m.advance))
            })
            .sum()
    }

    /// The width of a string for a given point size.
    pub fn measure_width(&self, text: &str, size: f64) -> f64 {
        self.measure_text(text) * size / f64::from(self.units_per_em)
    }

    /// The ascender for a given point size.
    pub fn ascender(&self, size: f64) -> f64 {
        f64::from(self.ascent) * size / f64::from(self.units_per_em)
    }

    /// The descender for a given point size, typically negative.
    pub fn descender(&self, size: f64) -> f64 {
        f64::from(self.descent) * size / f64::from(self.units_per_em)
    }

    /// The default line height for a given point size.
    pub fn line_height(&self, size: f64) -> f64 {
        f64::from(i32::from(self.ascent) - i32::from(self.descent)
            + i32::from(self.line_gap))
            * size
            / f64::from(self.units_per_em)
    }

    /// A string from the `name` table, or `None` if the face carries no
    /// matching record. Microsoft (UTF-16BE) records are preferred over
    /// Macintosh ones.
    pub fn name_by_id(&self, name_id: u16) -> Option<String> {
        name::string_by_id(self.table(Tag::NAME)?, name_id)
    }

    /// The name of the font: the PostScript name if present, otherwise the
    /// full name, otherwise the family name, otherwise a placeholder.
    pub fn font_name(&self) -> String {
        const POSTSCRIPT: u16 = 6;
        const FULL: u16 = 4;
        const FAMILY: u16 = 1;

        [POSTSCRIPT, FULL, FAMILY]
            .into_iter()
            .find_map(|id| self.name_by_id(id))
            .unwrap_or_else(|| "Unknown".into())
    }

    /// Units per em, the design-unit scale of all metrics.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Font-wide ascent in design units.
    pub fn ascent(&self) -> i16 {
        self.ascent
    }

    /// Font-wide descent in design units, typically negative.
    pub fn descent(&self) -> i16 {
        self.descent
    }

    /// Font-wide line gap in design units.
    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    /// The number of glyphs in the face.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// The font-wide bounding box in design units.
    pub fn bounding_box(&self) -> BBox {
        self.bbox
    }
}
