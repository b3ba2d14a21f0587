//! Collects the characters a document uses and emits a subset font.
//!
//! A subsetter lives in two phases. During collection, `add_chars` and
//! `add_string` grow the used-character set and resolve each new character
//! to its glyph; composite glyphs pull their components in through an
//! explicit worklist. `generate` then rebuilds the nine tables of the
//! subset font and assembles them into a fresh TrueType file. An instance
//! is meant to generate once; collection state is never consumed.

use crate::stream::Writer;
use crate::{checksum, cmap, glyf, head, hhea, hmtx, maxp, name, post};
use crate::{Face, FontKind, Result, TableRecord, Tag};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Subsets a [`Face`] down to the glyphs a set of characters needs.
///
/// New glyph ids are dense and assigned in first-use order, with `.notdef`
/// always at 0. Adding the same character or glyph twice never changes an
/// assignment.
pub struct Subsetter<'a> {
    face: &'a Face<'a>,
    chars: FxHashSet<u32>,
    glyphs: Vec<SubsetGlyph<'a>>,
    glyph_map: FxHashMap<u16, u16>,
}

/// A glyph kept in the subset. Its new id is its position in the
/// subsetter's glyph list.
pub(crate) struct SubsetGlyph<'a> {
    /// The glyph's id in the source face.
    pub old_id: u16,
    /// The raw outline, copied verbatim from the source `glyf` table.
    /// Empty for outline-less glyphs and fonts without outlines.
    pub data: &'a [u8],
    /// The source glyph ids of this glyph's composite components.
    pub components: Vec<u16>,
    /// The character codes that resolve to this glyph, in addition order.
    pub chars: Vec<u32>,
}

/// Summary counts of a subsetting run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsetStats {
    /// Glyphs in the source face.
    pub original_glyphs: u16,
    /// Glyphs in the subset, including `.notdef`.
    pub subset_glyphs: u16,
    /// Characters the source face maps.
    pub original_chars: usize,
    /// Characters collected into the subset.
    pub subset_chars: usize,
    /// `subset_glyphs / original_glyphs`.
    pub compression_ratio: f64,
}

impl<'a> Subsetter<'a> {
    /// Create a subsetter over a face. The subset starts out containing
    /// only `.notdef`.
    pub fn new(face: &'a Face<'a>) -> Self {
        let mut subsetter = Self {
            face,
            chars: FxHashSet::default(),
            glyphs: vec![],
            glyph_map: FxHashMap::default(),
        };
        subsetter.add_glyph(0, None);
        subsetter
    }

    /// Mark character codes as used, resolving each new one to its glyph.
    ///
    /// Characters the face does not cover resolve to `.notdef`; that is
    /// not an error, the document simply renders a fallback shape.
    pub fn add_chars(&mut self, codes: impl IntoIterator<Item = u32>) {
        for code in codes {
            if self.chars.insert(code) {
                let gid = self.face.glyph_index(code);
                self.add_glyph(gid, Some(code));
            }
        }
    }

    /// Mark every character of a string as used.
    pub fn add_string(&mut self, text: &str) {
        self.add_chars(text.chars().map(u32::from));
    }

    /// Add a glyph and, transitively, the components it references.
    ///
    /// Re-adding a known glyph only merges in the character code. The
    /// worklist keeps the recursion depth of pathological composite chains
    /// off the stack; the visited check is the `glyph_map` lookup.
    fn add_glyph(&mut self, glyph_id: u16, code: Option<u32>) {
        let mut work = VecDeque::new();
        work.push_back((glyph_id, code));

        while let Some((gid, code)) = work.pop_front() {
            if let Some(&new_id) = self.glyph_map.get(&gid) {
                if let Some(code) = code {
                    let chars = &mut self.glyphs[usize::from(new_id)].chars;
                    if !chars.contains(&code) {
                        chars.push(code);
                    }
                }
                continue;
            }

            let data = self.face.glyph_data(gid);
            let (data, components) = match glyf::components(data) {
                Ok(components) => (data, components),
                Err(e) => {
                    log::warn!("dropping malformed outline of glyph {gid}: {e}");
                    (&[][..], vec![])
                }
            };

            let new_id = self.glyphs.len() as u16;
            self.glyph_map.insert(gid, new_id);
            self.glyphs.push(SubsetGlyph {
                old_id: gid,
                data,
                components: components.clone(),
                chars: code.into_iter().collect(),
            });

            // Components are reached through composition, not characters.
            work.extend(components.into_iter().map(|gid| (gid, None)));
        }
    }

    /// Build the subset font file.
    pub fn generate(&mut self) -> Result<Vec<u8>> {
        // Guaranteed by `new`, but a subset without a fallback glyph is
        // never acceptable, so insist again.
        self.add_glyph(0, None);

        let mut chars: Vec<u32> = self.chars.iter().copied().collect();
        chars.sort_unstable();

        let mut ctx = Context {
            face: self.face,
            glyphs: &self.glyphs,
            glyph_map: &self.glyph_map,
            chars,
            tables: vec![],
        };

        glyf::subset(&mut ctx)?;
        cmap::subset(&mut ctx)?;
        head::subset(&mut ctx)?;
        hhea::subset(&mut ctx)?;
        hmtx::subset(&mut ctx)?;
        maxp::subset(&mut ctx)?;
        name::subset(&mut ctx)?;
        post::subset(&mut ctx)?;

        Ok(construct(ctx))
    }

    /// Counts describing how much the subset shrank the font.
    pub fn stats(&self) -> SubsetStats {
        let original_glyphs = self.face.num_glyphs();
        let subset_glyphs = self.glyphs.len() as u16;

        SubsetStats {
            original_glyphs,
            subset_glyphs,
            original_chars: self.face.char_count(),
            subset_chars: self.chars.len(),
            compression_ratio: if original_glyphs == 0 {
                0.0
            } else {
                f64::from(subset_glyphs) / f64::from(original_glyphs)
            },
        }
    }

}

/// Shared state of one `generate` run: the source face, the resolved
/// subset, and the tables built so far.
pub(crate) struct Context<'r, 'a> {
    pub face: &'r Face<'a>,
    pub glyphs: &'r [SubsetGlyph<'a>],
    pub glyph_map: &'r FxHashMap<u16, u16>,
    /// The used character codes, ascending.
    pub chars: Vec<u32>,
    pub tables: Vec<(Tag, Vec<u8>)>,
}

impl Context<'_, '_> {
    /// Push a rebuilt table.
    pub fn push(&mut self, tag: Tag, data: Vec<u8>) {
        debug_assert!(
            !self.tables.iter().any(|&(prev, _)| prev == tag),
            "duplicate {tag} table"
        );
        self.tables.push((tag, data));
    }
}

/// Assemble the rebuilt tables into a font file.
fn construct(mut ctx: Context) -> Vec<u8> {
    let mut w = Writer::new();
    w.write::<FontKind>(FontKind::TrueType);

    // Tables shall be sorted by tag.
    ctx.tables.sort_by_key(|&(tag, _)| tag);

    // Write the binary-search header fields.
    let count = ctx.tables.len() as u16;
    let entry_selector = (count as f32).log2().floor() as u16;
    let search_range = 2u16.pow(u32::from(entry_selector)) * 16;
    let range_shift = count * 16 - search_range;
    w.write(count);
    w.write(search_range);
    w.write(entry_selector);
    w.write(range_shift);

    // This variable will hold the offset to the checksum adjustment field
    // in the head table, which we'll have to write in the end (after
    // checksumming the whole font).
    let mut checksum_adjustment_offset = None;

    // Write table records.
    let mut offset = 12 + ctx.tables.len() * 16;
    for (tag, data) in &ctx.tables {
        if *tag == Tag::HEAD {
            checksum_adjustment_offset = Some(offset + 8);
        }

        w.write(TableRecord {
            tag: *tag,
            checksum: checksum(data),
            offset: offset as u32,
            length: data.len() as u32,
        });

        // Increase offset, plus padding zeros to align to 4 bytes.
        offset += data.len();
        while offset % 4 != 0 {
            offset += 1;
        }
    }

    // Write tables.
    for (_, data) in &ctx.tables {
        // Write data plus padding zeros to align to 4 bytes.
        w.extend(data);
        w.align(4);
    }

    // Write the checksum adjustment field in the head table.
    let mut data = w.finish();
    if let Some(i) = checksum_adjustment_offset {
        let sum = checksum(&data);
        let val = 0xB1B0AFBA_u32.wrapping_sub(sum);
        data[i..i + 4].copy_from_slice(&val.to_be_bytes());
    }

    data
}
