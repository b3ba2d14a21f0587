//! The `hmtx` table stores one advance width and left side bearing per
//! glyph, with a compression trick: trailing glyphs may share the last
//! advance and store only a bearing.
//!
//! The subset expands that back out and writes a full long metric for
//! every glyph, so `hhea.numberOfHMetrics` always equals the glyph count.

use crate::stream::{Reader, Writer};
use crate::subset::Context;
use crate::{Result, Tag};

/// The horizontal metrics of one glyph, in design units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HorMetric {
    pub advance: u16,
    pub lsb: i16,
}

/// Parse the metrics of every glyph, expanding the shared-advance run.
pub(crate) fn parse(
    hmtx: &[u8],
    num_h_metrics: u16,
    num_glyphs: u16,
) -> Result<Vec<HorMetric>> {
    let mut r = Reader::new(hmtx);
    let mut metrics = Vec::with_capacity(usize::from(num_glyphs));

    let mut advance = 0;
    for _ in 0..num_h_metrics.min(num_glyphs) {
        advance = r.read::<u16>()?;
        let lsb = r.read::<i16>()?;
        metrics.push(HorMetric { advance, lsb });
    }

    for _ in num_h_metrics..num_glyphs {
        let lsb = r.read::<i16>()?;
        metrics.push(HorMetric { advance, lsb });
    }

    Ok(metrics)
}

/// Build the subset `hmtx`: the original design-unit metrics of each kept
/// glyph, ordered by new glyph id.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut w = Writer::new();

    for glyph in ctx.glyphs {
        let metric = ctx.face.hor_metric(glyph.old_id).unwrap_or_default();
        w.write::<u16>(metric.advance);
        w.write::<i16>(metric.lsb);
    }

    ctx.push(Tag::HMTX, w.finish());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_metrics_share_the_last_advance() {
        let mut data = vec![];
        for (advance, lsb) in [(500u16, 10i16), (600, 20)] {
            data.extend(advance.to_be_bytes());
            data.extend(lsb.to_be_bytes());
        }
        data.extend(30i16.to_be_bytes());
        data.extend((-5i16).to_be_bytes());

        let metrics = parse(&data, 2, 4).unwrap();
        assert_eq!(
            metrics,
            vec![
                HorMetric { advance: 500, lsb: 10 },
                HorMetric { advance: 600, lsb: 20 },
                HorMetric { advance: 600, lsb: 30 },
                HorMetric { advance: 600, lsb: -5 },
            ]
        );
    }

    #[test]
    fn truncated_table_fails() {
        let data = [0u8; 6];
        assert!(parse(&data, 2, 2).is_err());
    }
}
