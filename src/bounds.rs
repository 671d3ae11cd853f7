use tracing::debug;

use crate::types::{Bounds, TextFragment};
use crate::utils::FrequencyTable;

/// Find the most common left edge, right edge and font size across `fragments`.
///
/// Left edges are rounded down, right edges (`x + width`) and font sizes are
/// rounded up before counting. Fragments whose font size cannot be parsed do
/// not vote for the font size; non-finite geometry does not vote for an edge.
pub fn estimate_bounds(fragments: &[TextFragment]) -> Bounds {
    let mut font_sizes = FrequencyTable::new();
    let mut lefts = FrequencyTable::new();
    let mut rights = FrequencyTable::new();

    for fragment in fragments {
        if let Some(font_size) = fragment.font_size() {
            font_sizes.increment(font_size);
        }

        let left = fragment.x().floor();
        let right = (fragment.x() + fragment.width()).ceil();

        if left.is_finite() && right.is_finite() {
            lefts.increment(left as i64);
            rights.increment(right as i64);
        } else {
            debug!("skipping non-finite geometry for bounds: {}", fragment);
        }
    }

    let bounds = Bounds {
        left: lefts.mode(),
        right: rights.mode(),
        font_size: font_sizes.mode(),
    };

    debug!(
        "bounds {} from {} fragments ({} left edges, {} right edges, {} sizes; {} share the dominant size)",
        bounds,
        fragments.len(),
        lefts.len(),
        rights.len(),
        font_sizes.len(),
        bounds.font_size.map_or(0, |size| font_sizes.count(&size)),
    );

    bounds
}
