use ndarray::Zip;

use crate::error::{ImpactError, Result};
use crate::raster::{ChangeMask, RasterObservation};

/// Flag every cell where `pre - post < threshold`.
///
/// Flagged cells are `1`; every other cell, including cells missing data in
/// either observation, is left undefined rather than set to `0`.
pub fn detect_change(pre: &RasterObservation, post: &RasterObservation, threshold: f64) -> Result<ChangeMask> {
    if !threshold.is_finite() {
        return Err(ImpactError::config("detection.threshold", "threshold must be finite"));
    }
    pre.grid().ensure_matches(post.grid())?;

    let cells = Zip::from(pre.values()).and(post.values())
        .par_map_collect(|&a, &b| (a - b < threshold).then_some(1u8));

    let mask = ChangeMask::from_cells_unchecked(*pre.grid(), cells);
    tracing::debug!(
        threshold,
        flagged = mask.flagged_count(),
        cells = pre.grid().rows * pre.grid().cols,
        "detected change"
    );
    Ok(mask)
}
