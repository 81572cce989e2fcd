//! Discretization of continuous layout values into bins.

/// Scale `pos` out of `total` into `0..=bins`.
///
/// Values at or beyond `total` land in the last bin, values at or below
/// zero in the first one. NaN lands in bin 0.
pub fn linear_scaling(pos: f64, total: f64, bins: u32) -> u32 {
    if pos >= total {
        return bins;
    }
    if pos <= 0.0 || pos.is_nan() {
        return 0;
    }
    let scaled = (pos / total * f64::from(bins)) as u32;
    scaled.min(bins)
}

/// Scale `value` within `[min, max]` into `0..=bins`.
pub fn scale_in_range(value: f64, min: f64, max: f64, bins: u32) -> u32 {
    linear_scaling(value - min, max - min, bins)
}
