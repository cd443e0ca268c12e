use rand::Rng;

use crate::foundation::core::ValueRange;

/// `v` when finite, otherwise `fallback`.
pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Uniform sample in `[lo, hi)`; degenerate, inverted or non-finite ranges yield `lo`.
pub(crate) fn sample_between<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo && (hi - lo).is_finite() {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

pub(crate) fn sample_range<R: Rng + ?Sized>(rng: &mut R, range: ValueRange) -> f64 {
    sample_between(rng, range.min, range.max)
}

/// Uniform sample in `[-half, half)`.
pub(crate) fn sample_symmetric<R: Rng + ?Sized>(rng: &mut R, half: f64) -> f64 {
    let half = half.abs();
    sample_between(rng, -half, half)
}
