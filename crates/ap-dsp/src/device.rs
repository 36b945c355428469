//! Fitting a filter to a device's tap ceiling

use ap_core::{Coefficients, DeviceLimit};

/// Cut `coeffs` down to at most `limit` taps around its temporal center.
///
/// Sequences that already fit are returned untouched. Otherwise the window
/// `[center - limit/2, center - limit/2 + limit)` is kept, which preserves
/// the center tap of a linear phase design.
pub fn fit_to_device(coeffs: Coefficients, limit: DeviceLimit) -> Coefficients {
    let limit = limit.get();
    let len = coeffs.len();
    if len <= limit {
        return coeffs;
    }

    let center = len / 2;
    let start = center - limit / 2;
    let end = start + limit;
    log::warn!(
        "Filter size ({} taps) exceeds device maximum ({}); keeping taps {}..{}",
        len,
        limit,
        start,
        end
    );

    coeffs[start..end].to_vec()
}
