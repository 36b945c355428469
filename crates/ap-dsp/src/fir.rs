//! FIR filter synthesis
//!
//! Linear phase designs built on a Hamming-windowed sinc:
//! - Highpass / lowpass / bandpass / bandstop straight from [`firwin`]
//! - Peaking EQ via a biquad impulse response (IIR → FIR approximation)
//! - Low / high shelf assembled from a lowpass halfband

use std::f64::consts::PI;

use ap_core::{Coefficients, FirError, FirResult, SampleRate, TapCount, db_to_linear};

use crate::biquad::BiquadCoeffs;
use crate::window::apply_hamming;

/// Shelf side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Low,
    High,
}

#[inline]
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Windowed-sinc FIR design
///
/// `cutoffs` are fractions of Nyquist, strictly increasing inside (0, 1).
/// With `pass_zero` the first band starts at DC, otherwise at the first
/// cutoff. The result is scaled to unity gain at the center of its first
/// passband (DC, Nyquist, or the band center).
pub fn firwin(num_taps: usize, cutoffs: &[f64], pass_zero: bool) -> FirResult<Coefficients> {
    if num_taps == 0 {
        return Err(FirError::InvalidTapCount(num_taps));
    }
    if cutoffs.is_empty() {
        return Err(FirError::OutOfRangeFrequency {
            freq: 0.0,
            nyquist: 1.0,
        });
    }
    for &c in cutoffs {
        if !c.is_finite() || c <= 0.0 || c >= 1.0 {
            return Err(FirError::OutOfRangeFrequency { freq: c, nyquist: 1.0 });
        }
    }
    for pair in cutoffs.windows(2) {
        if pair[0] >= pair[1] {
            return Err(FirError::InvalidBand {
                low: pair[0],
                high: pair[1],
            });
        }
    }

    let mut edges = Vec::with_capacity(cutoffs.len() + 2);
    if pass_zero {
        edges.push(0.0);
    }
    edges.extend_from_slice(cutoffs);
    if edges.len() % 2 == 1 {
        edges.push(1.0);
    }

    // A passband touching Nyquist needs a center tap
    let pass_nyquist = edges.last().copied() == Some(1.0);
    if pass_nyquist && num_taps % 2 == 0 {
        return Err(FirError::InvalidTapCount(num_taps));
    }

    let alpha = 0.5 * (num_taps - 1) as f64;
    let mut h: Coefficients = (0..num_taps)
        .map(|n| {
            let m = n as f64 - alpha;
            edges
                .chunks_exact(2)
                .map(|band| band[1] * sinc(band[1] * m) - band[0] * sinc(band[0] * m))
                .sum()
        })
        .collect();

    apply_hamming(&mut h);

    let (left, right) = (edges[0], edges[1]);
    let scale_freq = if left == 0.0 {
        0.0
    } else if right == 1.0 {
        1.0
    } else {
        0.5 * (left + right)
    };
    let s: f64 = h
        .iter()
        .enumerate()
        .map(|(n, &c)| c * (PI * (n as f64 - alpha) * scale_freq).cos())
        .sum();
    for c in h.iter_mut() {
        *c /= s;
    }

    Ok(h)
}

/// Lowpass; length is exactly `taps`
pub fn lowpass(taps: TapCount, cutoff: f64, fs: SampleRate) -> FirResult<Coefficients> {
    firwin(taps.get(), &[fs.normalize(cutoff)?], true)
}

/// Highpass; even tap counts are bumped to odd
pub fn highpass(taps: TapCount, cutoff: f64, fs: SampleRate) -> FirResult<Coefficients> {
    firwin(taps.symmetric(), &[fs.normalize(cutoff)?], false)
}

/// Bandpass between `low` and `high`; even tap counts are bumped to odd
pub fn bandpass(taps: TapCount, low: f64, high: f64, fs: SampleRate) -> FirResult<Coefficients> {
    let band = normalize_band(low, high, fs)?;
    firwin(taps.symmetric(), &band, false)
}

/// Bandstop between `low` and `high`; even tap counts are bumped to odd
pub fn bandstop(taps: TapCount, low: f64, high: f64, fs: SampleRate) -> FirResult<Coefficients> {
    let band = normalize_band(low, high, fs)?;
    firwin(taps.symmetric(), &band, true)
}

fn normalize_band(low: f64, high: f64, fs: SampleRate) -> FirResult<[f64; 2]> {
    let lo = fs.normalize(low)?;
    let hi = fs.normalize(high)?;
    if lo >= hi {
        return Err(FirError::InvalidBand { low, high });
    }
    Ok([lo, hi])
}

/// Peaking EQ approximated from a biquad
///
/// The biquad impulse response is truncated to the (odd) tap count,
/// Hamming-windowed, and divided by the sum of its absolute values.
/// Short tap counts only approximate the IIR response near the peak.
pub fn peaking(
    taps: TapCount,
    center: f64,
    q: f64,
    gain_db: f64,
    fs: SampleRate,
) -> FirResult<Coefficients> {
    fs.normalize(center)?;
    if !q.is_finite() || q <= 0.0 {
        return Err(FirError::InvalidQ { q });
    }
    // A = 10^(gain/40) must survive as a usable divisor
    let a = 10.0_f64.powf(gain_db / 40.0);
    if !gain_db.is_finite() || !a.is_finite() || a == 0.0 {
        return Err(FirError::InvalidGain { gain_db });
    }

    let n = taps.symmetric();
    let mut h = BiquadCoeffs::peaking(center, q, gain_db, fs.as_f64()).impulse_response(n);
    apply_hamming(&mut h);

    let norm: f64 = h.iter().map(|c| c.abs()).sum();
    if norm > 0.0 {
        for c in h.iter_mut() {
            *c /= norm;
        }
    }

    Ok(h)
}

/// Shelving filter built from a lowpass halfband
///
/// Low shelf: `lp * (g - 1)` plus a unit center tap.
/// High shelf: the complementary highpass `δ - lp`, scaled by `(g - 1)`,
/// plus a unit center tap. Both get a final Hamming window. Length
/// follows the lowpass, i.e. exactly `taps`.
pub fn shelving(
    taps: TapCount,
    cutoff: f64,
    gain_db: f64,
    shelf: Shelf,
    fs: SampleRate,
) -> FirResult<Coefficients> {
    let gain = db_to_linear(gain_db);
    if !gain_db.is_finite() || !gain.is_finite() {
        return Err(FirError::InvalidGain { gain_db });
    }

    let halfband = lowpass(taps, cutoff, fs)?;
    let center = halfband.len() / 2;

    let mut h = match shelf {
        Shelf::High => {
            let mut highpass: Coefficients = halfband.iter().map(|c| -c).collect();
            highpass[center] += 1.0;
            highpass
        }
        Shelf::Low => halfband,
    };
    for c in h.iter_mut() {
        *c *= gain - 1.0;
    }
    h[center] += 1.0;

    apply_hamming(&mut h);

    Ok(h)
}
