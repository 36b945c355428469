//! ap-dsp: FIR filter design for the ArmoníaPlus tools
//!
//! Turns human-readable specs into linear phase FIR coefficients.
//!
//! ## Modules
//! - `spec` - `type:params` parser (`hp:80`, `bp:100,200`, `peak:1000,2,-3`, ...)
//! - `fir` - windowed-sinc primitive and per-family synthesizers
//! - `biquad` - biquad section used for the peaking IIR → FIR step
//! - `window` - Hamming window
//! - `combine` - weighted superposition of several filters
//! - `device` - fit a filter to a device tap ceiling
//! - `response` - frequency response analysis for reporting

pub mod biquad;
pub mod combine;
pub mod device;
pub mod fir;
pub mod response;
pub mod spec;
pub mod window;

pub use combine::combine;
pub use device::fit_to_device;
pub use fir::{Shelf, bandpass, bandstop, firwin, highpass, lowpass, peaking, shelving};
pub use response::FrequencyResponse;
pub use spec::{FilterKind, FilterSpec, parse_spec};

use ap_core::{Coefficients, FirError, FirResult, SampleRate, TapCount};

/// Synthesize the coefficients for one parsed spec
///
/// Symmetric kinds bump an even tap count to odd. A design that ends up
/// with any non-finite tap is refused.
pub fn design(spec: &FilterSpec, taps: TapCount, fs: SampleRate) -> FirResult<Coefficients> {
    let kind = spec.kind();
    if kind.is_symmetric() && !taps.is_odd() {
        log::debug!("{} needs a center tap, using {} taps", kind, taps.symmetric());
    }

    let coeffs = match *spec {
        FilterSpec::Highpass { cutoff } => highpass(taps, cutoff, fs),
        FilterSpec::Lowpass { cutoff } => lowpass(taps, cutoff, fs),
        FilterSpec::Bandpass { low, high } => bandpass(taps, low, high, fs),
        FilterSpec::Bandstop { low, high } => bandstop(taps, low, high, fs),
        FilterSpec::Peaking { freq, q, gain_db } => peaking(taps, freq, q, gain_db, fs),
        FilterSpec::HighShelf { freq, gain_db } => shelving(taps, freq, gain_db, Shelf::High, fs),
        FilterSpec::LowShelf { freq, gain_db } => shelving(taps, freq, gain_db, Shelf::Low, fs),
    }?;

    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(FirError::NonFiniteCoefficients { kind: kind.name() });
    }

    log::debug!("designed {} with {} taps at {}", spec, coeffs.len(), fs);
    Ok(coeffs)
}

/// Parse and design a spec string in one step
pub fn design_str(spec: &str, taps: TapCount, fs: SampleRate) -> FirResult<Coefficients> {
    design(&parse_spec(spec)?, taps, fs)
}

/// Design every spec independently.
///
/// Each entry keeps its own result so one bad spec does not abort the rest.
pub fn design_all<S: AsRef<str>>(
    specs: &[S],
    taps: TapCount,
    fs: SampleRate,
) -> Vec<(String, FirResult<Coefficients>)> {
    specs
        .iter()
        .map(|s| {
            let s = s.as_ref();
            (s.to_string(), design_str(s, taps, fs))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_dispatch_lengths() {
        let taps = TapCount::new(100).unwrap();
        let fs = SampleRate::default();
        let expected = [
            ("hp:1000", 101),
            ("lp:1000", 100),
            ("bp:100,200", 101),
            ("bs:100,200", 101),
            ("peak:1000,2,3", 101),
            ("hs:1000,3", 100),
            ("ls:1000,3", 100),
        ];
        for (spec, len) in expected {
            assert_eq!(design_str(spec, taps, fs).unwrap().len(), len, "{spec}");
        }
    }

    #[test]
    fn test_design_all_continues_past_errors() {
        let results = design_all(
            &["hp:1000", "xyz:1", "lp:30000", "ls:500,-3"],
            TapCount::new(63).unwrap(),
            SampleRate::default(),
        );
        assert_eq!(results.len(), 4);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(FirError::UnknownFilterType { .. })));
        assert!(matches!(results[2].1, Err(FirError::OutOfRangeFrequency { .. })));
        assert!(results[3].1.is_ok());
        assert_eq!(results[3].0, "ls:500,-3");
    }

    #[test]
    fn test_overflowing_gain_is_refused() {
        let taps = TapCount::new(101).unwrap();
        let fs = SampleRate::default();
        for spec in ["ls:500,7000", "hs:500,7000", "peak:1000,1,20000", "peak:1000,1,-20000"] {
            let result = design_str(spec, taps, fs);
            assert!(matches!(result, Err(FirError::InvalidGain { .. })), "{spec}: {result:?}");
        }
    }

    #[test]
    fn test_large_finite_gains_stay_finite() {
        let taps = TapCount::new(101).unwrap();
        let fs = SampleRate::default();
        for spec in ["ls:500,60", "hs:500,-60", "peak:1000,1,40", "peak:1000,1,-40"] {
            let h = design_str(spec, taps, fs).unwrap();
            assert!(h.iter().all(|c| c.is_finite()), "{spec}");
        }
    }

    #[test]
    fn test_non_finite_design_is_refused() {
        // a subnormal Q overflows the biquad's alpha term
        let taps = TapCount::new(101).unwrap();
        let result = design_str("peak:1000,1e-310,3", taps, SampleRate::default());
        assert_eq!(result, Err(FirError::NonFiniteCoefficients { kind: "peaking" }));
    }
}
