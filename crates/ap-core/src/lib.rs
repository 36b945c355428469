//! ap-core: Shared types for the ArmoníaPlus FIR tools
//!
//! Domain types, constants, and the error taxonomy used by the
//! filter-design core and the device connector.

mod error;
mod taps;

pub use error::*;
pub use taps::*;

/// Filter coefficients (impulse response), index 0..N-1
pub type Coefficients = Vec<f64>;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default tap count used by the driver
pub const DEFAULT_TAPS: usize = 1023;

/// Maximum number of taps the device controller accepts per FIR slot
pub const DEVICE_MAX_TAPS: usize = 2048;

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SampleRate(u32);

impl SampleRate {
    pub fn new(hz: u32) -> FirResult<Self> {
        if hz == 0 {
            return Err(FirError::InvalidSampleRate(hz));
        }
        Ok(Self(hz))
    }

    /// Named presets: `standard`, `high`, `ultra`
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self(48_000)),
            "high" => Some(Self(96_000)),
            "ultra" => Some(Self(192_000)),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    #[inline]
    pub fn nyquist(self) -> f64 {
        0.5 * self.0 as f64
    }

    /// Normalize a frequency to a fraction of Nyquist.
    ///
    /// Fails unless the result lies in the open interval (0, 1).
    pub fn normalize(self, freq: f64) -> FirResult<f64> {
        let nyquist = self.nyquist();
        if !freq.is_finite() || freq <= 0.0 || freq >= nyquist {
            return Err(FirError::OutOfRangeFrequency { freq, nyquist });
        }
        Ok(freq / nyquist)
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self(DEFAULT_SAMPLE_RATE)
    }
}

impl std::fmt::Display for SampleRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let fs = SampleRate::default();
        assert!((fs.normalize(12000.0).unwrap() - 0.5).abs() < 1e-12);
        assert!(fs.normalize(0.0).is_err());
        assert!(fs.normalize(24000.0).is_err());
        assert!(fs.normalize(-10.0).is_err());
        assert!(fs.normalize(f64::NAN).is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(SampleRate::preset("standard").map(SampleRate::as_u32), Some(48_000));
        assert_eq!(SampleRate::preset("HIGH").map(SampleRate::as_u32), Some(96_000));
        assert_eq!(SampleRate::preset("ultra").map(SampleRate::as_u32), Some(192_000));
        assert!(SampleRate::preset("cd").is_none());
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert_eq!(SampleRate::new(0), Err(FirError::InvalidSampleRate(0)));
    }

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-12);
        assert!((db_to_linear(-6.0) - 0.501187).abs() < 1e-5);
    }
}
