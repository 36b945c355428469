//! Error types for FIR design

use thiserror::Error;

/// Core error type
///
/// Every variant stems from invalid input, so none of them is retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FirError {
    #[error("Invalid filter specification: {spec} (expected <type>:<params>)")]
    InvalidSpecFormat { spec: String },

    #[error("Unknown filter type: {token}")]
    UnknownFilterType { token: String },

    #[error("{kind} filter requires {expected} parameter(s), got {got}")]
    ArityMismatch {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid numeric parameter: {value:?}")]
    NumericParseError { value: String },

    #[error("Frequency out of range: {freq} Hz (must be > 0 and < Nyquist {nyquist} Hz)")]
    OutOfRangeFrequency { freq: f64, nyquist: f64 },

    #[error("Invalid band: low edge {low} Hz must be below high edge {high} Hz")]
    InvalidBand { low: f64, high: f64 },

    #[error("Invalid Q factor: {q} (must be > 0)")]
    InvalidQ { q: f64 },

    #[error("Invalid gain: {gain_db} dB (linear gain must be finite and non-zero)")]
    InvalidGain { gain_db: f64 },

    #[error("{kind} design produced non-finite coefficients")]
    NonFiniteCoefficients { kind: &'static str },

    #[error("No filters to combine")]
    EmptyInput,

    #[error("Weight count mismatch: {filters} filters, {weights} weights")]
    WeightCountMismatch { filters: usize, weights: usize },

    #[error("Invalid weight: {weight} (weights must be finite, non-negative and sum above zero)")]
    InvalidWeight { weight: f64 },

    #[error("Invalid device limit: {limit} (must be > 0)")]
    InvalidLimit { limit: i64 },

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Invalid tap count: {0}")]
    InvalidTapCount(usize),
}

impl FirError {
    /// Returns `true` for failures raised while parsing a spec string.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            FirError::InvalidSpecFormat { .. }
                | FirError::UnknownFilterType { .. }
                | FirError::ArityMismatch { .. }
                | FirError::NumericParseError { .. }
        )
    }

    /// Returns `true` for frequency and band-edge failures.
    pub fn is_frequency_error(&self) -> bool {
        matches!(
            self,
            FirError::OutOfRangeFrequency { .. } | FirError::InvalidBand { .. }
        )
    }

    /// Returns `true` for combiner precondition violations.
    pub fn is_combine_error(&self) -> bool {
        matches!(
            self,
            FirError::EmptyInput
                | FirError::WeightCountMismatch { .. }
                | FirError::InvalidWeight { .. }
        )
    }
}

/// Result type alias
pub type FirResult<T> = Result<T, FirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        let err = FirError::ArityMismatch {
            kind: "bandpass",
            expected: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "bandpass filter requires 2 parameter(s), got 1"
        );
    }

    #[test]
    fn test_frequency_display() {
        let err = FirError::OutOfRangeFrequency {
            freq: 25000.0,
            nyquist: 24000.0,
        };
        assert!(err.to_string().contains("25000"));
        assert!(err.to_string().contains("24000"));
    }

    #[test]
    fn test_classification() {
        let parse = FirError::UnknownFilterType {
            token: "xyz".into(),
        };
        assert!(parse.is_parse_error());
        assert!(!parse.is_frequency_error());

        let band = FirError::InvalidBand {
            low: 200.0,
            high: 100.0,
        };
        assert!(band.is_frequency_error());

        assert!(FirError::EmptyInput.is_combine_error());
        assert!(
            !FirError::NonFiniteCoefficients { kind: "peaking" }.is_parse_error()
        );
        assert!(!FirError::InvalidLimit { limit: 0 }.is_combine_error());
    }
}
