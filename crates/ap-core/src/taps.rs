//! Tap-count types

use serde::{Deserialize, Serialize};

use crate::{DEVICE_MAX_TAPS, FirError, FirResult};

/// Number of coefficients requested for a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TapCount(usize);

impl TapCount {
    pub fn new(taps: usize) -> FirResult<Self> {
        if taps == 0 {
            return Err(FirError::InvalidTapCount(taps));
        }
        Ok(Self(taps))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    /// Length used by symmetric designs that need a center tap.
    ///
    /// Even counts are bumped to the next odd integer.
    #[inline]
    pub fn symmetric(self) -> usize {
        if self.is_odd() { self.0 } else { self.0 + 1 }
    }
}

impl Default for TapCount {
    fn default() -> Self {
        Self(crate::DEFAULT_TAPS)
    }
}

impl std::fmt::Display for TapCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum tap count accepted by a downstream device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceLimit(usize);

impl DeviceLimit {
    pub fn new(limit: usize) -> FirResult<Self> {
        if limit == 0 {
            return Err(FirError::InvalidLimit { limit: 0 });
        }
        Ok(Self(limit))
    }

    /// Build from a signed driver value, rejecting anything <= 0.
    pub fn from_signed(limit: i64) -> FirResult<Self> {
        if limit <= 0 {
            return Err(FirError::InvalidLimit { limit });
        }
        Ok(Self(limit as usize))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for DeviceLimit {
    fn default() -> Self {
        Self(DEVICE_MAX_TAPS)
    }
}
