//! Textual filter specifications
//!
//! A spec is `<type>:<param>[,<param>...]`, e.g. `hp:80`, `bp:100,200`,
//! `peak:1000,2,-3` or `ls:500,-3`. The type token is case-insensitive.

use std::fmt;
use std::str::FromStr;

use ap_core::{FirError, FirResult};

/// Filter family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Highpass,
    Lowpass,
    Bandpass,
    Bandstop,
    Peaking,
    HighShelf,
    LowShelf,
}

impl FilterKind {
    /// Resolve a type token (or one of its aliases)
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "hp" | "highpass" => Some(Self::Highpass),
            "lp" | "lowpass" => Some(Self::Lowpass),
            "bp" | "bandpass" => Some(Self::Bandpass),
            "bs" | "bandstop" | "notch" => Some(Self::Bandstop),
            "peak" | "peaking" => Some(Self::Peaking),
            "hs" | "highshelf" => Some(Self::HighShelf),
            "ls" | "lowshelf" => Some(Self::LowShelf),
            _ => None,
        }
    }

    /// Number of parameters the type expects
    pub fn arity(self) -> usize {
        match self {
            Self::Highpass | Self::Lowpass => 1,
            Self::Bandpass | Self::Bandstop | Self::HighShelf | Self::LowShelf => 2,
            Self::Peaking => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Highpass => "highpass",
            Self::Lowpass => "lowpass",
            Self::Bandpass => "bandpass",
            Self::Bandstop => "bandstop",
            Self::Peaking => "peaking",
            Self::HighShelf => "highshelf",
            Self::LowShelf => "lowshelf",
        }
    }

    /// Short token used when printing a spec
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Highpass => "hp",
            Self::Lowpass => "lp",
            Self::Bandpass => "bp",
            Self::Bandstop => "bs",
            Self::Peaking => "peak",
            Self::HighShelf => "hs",
            Self::LowShelf => "ls",
        }
    }

    /// Designs that need a center tap (even tap counts are bumped to odd)
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            Self::Highpass | Self::Bandpass | Self::Bandstop | Self::Peaking
        )
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed filter request; the variant fixes the parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterSpec {
    Highpass { cutoff: f64 },
    Lowpass { cutoff: f64 },
    Bandpass { low: f64, high: f64 },
    Bandstop { low: f64, high: f64 },
    Peaking { freq: f64, q: f64, gain_db: f64 },
    HighShelf { freq: f64, gain_db: f64 },
    LowShelf { freq: f64, gain_db: f64 },
}

impl FilterSpec {
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Highpass { .. } => FilterKind::Highpass,
            Self::Lowpass { .. } => FilterKind::Lowpass,
            Self::Bandpass { .. } => FilterKind::Bandpass,
            Self::Bandstop { .. } => FilterKind::Bandstop,
            Self::Peaking { .. } => FilterKind::Peaking,
            Self::HighShelf { .. } => FilterKind::HighShelf,
            Self::LowShelf { .. } => FilterKind::LowShelf,
        }
    }

    /// Frequencies (Hz) named by the spec, in parameter order
    pub fn frequencies(&self) -> Vec<f64> {
        match *self {
            Self::Highpass { cutoff } | Self::Lowpass { cutoff } => vec![cutoff],
            Self::Bandpass { low, high } | Self::Bandstop { low, high } => vec![low, high],
            Self::Peaking { freq, .. }
            | Self::HighShelf { freq, .. }
            | Self::LowShelf { freq, .. } => vec![freq],
        }
    }

    /// Raw parameters in spec order
    fn params(&self) -> Vec<f64> {
        match *self {
            Self::Highpass { cutoff } | Self::Lowpass { cutoff } => vec![cutoff],
            Self::Bandpass { low, high } | Self::Bandstop { low, high } => vec![low, high],
            Self::Peaking { freq, q, gain_db } => vec![freq, q, gain_db],
            Self::HighShelf { freq, gain_db } | Self::LowShelf { freq, gain_db } => {
                vec![freq, gain_db]
            }
        }
    }
}

/// Parse a filter specification string
pub fn parse_spec(spec: &str) -> FirResult<FilterSpec> {
    let invalid = || FirError::InvalidSpecFormat {
        spec: spec.to_string(),
    };

    let (token, block) = spec.split_once(':').ok_or_else(invalid)?;
    let token = token.trim();
    let block = block.trim();
    if token.is_empty() || block.is_empty() || block.contains(':') {
        return Err(invalid());
    }

    let kind = FilterKind::from_token(token).ok_or_else(|| FirError::UnknownFilterType {
        token: token.to_string(),
    })?;

    let raw: Vec<&str> = block.split(',').map(str::trim).collect();
    if raw.len() != kind.arity() {
        return Err(FirError::ArityMismatch {
            kind: kind.name(),
            expected: kind.arity(),
            got: raw.len(),
        });
    }

    let p = raw
        .iter()
        .map(|s| parse_number(s))
        .collect::<FirResult<Vec<f64>>>()?;

    Ok(match kind {
        FilterKind::Highpass => FilterSpec::Highpass { cutoff: p[0] },
        FilterKind::Lowpass => FilterSpec::Lowpass { cutoff: p[0] },
        FilterKind::Bandpass => FilterSpec::Bandpass { low: p[0], high: p[1] },
        FilterKind::Bandstop => FilterSpec::Bandstop { low: p[0], high: p[1] },
        FilterKind::Peaking => FilterSpec::Peaking {
            freq: p[0],
            q: p[1],
            gain_db: p[2],
        },
        FilterKind::HighShelf => FilterSpec::HighShelf {
            freq: p[0],
            gain_db: p[1],
        },
        FilterKind::LowShelf => FilterSpec::LowShelf {
            freq: p[0],
            gain_db: p[1],
        },
    })
}

fn parse_number(s: &str) -> FirResult<f64> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FirError::NumericParseError {
            value: s.to_string(),
        }),
    }
}

impl FromStr for FilterSpec {
    type Err = FirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_spec(s)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params().iter().map(|p| p.to_string()).collect();
        write!(f, "{}:{}", self.kind().short_name(), params.join(","))
    }
}
