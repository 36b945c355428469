//! Frequency response analysis
//!
//! Evaluates H(e^jω) of a coefficient set on a uniform grid in [0, Nyquist)
//! with a zero-padded real FFT. Used for the text-mode response report.

use std::fmt::Write as _;

use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;

use ap_core::SampleRate;

/// Default number of analysis points
pub const DEFAULT_POINTS: usize = 512;

/// Magnitude floor in dB (keeps log10(0) out of the report)
const MIN_DB: f64 = -300.0;

/// Sampled frequency response
#[derive(Debug, Clone)]
pub struct FrequencyResponse {
    /// Bin frequencies (Hz)
    pub freqs: Vec<f64>,
    /// Magnitude (dB)
    pub magnitude_db: Vec<f64>,
    /// Unwrapped phase (rad)
    pub phase: Vec<f64>,
    sample_rate: SampleRate,
}

impl FrequencyResponse {
    /// Compute the response of `coeffs` on `points` bins
    pub fn compute(coeffs: &[f64], fs: SampleRate, points: usize) -> Self {
        let points = points.max(1);
        let base = 2 * points;
        // Pad to a multiple of the base grid so every bin lands on the grid
        let stride = coeffs.len().div_ceil(base).max(1);
        let fft_size = base * stride;

        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let mut input = fft.make_input_vec();
        input[..coeffs.len()].copy_from_slice(coeffs);
        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum).ok();

        let bins: Vec<Complex<f64>> = spectrum
            .iter()
            .step_by(stride)
            .take(points)
            .copied()
            .collect();

        let freqs = (0..points)
            .map(|i| i as f64 * fs.nyquist() / points as f64)
            .collect();
        let magnitude_db = bins
            .iter()
            .map(|h| {
                let mag = h.norm();
                if mag > 0.0 { (20.0 * mag.log10()).max(MIN_DB) } else { MIN_DB }
            })
            .collect();
        let phase = unwrap_phase(&bins.iter().map(|h| h.arg()).collect::<Vec<_>>());

        Self {
            freqs,
            magnitude_db,
            phase,
            sample_rate: fs,
        }
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    fn nearest_bin(&self, freq: f64) -> usize {
        let step = self.sample_rate.nyquist() / self.len() as f64;
        ((freq / step).round().max(0.0) as usize).min(self.len() - 1)
    }

    /// Magnitude (dB) at the bin nearest to `freq`
    pub fn magnitude_db_at(&self, freq: f64) -> f64 {
        self.magnitude_db[self.nearest_bin(freq)]
    }

    /// Phase (rad) at the bin nearest to `freq`
    pub fn phase_at(&self, freq: f64) -> f64 {
        self.phase[self.nearest_bin(freq)]
    }

    /// Log-spaced text table from 20 Hz to Nyquist
    pub fn render_table(&self, title: &str, rows: usize) -> String {
        let rows = rows.max(2);
        let f_lo: f64 = 20.0;
        let f_hi = self.sample_rate.nyquist() * (1.0 - 1.0 / self.len() as f64);

        let mut out = String::new();
        let _ = writeln!(out, "{title} - Frequency Response");
        let _ = writeln!(out, "{:>10}  {:>9}  {:>10}", "Freq (Hz)", "Mag (dB)", "Phase (rad)");
        for r in 0..rows {
            let t = r as f64 / (rows - 1) as f64;
            let freq = f_lo * (f_hi / f_lo).powf(t);
            let db = self.magnitude_db_at(freq);
            // one '#' per 3 dB above -60 dB
            let bar = "#".repeat(((db + 60.0) / 3.0).clamp(0.0, 40.0) as usize);
            let _ = writeln!(
                out,
                "{:>10.1}  {:>9.2}  {:>10.3}  {}",
                freq,
                db,
                self.phase_at(freq),
                bar
            );
        }
        out
    }
}

/// Remove 2π jumps between consecutive phase samples
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    use std::f64::consts::PI;

    let mut out = Vec::with_capacity(phase.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;
    for &p in phase {
        if let Some(prev) = prev {
            let delta = p - prev;
            if delta > PI {
                offset -= 2.0 * PI * ((delta + PI) / (2.0 * PI)).floor();
            } else if delta < -PI {
                offset += 2.0 * PI * ((-delta + PI) / (2.0 * PI)).floor();
            }
        }
        out.push(p + offset);
        prev = Some(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_impulse_is_flat() {
        let mut h = vec![0.0; 31];
        h[0] = 1.0;
        let resp = FrequencyResponse::compute(&h, SampleRate::default(), 256);
        assert_eq!(resp.len(), 256);
        assert!(resp.magnitude_db.iter().all(|db| db.abs() < 1e-9));
        assert!(resp.phase.iter().all(|p| p.abs() < 1e-9));
    }

    #[test]
    fn test_bin_frequencies() {
        let resp = FrequencyResponse::compute(&[1.0], SampleRate::default(), 512);
        assert_eq!(resp.freqs[0], 0.0);
        assert!((resp.freqs[256] - 12000.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_filter_uses_strided_grid() {
        // Delayed impulse longer than the base grid: magnitude stays flat
        let mut h = vec![0.0; 3000];
        h[1500] = 1.0;
        let resp = FrequencyResponse::compute(&h, SampleRate::default(), 512);
        assert_eq!(resp.len(), 512);
        assert!(resp.magnitude_db.iter().all(|db| db.abs() < 1e-9));
    }

    #[test]
    fn test_linear_phase_slope() {
        // Two-tap average: phase = -ω/2
        let resp = FrequencyResponse::compute(&[0.5, 0.5], SampleRate::default(), 64);
        let f = resp.freqs[16];
        let omega = 2.0 * PI * f / 48000.0;
        assert!((resp.phase[16] + omega / 2.0).abs() < 1e-9);
        assert!(resp.magnitude_db_at(0.0).abs() < 1e-9);
    }

    #[test]
    fn test_unwrap() {
        let wrapped = [3.0, -3.0, 3.0 - 2.0 * PI - 0.1];
        let un = unwrap_phase(&wrapped);
        assert!((un[1] - (-3.0 + 2.0 * PI)).abs() < 1e-12);
        assert!((un[1] - un[0]).abs() < PI);
        assert!((un[2] - un[1]).abs() < PI);
    }

    #[test]
    fn test_render_table() {
        let resp = FrequencyResponse::compute(&[1.0], SampleRate::default(), 128);
        let table = resp.render_table("hp:1000", 8);
        assert!(table.starts_with("hp:1000 - Frequency Response"));
        assert_eq!(table.lines().count(), 10);
    }
}
