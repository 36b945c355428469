//! `armonia fir`: design, report, save, and upload FIR filters

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};

use ap_connector::{ConnectionConfig, DeviceClient, FirTarget};
use ap_core::{
    Coefficients, DEFAULT_SAMPLE_RATE, DEFAULT_TAPS, DEVICE_MAX_TAPS, DeviceLimit, SampleRate,
    TapCount,
};
use ap_dsp::response::DEFAULT_POINTS;
use ap_dsp::{FrequencyResponse, combine, design_all, fit_to_device};

/// Rows in the `--visualize` table
const REPORT_ROWS: usize = 24;

/// FIR slot selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    #[default]
    Output,
    Speaker,
}

impl From<Target> for FirTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Output => FirTarget::Output,
            Target::Speaker => FirTarget::Speaker,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FirArgs {
    /// Number of filter taps (odd number recommended)
    #[arg(long, default_value_t = DEFAULT_TAPS)]
    pub taps: usize,

    /// Sample rate in Hz, or a preset: standard (48k), high (96k), ultra (192k)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE, value_parser = parse_sample_rate)]
    pub fs: u32,

    /// Filter specifications (e.g. 'hp:1000', 'ls:500,-3')
    #[arg(long, num_args = 1.., required = true)]
    pub filters: Vec<String>,

    /// Weights for combining filters (default: equal weights)
    #[arg(long, num_args = 1..)]
    pub weights: Option<Vec<f64>>,

    /// Print the frequency response
    #[arg(long)]
    pub visualize: bool,

    /// Device to apply the filter to
    #[arg(long)]
    pub device_id: Option<String>,

    /// Device channel to apply the filter to
    #[arg(long)]
    pub channel: Option<u32>,

    /// FIR slot on the device
    #[arg(long, value_enum, default_value_t = Target::Output)]
    pub target: Target,

    /// Write the coefficients to a JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Truncate the filter to the device maximum if needed
    #[arg(long)]
    pub truncate: bool,
}

fn parse_sample_rate(s: &str) -> Result<u32, String> {
    if let Some(rate) = SampleRate::preset(s) {
        return Ok(rate.as_u32());
    }
    s.parse::<u32>()
        .map_err(|_| format!("expected Hz or one of standard, high, ultra; got '{s}'"))
}

impl FirArgs {
    fn device(&self) -> Option<(&str, u32)> {
        match (&self.device_id, self.channel) {
            (Some(id), Some(ch)) => Some((id.as_str(), ch)),
            _ => None,
        }
    }
}

/// Designed filter plus the copy prepared for the device
#[derive(Debug, Clone)]
pub struct FirPlan {
    pub filter: Coefficients,
    pub device_filter: Coefficients,
    pub sample_rate: SampleRate,
    pub title: String,
}

/// Design, combine, and (optionally) fit the requested filters
pub fn build(args: &FirArgs) -> Result<FirPlan> {
    let mut taps = TapCount::new(args.taps)?;
    if !taps.is_odd() {
        taps = TapCount::new(taps.symmetric())?;
        log::info!("Adjusted taps to odd number: {}", taps);
    }
    let sample_rate = SampleRate::new(args.fs)?;

    let mut filters = Vec::new();
    let mut designed = Vec::new();
    for (spec, result) in design_all(&args.filters, taps, sample_rate) {
        match result {
            Ok(coeffs) => {
                log::info!("Generated filter: {}", spec);
                filters.push(coeffs);
                designed.push(spec);
            }
            Err(e) => log::error!("Error: {} ({})", e, spec),
        }
    }

    let filter = match filters.len() {
        0 => bail!("No valid filters specified"),
        1 => filters.remove(0),
        n => {
            let combined = combine(&filters, args.weights.as_deref())
                .context("Failed to combine filters")?;
            log::info!("Combined {} filters", n);
            combined
        }
    };

    let device_filter = if args.device().is_some() && args.truncate {
        fit_to_device(filter.clone(), DeviceLimit::default())
    } else {
        filter.clone()
    };

    Ok(FirPlan {
        filter,
        device_filter,
        sample_rate,
        title: designed.join(" + "),
    })
}

/// Compact literal list, ready to paste into a function call
pub fn format_list(coeffs: &[f64]) -> String {
    let items: Vec<String> = coeffs.iter().map(f64::to_string).collect();
    format!("[{}]", items.join(","))
}

/// Write the coefficients as a JSON array
pub fn write_json(path: &Path, coeffs: &[f64]) -> Result<()> {
    let json = serde_json::to_string(coeffs)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to save to file: {}", path.display()))?;
    Ok(())
}

pub async fn run(args: FirArgs, config: ConnectionConfig) -> Result<()> {
    let plan = build(&args)?;

    println!("\nGenerated {} filter coefficients", plan.filter.len());

    if args.visualize {
        let response = FrequencyResponse::compute(&plan.filter, plan.sample_rate, DEFAULT_POINTS);
        println!("\n{}", response.render_table(&plan.title, REPORT_ROWS));
    }

    println!("\nFilter coefficients for function call:");
    println!("{}", format_list(&plan.device_filter));

    if let Some(path) = &args.output {
        write_json(path, &plan.filter)?;
        println!("Saved filter coefficients to {}", path.display());
    }

    if let Some((device_id, channel)) = args.device() {
        if plan.device_filter.len() > DEVICE_MAX_TAPS {
            bail!(
                "Filter too large for the controller ({} taps, maximum {}). \
                 Use --truncate to resize the filter for the device.",
                plan.device_filter.len(),
                DEVICE_MAX_TAPS
            );
        }

        let client = DeviceClient::new(config)?;
        client
            .set_fir(args.target.into(), device_id, channel, &plan.device_filter)
            .await
            .context("Failed to apply filter")?;
        println!("Successfully applied filter to device {device_id}, channel {channel}");
    }

    Ok(())
}
