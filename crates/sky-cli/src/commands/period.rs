//! Periodogram peak selection and phase folding command

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sky_ops::periodogram::{MagPoint, fold_phase, select_peak, sort_by_phase};

use crate::PeriodArgs;

#[derive(Debug, Deserialize)]
struct LightCurveFile {
    frequency: Vec<f64>,
    power: Vec<f64>,
    #[serde(default)]
    jd: Vec<f64>,
    #[serde(default)]
    mag: Vec<f64>,
}

pub fn run(args: PeriodArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read light curve: {}", args.input.display()))?;
    let curve: LightCurveFile = serde_json::from_str(&text)
        .with_context(|| format!("invalid light curve: {}", args.input.display()))?;

    let periodogram = select_peak(&curve.frequency, &curve.power)?;
    let Some(peak) = periodogram.peak else {
        bail!("empty periodogram, nothing to select");
    };
    println!(
        "peak: frequency {:.6} 1/day, period {:.6} days, power {:.4}",
        peak.frequency, peak.period, peak.power
    );

    if args.fold {
        if curve.jd.len() != curve.mag.len() {
            bail!(
                "{} jd values vs {} magnitudes",
                curve.jd.len(),
                curve.mag.len()
            );
        }
        if curve.jd.is_empty() {
            bail!("no magnitude series to fold");
        }
        let period = args.period.unwrap_or(peak.period);
        let mut series: Vec<MagPoint> = curve
            .jd
            .iter()
            .zip(&curve.mag)
            .map(|(&julian_date, &magnitude)| MagPoint {
                julian_date,
                magnitude,
                phase: 0.0,
            })
            .collect();
        fold_phase(&mut series, period)?;
        let sorted = sort_by_phase(&series);

        println!("folded at {period:.6} days:");
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    }
    Ok(())
}
