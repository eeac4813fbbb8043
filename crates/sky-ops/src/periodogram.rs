//! Periodogram peak selection and phase folding.
//!
//! The periodogram itself is computed by an external analysis service;
//! this module only pairs the returned frequency/power arrays, selects the
//! peak, and folds a magnitude time series by a chosen period so a phased
//! light curve can be plotted.

use serde::{Deserialize, Serialize};

use crate::{OpsError, OpsResult};

/// The selected periodogram peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Index into the sorted frequency/power arrays
    pub index: usize,
    /// Frequency at the peak (1/day)
    pub frequency: f64,
    /// Period at the peak (days)
    pub period: f64,
    /// Power at the peak
    pub power: f64,
}

/// Externally computed periodogram, sorted by frequency, with its peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Periodogram {
    /// Frequencies, ascending
    pub frequencies: Vec<f64>,
    /// Periods (`1 / frequency`), same order as `frequencies`
    pub periods: Vec<f64>,
    /// Power values, same order as `frequencies`
    pub power: Vec<f64>,
    /// Highest-power sample, `None` for an empty periodogram
    pub peak: Option<Peak>,
}

/// Pairs frequency/power arrays, sorts by frequency, and selects the peak.
///
/// Fails with [`OpsError::SizeMismatch`] if the arrays differ in length.
/// Empty inputs yield an empty periodogram with no peak.
pub fn select_peak(frequencies: &[f64], power: &[f64]) -> OpsResult<Periodogram> {
    if frequencies.len() != power.len() {
        return Err(OpsError::SizeMismatch(format!(
            "{} frequencies vs {} power values",
            frequencies.len(),
            power.len()
        )));
    }

    let mut pairs: Vec<(f64, f64)> = frequencies.iter().copied().zip(power.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let frequencies: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let power: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let periods: Vec<f64> = frequencies.iter().map(|f| 1.0 / f).collect();

    let peak = power
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(index, &p)| Peak {
            index,
            frequency: frequencies[index],
            period: periods[index],
            power: p,
        });

    Ok(Periodogram {
        frequencies,
        periods,
        power,
        peak,
    })
}

/// One sample of a magnitude time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagPoint {
    /// Observation time, Julian date
    pub julian_date: f64,
    /// Measured magnitude
    pub magnitude: f64,
    /// Phase in `[0, 1)` after folding
    pub phase: f64,
}

/// Folds a time series by `period`, writing each point's phase in `[0, 1)`.
pub fn fold_phase(series: &mut [MagPoint], period: f64) -> OpsResult<()> {
    if !(period.is_finite() && period > 0.0) {
        return Err(OpsError::InvalidParameter(format!(
            "fold period must be positive, got {period}"
        )));
    }
    let inv_period = 1.0 / period;
    for point in series.iter_mut() {
        point.phase = (point.julian_date % period) * inv_period;
    }
    Ok(())
}

/// Returns a copy of the series sorted by phase, for phased light curves.
pub fn sort_by_phase(series: &[MagPoint]) -> Vec<MagPoint> {
    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.phase.total_cmp(&b.phase));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_selection_sorts_by_frequency() {
        let freq = [2.0, 0.5, 1.0];
        let power = [3.0, 9.0, 6.0];
        let pg = select_peak(&freq, &power).unwrap();
        assert_eq!(pg.frequencies, vec![0.5, 1.0, 2.0]);
        assert_eq!(pg.power, vec![9.0, 6.0, 3.0]);
        assert_eq!(pg.periods, vec![2.0, 1.0, 0.5]);

        let peak = pg.peak.unwrap();
        assert_eq!(peak.index, 0);
        assert_eq!(peak.frequency, 0.5);
        assert_eq!(peak.period, 2.0);
        assert_eq!(peak.power, 9.0);
    }

    #[test]
    fn test_empty_periodogram_has_no_peak() {
        let pg = select_peak(&[], &[]).unwrap();
        assert!(pg.peak.is_none());
        assert!(pg.frequencies.is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(select_peak(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_fold_phase() {
        let mut series = vec![
            MagPoint { julian_date: 10.25, magnitude: 12.0, phase: 0.0 },
            MagPoint { julian_date: 11.75, magnitude: 12.5, phase: 0.0 },
        ];
        fold_phase(&mut series, 2.0).unwrap();
        assert!((series[0].phase - 0.125).abs() < 1e-12);
        assert!((series[1].phase - 0.875).abs() < 1e-12);

        let sorted = sort_by_phase(&series);
        assert!(sorted[0].phase <= sorted[1].phase);
    }

    #[test]
    fn test_fold_rejects_bad_period() {
        let mut series = vec![];
        assert!(fold_phase(&mut series, 0.0).is_err());
        assert!(fold_phase(&mut series, f64::NAN).is_err());
    }
}
