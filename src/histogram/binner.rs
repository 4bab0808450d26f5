//! Histogram binning for one metric's sample values.
//!
//! The adaptive rule picks the bin width with the Freedman-Diaconis rule
//! (`2 * IQR / cbrt(n)`). Sturges' formula is used when the interquartile
//! range is zero or the width would need more than `MAX_ADAPTIVE_BINS`
//! bins. Equal samples get a single unit-width bin.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Largest bin count the Freedman-Diaconis rule may ask for before the
/// Sturges rule is used instead
pub const MAX_ADAPTIVE_BINS: usize = 1000;

/// How the number of bins is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinRule {
    /// Freedman-Diaconis with Sturges fallback
    #[default]
    Adaptive,
    /// Fixed number of equal-width bins between min and max
    Fixed(usize),
}

/// Binned counts with one label per bin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub data: Vec<usize>,
    pub labels: Vec<String>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.data.len()
    }

    /// Number of samples across all bins
    pub fn total(&self) -> usize {
        self.data.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Computes histograms with a configured bin rule
#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramBinner {
    rule: BinRule,
}

impl HistogramBinner {
    pub fn new(rule: BinRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> BinRule {
        self.rule
    }

    /// Bin the finite values of `samples`
    ///
    /// # Arguments
    /// * `samples` - Metric values; NaN and infinite values are ignored
    /// * `integer_valued` - Round the bin width to a whole number (minimum 1)
    ///
    /// # Returns
    /// Counts and `"{left} - {right}"` labels; empty when there are no
    /// finite samples
    pub fn bin(&self, samples: &[f64], integer_valued: bool) -> Histogram {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Histogram::default();
        }
        sorted.sort_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let (num_bins, mut bin_width) = match self.rule {
            BinRule::Adaptive => adaptive_layout(&sorted, min, max),
            BinRule::Fixed(bins) => fixed_layout(bins, min, max),
        };

        if integer_valued {
            bin_width = bin_width.round().max(1.0);
        }

        debug!(
            "Binning {} samples into {} bins of width {:.4} ({:?})",
            sorted.len(),
            num_bins,
            bin_width,
            self.rule
        );

        let mut data = vec![0usize; num_bins];
        for value in &sorted {
            data[bin_index(*value, min, bin_width, num_bins)] += 1;
        }

        let labels = (0..num_bins)
            .map(|i| {
                let left = min + i as f64 * bin_width;
                format!("{:.2} - {:.2}", left, left + bin_width)
            })
            .collect();

        Histogram { data, labels }
    }
}

/// Freedman-Diaconis, then Sturges, then a single bin
fn adaptive_layout(sorted: &[f64], min: f64, max: f64) -> (usize, f64) {
    let n = sorted.len() as f64;
    let iqr = percentile(sorted, 75.0) - percentile(sorted, 25.0);

    if iqr > 0.0 {
        let bin_width = 2.0 * iqr / n.cbrt();
        let num_bins = ((max - min) / bin_width).round().max(1.0);
        if num_bins <= MAX_ADAPTIVE_BINS as f64 {
            return (num_bins as usize, bin_width);
        }
        warn!(
            "Freedman-Diaconis asks for {} bins, using Sturges instead",
            num_bins
        );
    }

    if max > min {
        sturges_layout(n, min, max)
    } else {
        (1, 1.0)
    }
}

fn sturges_layout(n: f64, min: f64, max: f64) -> (usize, f64) {
    let num_bins = (1.0 + n.log2()).floor().max(1.0) as usize;
    (num_bins, (max - min) / num_bins as f64)
}

fn fixed_layout(bins: usize, min: f64, max: f64) -> (usize, f64) {
    if max > min {
        let bins = bins.max(1);
        (bins, (max - min) / bins as f64)
    } else {
        (1, 1.0)
    }
}

fn bin_index(value: f64, min: f64, bin_width: f64, num_bins: usize) -> usize {
    let index = ((value - min) / bin_width).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(num_bins - 1)
    }
}

/// Percentile of sorted values
///
/// Uses the estimate at position `p * (n + 1) / 100`, interpolating
/// linearly between neighbours and clamping to the first and last value.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    match n {
        0 => return f64::NAN,
        1 => return sorted[0],
        _ => {}
    }

    let position = p * (n as f64 + 1.0) / 100.0;
    if position < 1.0 {
        return sorted[0];
    }
    if position >= n as f64 {
        return sorted[n - 1];
    }

    let lower_index = position.floor() as usize;
    let fraction = position - position.floor();
    let lower = sorted[lower_index - 1];
    let upper = sorted[lower_index];
    lower + fraction * (upper - lower)
}
