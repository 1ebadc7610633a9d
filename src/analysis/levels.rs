//! Support/resistance level detection.
//!
//! Local extrema are extracted with a prominence and spacing filter,
//! then clustered so prices within tolerance of each other collapse to
//! one representative level.

use crate::analysis::{extrema, stats};
use crate::config::LevelConfig;
use crate::{PricePoint, Result, SupportResistance};

/// Detect up to `max_levels` support and resistance levels.
///
/// Short series fall back to raw min/max; levels outside the trading
/// range around the mean are discarded; cluster representatives are
/// rounded to the nearest integer price.
pub fn find_support_resistance<P: PricePoint>(
    series: &[P],
    cfg: &LevelConfig,
) -> Result<SupportResistance> {
    let prices = crate::collect_prices(series)?;
    let n = prices.len();
    if n == 0 {
        return Ok(SupportResistance::default());
    }

    if n < cfg.min_len {
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        return Ok(SupportResistance {
            support: vec![min],
            resistance: vec![max],
        });
    }

    let mean = stats::mean(&prices);
    let min_prominence = cfg.prominence_fraction * mean;
    let spacing = ((cfg.spacing_fraction * n as f64).round() as usize).max(cfg.min_spacing);

    let peak_idxs = extrema::find_peaks(&prices, min_prominence, spacing);
    let negated: Vec<f64> = prices.iter().map(|p| -p).collect();
    let trough_idxs = extrema::find_peaks(&negated, min_prominence, spacing);

    let resistance_levels: Vec<f64> = peak_idxs.iter().map(|&i| prices[i]).collect();
    let support_levels: Vec<f64> = trough_idxs.iter().map(|&i| prices[i]).collect();

    let mut support = cluster_levels(&support_levels, cfg.cluster_tolerance);
    let mut resistance = cluster_levels(&resistance_levels, cfg.cluster_tolerance);

    // Drop levels that drifted out of the current trading range.
    support.retain(|&s| s < mean * (1.0 + cfg.mean_band));
    resistance.retain(|&r| r > mean * (1.0 - cfg.mean_band));

    // Supports closest from below, resistances closest from above.
    if support.len() > cfg.max_levels {
        support.drain(..support.len() - cfg.max_levels);
    }
    resistance.truncate(cfg.max_levels);

    Ok(SupportResistance {
        support,
        resistance,
    })
}

/// Merge levels within relative `tolerance` of each other.
///
/// Walks the sorted list growing a cluster while the next value stays
/// within tolerance of the cluster's first member, then replaces the
/// cluster with its arithmetic mean, rounded to the nearest integer.
pub fn cluster_levels(levels: &[f64], tolerance: f64) -> Vec<f64> {
    let mut sorted = levels.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut clustered = Vec::new();
    let mut cluster: Vec<f64> = Vec::new();

    for &level in &sorted {
        match cluster.first() {
            Some(&anchor) if anchor != 0.0 && (level - anchor) / anchor <= tolerance => {
                cluster.push(level);
            }
            Some(_) => {
                clustered.push(stats::mean(&cluster).round());
                cluster.clear();
                cluster.push(level);
            }
            None => cluster.push(level),
        }
    }
    if !cluster.is_empty() {
        clustered.push(stats::mean(&cluster).round());
    }
    clustered
}
