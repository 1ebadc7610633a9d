//! Chart-pattern detection from local extrema.
//!
//! Structural patterns (head-and-shoulders family, double top/bottom,
//! triangle, channels) are read off the most recent peaks and troughs;
//! when nothing structural matches, a whole-series fallback classifies
//! the series by total change and volatility so the caller always gets
//! at least one match for a long-enough series.

use crate::analysis::extrema;
use crate::config::PatternConfig;
use crate::{regression, PatternKind, PatternMatch, PricePoint, Result};

/// Detect the pattern catalog over the full series.
///
/// Returns an empty list below `min_len`; otherwise at least one match.
pub fn detect_patterns<P: PricePoint>(
    series: &[P],
    cfg: &PatternConfig,
) -> Result<Vec<PatternMatch>> {
    let prices = crate::collect_prices(series)?;
    let n = prices.len();

    let mut patterns = Vec::new();
    if n < cfg.min_len {
        return Ok(patterns);
    }

    let peak_idxs = extrema::local_maxima(&prices, cfg.extremum_order);
    let trough_idxs = extrema::local_minima(&prices, cfg.extremum_order);

    // Head and shoulders: middle peak above two near-equal outer peaks.
    if let [.., i1, i2, i3] = peak_idxs[..] {
        let (p1, p2, p3) = (prices[i1], prices[i2], prices[i3]);
        if p2 > p1 && p2 > p3 {
            let shoulder_avg = (p1 + p3) / 2.0;
            if shoulder_avg > 0.0 && (p1 - p3).abs() / shoulder_avg < cfg.shoulder_tolerance {
                patterns.push(PatternMatch::with_lines(
                    PatternKind::HeadAndShoulders,
                    i1,
                    i3,
                    vec![[p1, p3]],
                    n,
                ));
            }
        }
    }

    // Mirrored for troughs: inverse head and shoulders.
    if let [.., i1, i2, i3] = trough_idxs[..] {
        let (t1, t2, t3) = (prices[i1], prices[i2], prices[i3]);
        if t2 < t1 && t2 < t3 {
            let shoulder_avg = (t1 + t3) / 2.0;
            if shoulder_avg > 0.0 && (t1 - t3).abs() / shoulder_avg < cfg.shoulder_tolerance {
                patterns.push(PatternMatch::with_lines(
                    PatternKind::InverseHeadAndShoulders,
                    i1,
                    i3,
                    vec![[t1, t3]],
                    n,
                ));
            }
        }
    }

    // Double top/bottom: two near-equal consecutive extrema.
    let is_double = |last: f64, prev: f64| {
        let avg = (last + prev) / 2.0;
        avg > 0.0 && (last - prev).abs() / avg < cfg.double_tolerance
    };
    if let [.., prev, last] = peak_idxs[..] {
        if is_double(prices[last], prices[prev]) {
            patterns.push(PatternMatch::new(PatternKind::DoubleTop, prev, last, n));
        }
    }
    if let [.., prev, last] = trough_idxs[..] {
        if is_double(prices[last], prices[prev]) {
            patterns.push(PatternMatch::new(PatternKind::DoubleBottom, prev, last, n));
        }
    }

    // Trendline analysis: fit resistance through recent peaks and
    // support through recent troughs, then classify by the two slopes.
    if peak_idxs.len() >= 3 && trough_idxs.len() >= 3 {
        let recent_peaks = &peak_idxs[peak_idxs.len().saturating_sub(cfg.trendline_points)..];
        let recent_troughs = &trough_idxs[trough_idxs.len().saturating_sub(cfg.trendline_points)..];

        // A regression needs two points per side.
        if recent_peaks.len() >= 2 && recent_troughs.len() >= 2 {
            let fit_line = |idxs: &[usize]| {
                let xs: Vec<f64> = idxs.iter().map(|&i| i as f64).collect();
                let ys: Vec<f64> = idxs.iter().map(|&i| prices[i]).collect();
                regression::fit_xy(&xs, &ys)
            };

            if let (Some(res), Some(sup)) = (fit_line(recent_peaks), fit_line(recent_troughs)) {
                let start = recent_peaks[0].min(recent_troughs[0]);
                let end = recent_peaks[recent_peaks.len() - 1]
                    .max(recent_troughs[recent_troughs.len() - 1]);
                let parallel = (res.slope - sup.slope).abs() < cfg.parallel_tolerance;

                if res.slope < -cfg.triangle_slope && sup.slope > cfg.triangle_slope {
                    patterns.push(PatternMatch::new(PatternKind::Triangle, start, end, n));
                } else if res.slope > cfg.channel_slope && sup.slope > cfg.channel_slope && parallel
                {
                    patterns.push(PatternMatch::new(
                        PatternKind::AscendingChannel,
                        start,
                        end,
                        n,
                    ));
                } else if res.slope < -cfg.channel_slope
                    && sup.slope < -cfg.channel_slope
                    && parallel
                {
                    patterns.push(PatternMatch::new(
                        PatternKind::DescendingChannel,
                        start,
                        end,
                        n,
                    ));
                }
            }
        }
    }

    // Fallback: classify the whole series when nothing structural fired.
    if patterns.is_empty() {
        let first = prices[0];
        let last = prices[n - 1];
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);

        let total_change = if first > 0.0 { (last - first) / first } else { 0.0 };
        let volatility = if min > 0.0 { (max - min) / min } else { 0.0 };

        let kind = if total_change > cfg.swing_threshold {
            PatternKind::RapidRally
        } else if total_change < -cfg.swing_threshold {
            PatternKind::PanicSelloff
        } else if volatility < cfg.quiet_volatility {
            PatternKind::Consolidation
        } else {
            PatternKind::NoClearPattern
        };
        patterns.push(PatternMatch::new(kind, 0, n - 1, n));
    }

    Ok(patterns)
}
