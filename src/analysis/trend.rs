//! Trend classification over the most recent window.

use crate::analysis::stats;
use crate::config::TrendConfig;
use crate::{regression, PricePoint, Result, ReversalRisk, TrendDirection, TrendReport};

/// Classify direction, strength, confidence, short-term forecast and
/// reversal risk from the last `window` points of the series.
///
/// The report's `r_squared` is the whole-series fit, computed whenever
/// at least two points exist, even when the windowed classification is
/// InsufficientData; the windowed r² only drives `confidence`.
pub fn analyze_trend<P: PricePoint>(series: &[P], cfg: &TrendConfig) -> Result<TrendReport> {
    let prices = crate::collect_prices(series)?;
    let n = prices.len();

    let r_squared = regression::fit_series(&prices).map(|fit| fit.r_squared);

    let window = cfg.window.min(n);
    if window < cfg.min_points {
        return Ok(TrendReport {
            r_squared,
            ..TrendReport::insufficient()
        });
    }

    let recent = &prices[n - window..];
    let Some(fit) = regression::fit_series(recent) else {
        // Unreachable with a validated config (min_points >= 2), but the
        // neutral report is the right answer either way.
        return Ok(TrendReport {
            r_squared,
            ..TrendReport::insufficient()
        });
    };

    let mean = stats::mean(recent);
    let last_price = recent[recent.len() - 1];

    // Slope measured against mean price per window length, so the same
    // threshold works across wildly different price magnitudes.
    let slope_threshold = cfg.direction_threshold * mean / window as f64;
    let direction = if fit.slope > slope_threshold {
        TrendDirection::Up
    } else if fit.slope < -slope_threshold {
        TrendDirection::Down
    } else {
        TrendDirection::Sideways
    };

    // Strength scales |slope|·r² by window volatility. A perfectly flat
    // window has no volatility to scale by and rates as neutral 50, not
    // as "no trend".
    let std = stats::sample_std(recent);
    let strength = if std > 0.0 {
        (fit.slope.abs() * fit.r_squared / std * 200.0).min(100.0) as u8
    } else {
        50
    };

    let confidence = (fit.r_squared * 100.0).round() as u8;

    // Low-confidence trends do not extrapolate.
    let forecast_price = if confidence > cfg.min_forecast_confidence {
        fit.predict((window - 1 + cfg.forecast_horizon) as f64)
    } else {
        last_price
    };

    let ma = if window >= cfg.ma_window {
        stats::mean(&recent[window - cfg.ma_window..])
    } else {
        mean
    };
    let reversal_risk = if direction.is_up() && last_price > ma * cfg.overbought_ratio {
        ReversalRisk::Overbought
    } else if direction.is_down() && last_price < ma * cfg.oversold_ratio {
        ReversalRisk::Oversold
    } else {
        ReversalRisk::Low
    };

    Ok(TrendReport {
        direction,
        strength,
        confidence,
        forecast_price: Some(forecast_price),
        reversal_risk,
        r_squared,
    })
}
