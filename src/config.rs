//! Per-component configuration.
//!
//! Every threshold of the analytics heuristics is an overridable field
//! here, so behavior is testable independent of any dataset. `Default`
//! impls carry the tuned values the engine ships with.

use crate::{AnalysisError, Result};

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(AnalysisError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalysisError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: f64::MAX,
        });
    }
    Ok(())
}

// ============================================================
// TREND
// ============================================================

/// Thresholds for trend classification
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrendConfig {
    /// Number of most recent points the classification looks at
    pub window: usize,
    /// Below this many points the report is InsufficientData
    pub min_points: usize,
    /// Slope must exceed this fraction of mean price (per window length)
    /// to count as Up/Down rather than Sideways
    pub direction_threshold: f64,
    /// How many steps past the last observation the forecast extrapolates
    pub forecast_horizon: usize,
    /// Forecasts only extrapolate above this confidence; below it the
    /// forecast is the last observed price
    pub min_forecast_confidence: u8,
    /// Moving-average window for the reversal-risk check
    pub ma_window: usize,
    /// Overbought when price exceeds the MA by this ratio in an uptrend
    pub overbought_ratio: f64,
    /// Oversold when price falls below the MA by this ratio in a downtrend
    pub oversold_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: 30,
            min_points: 5,
            direction_threshold: 0.05,
            forecast_horizon: 7,
            min_forecast_confidence: 50,
            ma_window: 20,
            overbought_ratio: 1.05,
            oversold_ratio: 0.95,
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_points < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_points must be >= 2, got {}",
                self.min_points
            )));
        }
        if self.window < self.min_points {
            return Err(AnalysisError::InvalidConfig(format!(
                "window ({}) must be >= min_points ({})",
                self.window, self.min_points
            )));
        }
        if self.ma_window == 0 {
            return Err(AnalysisError::InvalidConfig(
                "ma_window must be > 0".to_string(),
            ));
        }
        if self.min_forecast_confidence > 100 {
            return Err(AnalysisError::OutOfRange {
                field: "min_forecast_confidence",
                value: self.min_forecast_confidence as f64,
                min: 0.0,
                max: 100.0,
            });
        }
        check_range("direction_threshold", self.direction_threshold, 0.0, 1.0)?;
        check_range("overbought_ratio", self.overbought_ratio, 1.0, 10.0)?;
        check_range("oversold_ratio", self.oversold_ratio, 0.0, 1.0)?;
        Ok(())
    }
}

// ============================================================
// SUPPORT / RESISTANCE
// ============================================================

/// Thresholds for support/resistance detection
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LevelConfig {
    /// Below this length only the trivial min/max fallback runs
    pub min_len: usize,
    /// Peak prominence threshold as a fraction of mean price
    pub prominence_fraction: f64,
    /// Minimum spacing between accepted extrema as a fraction of length
    pub spacing_fraction: f64,
    /// Absolute floor for the spacing
    pub min_spacing: usize,
    /// Relative tolerance for merging nearby levels into one cluster
    pub cluster_tolerance: f64,
    /// Levels kept per side
    pub max_levels: usize,
    /// Supports above mean*(1+band) and resistances below mean*(1-band)
    /// are discarded as outside the trading range
    pub mean_band: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            min_len: 50,
            prominence_fraction: 0.01,
            spacing_fraction: 0.05,
            min_spacing: 5,
            cluster_tolerance: 0.03,
            max_levels: 2,
            mean_band: 0.05,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_spacing == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_spacing must be > 0".to_string(),
            ));
        }
        if self.max_levels == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_levels must be > 0".to_string(),
            ));
        }
        check_range("prominence_fraction", self.prominence_fraction, 0.0, 1.0)?;
        check_range("spacing_fraction", self.spacing_fraction, 0.0, 1.0)?;
        check_range("cluster_tolerance", self.cluster_tolerance, 0.0, 1.0)?;
        check_range("mean_band", self.mean_band, 0.0, 1.0)?;
        Ok(())
    }
}

// ============================================================
// PATTERNS
// ============================================================

/// Thresholds for chart-pattern detection
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatternConfig {
    /// Below this length no detection runs at all
    pub min_len: usize,
    /// A local extremum must beat every point within this many samples
    /// on both sides
    pub extremum_order: usize,
    /// Outer peaks of a head-and-shoulders must agree within this
    /// relative tolerance
    pub shoulder_tolerance: f64,
    /// Double top/bottom peaks must agree within this relative tolerance
    pub double_tolerance: f64,
    /// How many recent extrema feed each trendline fit
    pub trendline_points: usize,
    /// Converging trendlines steeper than this classify as a triangle
    pub triangle_slope: f64,
    /// Parallel trendlines steeper than this classify as a channel
    pub channel_slope: f64,
    /// Maximum slope difference for channel lines to count as parallel
    pub parallel_tolerance: f64,
    /// Whole-series change beyond which the fallback reads a rally/selloff
    pub swing_threshold: f64,
    /// Whole-series volatility below which the fallback reads consolidation
    pub quiet_volatility: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_len: 15,
            extremum_order: 3,
            shoulder_tolerance: 0.15,
            double_tolerance: 0.03,
            trendline_points: 5,
            triangle_slope: 0.05,
            channel_slope: 0.1,
            parallel_tolerance: 0.1,
            swing_threshold: 0.3,
            quiet_volatility: 0.05,
        }
    }
}

impl PatternConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_len < 3 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_len must be >= 3, got {}",
                self.min_len
            )));
        }
        if self.extremum_order == 0 {
            return Err(AnalysisError::InvalidConfig(
                "extremum_order must be > 0".to_string(),
            ));
        }
        if self.trendline_points < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "trendline_points must be >= 2, got {}",
                self.trendline_points
            )));
        }
        check_range("shoulder_tolerance", self.shoulder_tolerance, 0.0, 1.0)?;
        check_range("double_tolerance", self.double_tolerance, 0.0, 1.0)?;
        check_range("quiet_volatility", self.quiet_volatility, 0.0, 1.0)?;
        check_non_negative("triangle_slope", self.triangle_slope)?;
        check_non_negative("channel_slope", self.channel_slope)?;
        check_non_negative("parallel_tolerance", self.parallel_tolerance)?;
        check_non_negative("swing_threshold", self.swing_threshold)?;
        Ok(())
    }
}

// ============================================================
// EVENTS
// ============================================================

/// Thresholds for point-event detection
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventConfig {
    /// A jump counts as a surge beyond this many standard deviations of
    /// the first differences
    pub surge_sigma: f64,
    /// ...and it must also exceed this fraction of mean price, so quiet
    /// series do not surge on noise
    pub min_jump_fraction: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            surge_sigma: 3.0,
            min_jump_fraction: 0.01,
        }
    }
}

impl EventConfig {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("surge_sigma", self.surge_sigma)?;
        check_range("min_jump_fraction", self.min_jump_fraction, 0.0, 1.0)?;
        Ok(())
    }
}

// ============================================================
// HIGHLIGHT
// ============================================================

/// Thresholds for highlight selection (notability scoring)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HighlightConfig {
    /// Absolute percent change that counts as a sharp move on its own
    pub min_change_pct: f64,
    /// Whole-series r² floor for the strong-trend rule
    pub min_r_squared: f64,
    /// Trend strength floor for the strong-trend rule
    pub min_strength: u8,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            min_change_pct: 10.0,
            min_r_squared: 0.7,
            min_strength: 60,
        }
    }
}

impl HighlightConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_strength > 100 {
            return Err(AnalysisError::OutOfRange {
                field: "min_strength",
                value: self.min_strength as f64,
                min: 0.0,
                max: 100.0,
            });
        }
        check_non_negative("min_change_pct", self.min_change_pct)?;
        check_range("min_r_squared", self.min_r_squared, 0.0, 1.0)?;
        Ok(())
    }
}

// ============================================================
// AGGREGATE
// ============================================================

/// Configuration for the full engine
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    pub trend: TrendConfig,
    pub levels: LevelConfig,
    pub patterns: PatternConfig,
    pub events: EventConfig,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        self.trend.validate()?;
        self.levels.validate()?;
        self.patterns.validate()?;
        self.events.validate()?;
        Ok(())
    }
}
