//! # pricelens
//!
//! Price-history analytics for a single tradeable item: trend
//! classification, support/resistance levels, chart-pattern matches and
//! point events (new highs/lows, abnormal jumps).
//!
//! ## Quick Start
//!
//! ```rust
//! use pricelens::prelude::*;
//!
//! // Any chronologically sorted slice of prices works; plain f64 slices
//! // implement PricePoint out of the box.
//! let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
//!
//! let analyzer = Analyzer::default();
//! let report = analyzer.analyze(&prices);
//!
//! assert!(report.trend.direction.is_up());
//! assert!(!report.patterns.is_empty());
//! ```
//!
//! Each component is also callable on its own (`Analyzer::trend`,
//! `Analyzer::levels`, `Analyzer::patterns`, `Analyzer::events`), and
//! [`analyze_parallel`] runs the full pipeline over many items at once.

pub mod analysis;
pub mod config;
pub mod highlight;
pub mod regression;

pub mod prelude {
    pub use crate::{
        // Components
        analysis::{
            events::detect_events, levels::find_support_resistance,
            patterns::detect_patterns, trend::analyze_trend,
        },
        // Parallel
        analyze_parallel,
        // Configuration
        config::{
            AnalysisConfig, EventConfig, HighlightConfig, LevelConfig, PatternConfig,
            TrendConfig,
        },
        // Highlight layer
        highlight::{evaluate_highlight, rank_highlights, Highlight, HighlightReason},
        // Regression utility
        regression::{fit_series, fit_xy, LinearFit},
        // Errors
        AnalysisError,
        // Engine
        AnalysisReport,
        Analyzer,
        Direction,
        Event,
        EventKind,
        ItemReport,
        PatternKind,
        PatternMatch,
        // Core trait
        PricePoint,
        Result,
        ReversalRisk,
        SupportResistance,
        TrendDirection,
        TrendReport,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during analysis
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Non-finite price at index {index}")]
    NonFinite { index: usize },
}

// ============================================================
// PRICE POINT TRAIT
// ============================================================

/// One observation of a price series.
///
/// The engine is purely index-based; the timestamp is carried only so
/// callers can map result indices back to instants when rendering.
pub trait PricePoint {
    fn price(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

impl PricePoint for f64 {
    fn price(&self) -> f64 {
        *self
    }
}

/// Timestamped pair: `(unix seconds, price)`
impl PricePoint for (i64, f64) {
    fn price(&self) -> f64 {
        self.1
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.0)
    }
}

impl<T: PricePoint> PricePoint for &T {
    fn price(&self) -> f64 {
        (*self).price()
    }

    fn timestamp(&self) -> Option<i64> {
        (*self).timestamp()
    }
}

/// Extract prices as a dense vector, rejecting NaN/infinite values.
///
/// The one input fault the engine detects itself; everything else
/// (sortedness, deduplication) is the loader's contract.
pub(crate) fn collect_prices<P: PricePoint>(series: &[P]) -> Result<Vec<f64>> {
    let mut prices = Vec::with_capacity(series.len());
    for (index, point) in series.iter().enumerate() {
        let value = point.price();
        if !value.is_finite() {
            return Err(AnalysisError::NonFinite { index });
        }
        prices.push(value);
    }
    Ok(prices)
}

// ============================================================
// TREND REPORT
// ============================================================

/// Classified direction of the recent window
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
    InsufficientData,
}

impl TrendDirection {
    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, TrendDirection::Up)
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, TrendDirection::Down)
    }
}

/// Reversal-risk flag derived from distance to the moving average
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReversalRisk {
    Low,
    Overbought,
    Oversold,
    InsufficientData,
}

/// Full output of trend analysis
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrendReport {
    pub direction: TrendDirection,
    /// Trend strength, 0..=100
    pub strength: u8,
    /// Statistical confidence (windowed r² scaled to 0..=100)
    pub confidence: u8,
    /// Short-term forecast; `None` only when the series is too short
    pub forecast_price: Option<f64>,
    pub reversal_risk: ReversalRisk,
    /// Whole-series coefficient of determination, for downstream scoring.
    /// `None` when a fit is impossible (fewer than two points).
    pub r_squared: Option<f64>,
}

impl TrendReport {
    /// Neutral report for series too short to classify
    pub fn insufficient() -> Self {
        Self {
            direction: TrendDirection::InsufficientData,
            strength: 0,
            confidence: 0,
            forecast_price: None,
            reversal_risk: ReversalRisk::InsufficientData,
            r_squared: None,
        }
    }
}

// ============================================================
// SUPPORT / RESISTANCE
// ============================================================

/// Representative price levels, ascending, at most two per side
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SupportResistance {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

// ============================================================
// PATTERN MATCH
// ============================================================

/// Directional bias of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

/// Catalog of detectable chart patterns.
///
/// The first seven are structural (derived from local extrema); the last
/// four come from the whole-series fallback and are mutually exclusive
/// with everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PatternKind {
    HeadAndShoulders,
    InverseHeadAndShoulders,
    DoubleTop,
    DoubleBottom,
    Triangle,
    AscendingChannel,
    DescendingChannel,
    RapidRally,
    PanicSelloff,
    Consolidation,
    NoClearPattern,
}

impl PatternKind {
    /// Typical directional reading of this pattern
    pub fn direction(self) -> Direction {
        match self {
            PatternKind::HeadAndShoulders
            | PatternKind::DoubleTop
            | PatternKind::DescendingChannel
            | PatternKind::PanicSelloff => Direction::Bearish,
            PatternKind::InverseHeadAndShoulders
            | PatternKind::DoubleBottom
            | PatternKind::AscendingChannel
            | PatternKind::RapidRally => Direction::Bullish,
            PatternKind::Triangle | PatternKind::Consolidation | PatternKind::NoClearPattern => {
                Direction::Neutral
            }
        }
    }

    /// True for patterns built from extremal structure (as opposed to the
    /// whole-series fallback classes). The highlight layer keys on these.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            PatternKind::HeadAndShoulders
                | PatternKind::InverseHeadAndShoulders
                | PatternKind::DoubleTop
                | PatternKind::DoubleBottom
                | PatternKind::Triangle
                | PatternKind::AscendingChannel
                | PatternKind::DescendingChannel
        )
    }
}

/// A detected pattern over `[start_index, end_index]` of the series
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub start_index: usize,
    pub end_index: usize,
    /// Pairs of y-values for overlay line segments, where the pattern
    /// implies a connecting line (e.g. shoulder levels). Often empty.
    pub lines: Vec<[f64; 2]>,
}

impl PatternMatch {
    /// Build a match with indices clamped into `[0, series_len - 1]`,
    /// keeping `start_index <= end_index`.
    pub fn new(kind: PatternKind, start_index: usize, end_index: usize, series_len: usize) -> Self {
        Self::with_lines(kind, start_index, end_index, Vec::new(), series_len)
    }

    pub fn with_lines(
        kind: PatternKind,
        start_index: usize,
        end_index: usize,
        lines: Vec<[f64; 2]>,
        series_len: usize,
    ) -> Self {
        let last = series_len.saturating_sub(1);
        let end_index = end_index.min(last);
        let start_index = start_index.min(end_index);
        Self {
            kind,
            start_index,
            end_index,
            lines,
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.kind.direction()
    }
}

// ============================================================
// EVENTS
// ============================================================

/// Point event attached to the most recent observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    NewHigh,
    NewLow,
    SurgeUp,
    SurgeDown,
}

impl EventKind {
    /// True for all-time-record events (new high / new low)
    #[inline]
    pub fn is_record(self) -> bool {
        matches!(self, EventKind::NewHigh | EventKind::NewLow)
    }

    /// True for abnormal single-step jumps
    #[inline]
    pub fn is_surge(self) -> bool {
        matches!(self, EventKind::SurgeUp | EventKind::SurgeDown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub index: usize,
    pub kind: EventKind,
}

// ============================================================
// COMPOSITE REPORT
// ============================================================

/// Everything the engine derives for one item, aggregated for the chart
/// renderer and the highlight selector.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisReport {
    pub trend: TrendReport,
    pub levels: SupportResistance,
    pub patterns: Vec<PatternMatch>,
    pub events: Vec<Event>,
}

impl AnalysisReport {
    /// Neutral report: the substitute for a pathological series
    pub fn empty() -> Self {
        Self {
            trend: TrendReport::insufficient(),
            levels: SupportResistance::default(),
            patterns: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Per-item result of a parallel batch run
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ItemReport {
    pub item: String,
    pub report: AnalysisReport,
}

// ============================================================
// ANALYZER
// ============================================================

use config::AnalysisConfig;

/// Analysis engine: a validated configuration plus the per-component
/// entry points and the composite [`Analyzer::analyze`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
}

impl Analyzer {
    /// Create an analyzer, validating every threshold up front
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classify the recent-window trend
    pub fn trend<P: PricePoint>(&self, series: &[P]) -> Result<TrendReport> {
        analysis::trend::analyze_trend(series, &self.config.trend)
    }

    /// Detect support/resistance levels over the full series
    pub fn levels<P: PricePoint>(&self, series: &[P]) -> Result<SupportResistance> {
        analysis::levels::find_support_resistance(series, &self.config.levels)
    }

    /// Detect chart patterns over the full series
    pub fn patterns<P: PricePoint>(&self, series: &[P]) -> Result<Vec<PatternMatch>> {
        analysis::patterns::detect_patterns(series, &self.config.patterns)
    }

    /// Detect point events for the most recent observation
    pub fn events<P: PricePoint>(&self, series: &[P]) -> Result<Vec<Event>> {
        analysis::events::detect_events(series, &self.config.events)
    }

    /// Run all four components and aggregate their outputs.
    ///
    /// This is the catch-and-neutralize boundary: a component failure
    /// (e.g. a non-finite price) is logged and replaced by that
    /// component's neutral result, so one malformed item can never abort
    /// a multi-item batch.
    pub fn analyze<P: PricePoint>(&self, series: &[P]) -> AnalysisReport {
        let trend = self.trend(series).unwrap_or_else(|e| {
            tracing::warn!("trend analysis failed: {e}");
            TrendReport::insufficient()
        });
        let levels = self.levels(series).unwrap_or_else(|e| {
            tracing::warn!("support/resistance detection failed: {e}");
            SupportResistance::default()
        });
        let patterns = self.patterns(series).unwrap_or_else(|e| {
            tracing::warn!("pattern detection failed: {e}");
            Vec::new()
        });
        let events = self.events(series).unwrap_or_else(|e| {
            tracing::warn!("event detection failed: {e}");
            Vec::new()
        });

        AnalysisReport {
            trend,
            levels,
            patterns,
            events,
        }
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Run the full per-item pipeline over many items concurrently.
///
/// Items are independent; result order matches input order. A
/// pathological series degrades to its neutral report instead of
/// failing the batch.
pub fn analyze_parallel<'a, P, I>(analyzer: &Analyzer, items: I) -> Vec<ItemReport>
where
    P: PricePoint + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [P])>,
{
    items
        .into_par_iter()
        .map(|(item, series)| ItemReport {
            item: item.to_string(),
            report: analyzer.analyze(series),
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_prices_rejects_nan() {
        let series = [100.0, f64::NAN, 101.0];
        let err = collect_prices(&series).unwrap_err();
        assert!(matches!(err, AnalysisError::NonFinite { index: 1 }));
    }

    #[test]
    fn test_collect_prices_rejects_infinity() {
        let series = [100.0, f64::INFINITY];
        let err = collect_prices(&series).unwrap_err();
        assert!(matches!(err, AnalysisError::NonFinite { index: 1 }));
    }

    #[test]
    fn test_timestamped_pair_point() {
        let point = (1_700_000_000_i64, 42.5_f64);
        assert_eq!(point.price(), 42.5);
        assert_eq!(point.timestamp(), Some(1_700_000_000));
    }

    #[test]
    fn test_plain_f64_point_has_no_timestamp() {
        assert_eq!(10.0_f64.timestamp(), None);
    }

    #[test]
    fn test_pattern_match_clamps_indices() {
        let m = PatternMatch::new(PatternKind::DoubleTop, 3, 99, 10);
        assert_eq!(m.start_index, 3);
        assert_eq!(m.end_index, 9);

        let m = PatternMatch::new(PatternKind::DoubleTop, 99, 99, 10);
        assert_eq!(m.start_index, 9);
        assert_eq!(m.end_index, 9);
    }

    #[test]
    fn test_pattern_kind_direction() {
        assert!(PatternKind::HeadAndShoulders.direction().is_bearish());
        assert!(PatternKind::InverseHeadAndShoulders.direction().is_bullish());
        assert!(PatternKind::RapidRally.direction().is_bullish());
        assert_eq!(PatternKind::Triangle.direction(), Direction::Neutral);
    }

    #[test]
    fn test_structural_kinds() {
        assert!(PatternKind::Triangle.is_structural());
        assert!(PatternKind::AscendingChannel.is_structural());
        assert!(!PatternKind::RapidRally.is_structural());
        assert!(!PatternKind::NoClearPattern.is_structural());
    }

    #[test]
    fn test_event_kind_predicates() {
        assert!(EventKind::NewHigh.is_record());
        assert!(EventKind::NewLow.is_record());
        assert!(!EventKind::SurgeUp.is_record());
        assert!(EventKind::SurgeDown.is_surge());
    }

    #[test]
    fn test_analyzer_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.trend.min_points = 1;
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_analyze_neutralizes_non_finite_input() {
        let analyzer = Analyzer::default();
        let series = [100.0, f64::NAN, 102.0];
        let report = analyzer.analyze(&series);
        assert_eq!(report.trend, TrendReport::insufficient());
        assert!(report.levels.support.is_empty());
        assert!(report.patterns.is_empty());
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let analyzer = Analyzer::default();
        let a: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let b: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let bad = vec![100.0, f64::NAN];

        let items: Vec<(&str, &[f64])> = vec![("rising", &a), ("broken", &bad), ("falling", &b)];
        let reports = analyze_parallel(&analyzer, items);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].item, "rising");
        assert_eq!(reports[1].item, "broken");
        assert_eq!(reports[2].item, "falling");
        assert!(reports[0].report.trend.direction.is_up());
        // The broken item degrades, it does not poison the batch.
        assert_eq!(reports[1].report.trend, TrendReport::insufficient());
        assert!(reports[2].report.trend.direction.is_down());
    }
}
