//! Highlight selection: decide whether one analyzed item is notable.
//!
//! The scoring step behind the daily summary. Four rules mark an item
//! notable: a sharp price move, a statistically strong trend, a
//! structural chart pattern, or a record (new high/low) event. Ranking
//! sorts by move magnitude.

use crate::config::HighlightConfig;
use crate::{AnalysisReport, EventKind, PatternKind};

/// Why an item was picked as notable
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HighlightReason {
    /// Absolute percent change over the reporting window crossed the bar
    SharpMove,
    /// Whole-series fit is tight and trend strength is high
    StrongTrend,
    Pattern(PatternKind),
    Event(EventKind),
}

/// One notable item, with everything the report generator needs
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Highlight {
    /// Percent change over the reporting window, signed
    pub change_pct: f64,
    pub reasons: Vec<HighlightReason>,
}

impl Highlight {
    /// Ranking score: magnitude of the move
    #[inline]
    pub fn score(&self) -> f64 {
        self.change_pct.abs()
    }
}

/// Score one item's report; `None` when nothing makes it notable.
///
/// `change_pct` is supplied by the caller (it depends on the reporting
/// window, which the engine knows nothing about).
pub fn evaluate_highlight(
    report: &AnalysisReport,
    change_pct: f64,
    cfg: &HighlightConfig,
) -> Option<Highlight> {
    let mut reasons = Vec::new();

    if change_pct.abs() >= cfg.min_change_pct {
        reasons.push(HighlightReason::SharpMove);
    }

    if let Some(r_squared) = report.trend.r_squared {
        if r_squared >= cfg.min_r_squared && report.trend.strength > cfg.min_strength {
            reasons.push(HighlightReason::StrongTrend);
        }
    }

    for pattern in &report.patterns {
        if pattern.kind.is_structural() {
            reasons.push(HighlightReason::Pattern(pattern.kind));
        }
    }

    for event in &report.events {
        if event.kind.is_record() {
            reasons.push(HighlightReason::Event(event.kind));
        }
    }

    (!reasons.is_empty()).then_some(Highlight {
        change_pct,
        reasons,
    })
}

/// Sort highlights by move magnitude, biggest first
pub fn rank_highlights(mut highlights: Vec<Highlight>) -> Vec<Highlight> {
    highlights.sort_by(|a, b| b.score().total_cmp(&a.score()));
    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Event, PatternMatch, ReversalRisk, SupportResistance, TrendDirection, TrendReport,
    };

    fn cfg() -> HighlightConfig {
        HighlightConfig::default()
    }

    fn quiet_report() -> AnalysisReport {
        AnalysisReport {
            trend: TrendReport {
                direction: TrendDirection::Sideways,
                strength: 20,
                confidence: 10,
                forecast_price: Some(100.0),
                reversal_risk: ReversalRisk::Low,
                r_squared: Some(0.1),
            },
            levels: SupportResistance::default(),
            patterns: vec![PatternMatch::new(PatternKind::NoClearPattern, 0, 29, 30)],
            events: vec![],
        }
    }

    #[test]
    fn test_quiet_item_is_not_notable() {
        assert!(evaluate_highlight(&quiet_report(), 2.0, &cfg()).is_none());
    }

    #[test]
    fn test_sharp_move() {
        let h = evaluate_highlight(&quiet_report(), -12.5, &cfg()).unwrap();
        assert_eq!(h.reasons, vec![HighlightReason::SharpMove]);
        assert_eq!(h.score(), 12.5);
    }

    #[test]
    fn test_strong_trend() {
        let mut report = quiet_report();
        report.trend.r_squared = Some(0.85);
        report.trend.strength = 70;
        let h = evaluate_highlight(&report, 1.0, &cfg()).unwrap();
        assert_eq!(h.reasons, vec![HighlightReason::StrongTrend]);
    }

    #[test]
    fn test_strong_trend_needs_both_floors() {
        // Tight fit, weak strength
        let mut report = quiet_report();
        report.trend.r_squared = Some(0.9);
        report.trend.strength = 30;
        assert!(evaluate_highlight(&report, 1.0, &cfg()).is_none());

        // Strong, loose fit
        let mut report = quiet_report();
        report.trend.r_squared = Some(0.2);
        report.trend.strength = 90;
        assert!(evaluate_highlight(&report, 1.0, &cfg()).is_none());
    }

    #[test]
    fn test_structural_pattern_tags() {
        let mut report = quiet_report();
        report.patterns = vec![
            PatternMatch::new(PatternKind::HeadAndShoulders, 2, 12, 30),
            PatternMatch::new(PatternKind::DoubleTop, 8, 12, 30),
        ];
        let h = evaluate_highlight(&report, 0.0, &cfg()).unwrap();
        assert_eq!(
            h.reasons,
            vec![
                HighlightReason::Pattern(PatternKind::HeadAndShoulders),
                HighlightReason::Pattern(PatternKind::DoubleTop),
            ]
        );
    }

    #[test]
    fn test_fallback_patterns_do_not_tag() {
        let mut report = quiet_report();
        report.patterns = vec![PatternMatch::new(PatternKind::RapidRally, 0, 29, 30)];
        assert!(evaluate_highlight(&report, 0.0, &cfg()).is_none());
    }

    #[test]
    fn test_record_event_tags_but_surge_does_not() {
        let mut report = quiet_report();
        report.events = vec![
            Event {
                index: 29,
                kind: EventKind::NewHigh,
            },
            Event {
                index: 29,
                kind: EventKind::SurgeUp,
            },
        ];
        let h = evaluate_highlight(&report, 0.0, &cfg()).unwrap();
        assert_eq!(h.reasons, vec![HighlightReason::Event(EventKind::NewHigh)]);
    }

    #[test]
    fn test_ranking_sorts_by_magnitude() {
        let highlights = vec![
            Highlight {
                change_pct: 5.0,
                reasons: vec![HighlightReason::SharpMove],
            },
            Highlight {
                change_pct: -25.0,
                reasons: vec![HighlightReason::SharpMove],
            },
            Highlight {
                change_pct: 11.0,
                reasons: vec![HighlightReason::SharpMove],
            },
        ];
        let ranked = rank_highlights(highlights);
        assert_eq!(ranked[0].change_pct, -25.0);
        assert_eq!(ranked[1].change_pct, 11.0);
        assert_eq!(ranked[2].change_pct, 5.0);
    }
}
