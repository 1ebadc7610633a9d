//! Point-event detection for the most recent observation.
//!
//! A live-style check, not a historical scan: only the last point is
//! evaluated, against the whole history.

use crate::analysis::stats;
use crate::config::EventConfig;
use crate::{Event, EventKind, PricePoint, Result};

/// Flag new-high/new-low and abnormal jumps at the last point.
///
/// New-high takes precedence over new-low (they can only coincide on a
/// degenerate series); a record event and a surge event may both fire.
pub fn detect_events<P: PricePoint>(series: &[P], cfg: &EventConfig) -> Result<Vec<Event>> {
    let prices = crate::collect_prices(series)?;
    let n = prices.len();

    let mut events = Vec::new();
    let Some(&last_price) = prices.last() else {
        return Ok(events);
    };

    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    if last_price >= high {
        events.push(Event {
            index: n - 1,
            kind: EventKind::NewHigh,
        });
    } else if last_price <= low {
        events.push(Event {
            index: n - 1,
            kind: EventKind::NewLow,
        });
    }

    let changes = stats::diffs(&prices);
    let std_change = stats::sample_std(&changes);
    let last_change = changes.last().copied().unwrap_or(0.0);

    // The sigma threshold alone would fire on any move in a perfectly
    // quiet history, hence the additional fraction-of-mean floor.
    let threshold = cfg.surge_sigma * std_change;
    let min_jump = cfg.min_jump_fraction * stats::mean(&prices);
    if last_change.abs() > threshold && last_change.abs() > min_jump {
        let kind = if last_change > 0.0 {
            EventKind::SurgeUp
        } else {
            EventKind::SurgeDown
        };
        events.push(Event { index: n - 1, kind });
    }

    Ok(events)
}
