//! Local-extremum extraction.
//!
//! Two flavours are used by the components:
//!
//! - [`local_maxima`] / [`local_minima`]: strict window comparison, a
//!   point must beat every neighbour within `order` samples on both
//!   sides (window clipped at the edges, so endpoints never qualify).
//!   Pattern detection runs on these.
//! - [`find_peaks`]: plateau-aware peak finding with a minimum spacing
//!   between accepted peaks and a prominence filter against the
//!   surrounding baseline. Support/resistance detection runs on these.

/// Indices of strict local maxima within an `order`-sample window
pub fn local_maxima(values: &[f64], order: usize) -> Vec<usize> {
    extrema_by(values, order, |candidate, other| candidate > other)
}

/// Indices of strict local minima within an `order`-sample window
pub fn local_minima(values: &[f64], order: usize) -> Vec<usize> {
    extrema_by(values, order, |candidate, other| candidate < other)
}

fn extrema_by(values: &[f64], order: usize, wins: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    let n = values.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }
    // Endpoints compare against their own clipped index and can never
    // win a strict comparison.
    'candidates: for i in 1..n - 1 {
        for k in 1..=order {
            let left = i.saturating_sub(k);
            let right = (i + k).min(n - 1);
            if !wins(values[i], values[left]) || !wins(values[i], values[right]) {
                continue 'candidates;
            }
        }
        out.push(i);
    }
    out
}

/// Peak finding with spacing and prominence filters.
///
/// Raw peaks are plateau midpoints; peaks closer than `min_distance`
/// samples to a higher accepted peak are dropped first, then peaks whose
/// prominence falls below `min_prominence`. To find troughs, run this on
/// the negated series.
pub fn find_peaks(values: &[f64], min_prominence: f64, min_distance: usize) -> Vec<usize> {
    let mut peaks = raw_maxima(values);
    if min_distance > 1 {
        peaks = select_by_distance(values, &peaks, min_distance);
    }
    peaks.retain(|&peak| prominence(values, peak) >= min_prominence);
    peaks
}

/// Plateau-aware raw maxima: rising edge, optional flat top, falling
/// edge; the reported index is the middle of the plateau.
fn raw_maxima(values: &[f64]) -> Vec<usize> {
    let n = values.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let last = n - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Keep the highest peaks, removing any peak closer than `distance`
/// samples to a higher one that was kept.
fn select_by_distance(values: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    // Highest priority first
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| values[peaks[b]].total_cmp(&values[peaks[a]]));

    for &j in &order {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            k -= 1;
            keep[k] = false;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Height of a peak above its surrounding baseline: walk out on each
/// side until higher ground or the edge, take the lower of the two
/// minima found, subtract from the peak height.
fn prominence(values: &[f64], peak: usize) -> f64 {
    let height = values[peak];

    let mut left_min = height;
    let mut i = peak;
    while i > 0 {
        i -= 1;
        if values[i] > height {
            break;
        }
        if values[i] < left_min {
            left_min = values[i];
        }
    }

    let mut right_min = height;
    let mut i = peak;
    while i + 1 < values.len() {
        i += 1;
        if values[i] > height {
            break;
        }
        if values[i] < right_min {
            right_min = values[i];
        }
    }

    height - left_min.max(right_min)
}
