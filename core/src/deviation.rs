/// Outcome of checking one actual value against its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricEvaluation {
    pub deviation: f64,
    pub in_range: bool,
}

impl MetricEvaluation {
    pub fn evaluate(actual: f64, target: f64, tolerance_pct: f64) -> Self {
        MetricEvaluation {
            deviation: deviation(actual, target),
            in_range: in_tolerance(actual, target, tolerance_pct),
        }
    }
}

/// Largest magnitude [`deviation`] reports.
pub const DEVIATION_LIMIT: f64 = 1e300;

/// Signed percentage deviation of `actual` from `target`, rounded to two
/// decimal places. Zero when `target` is zero.
///
/// Always finite, larger deviations saturate at `±DEVIATION_LIMIT`.
pub fn deviation(actual: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    let pct = relative_pct(actual, target);
    if pct.is_nan() {
        return 0.0;
    }
    round2(pct.clamp(-DEVIATION_LIMIT, DEVIATION_LIMIT))
}

/// Whether the unrounded absolute deviation stays within `tolerance_pct`.
/// A zero target only accepts an actual value of exactly zero.
pub fn in_tolerance(actual: f64, target: f64, tolerance_pct: f64) -> bool {
    if target == 0.0 {
        return actual == 0.0;
    }
    relative_pct(actual, target).abs() <= tolerance_pct
}

fn relative_pct(actual: f64, target: f64) -> f64 {
    (actual - target) / target * 100.0
}

fn round2(value: f64) -> f64 {
    // no fractional digits left at this magnitude
    if value.abs() >= 1e15 {
        return value;
    }
    (value * 100.0).round() / 100.0
}
