//! Logistic probability curves.

use ofcurve_core::models::{InputDefinition, InputKind};
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::factor::FactorValue;

/// Number of intervals in a curve; the curve has one more point than this.
pub const DEFAULT_POINT_COUNT: usize = 50;

/// `1 / (1 + exp(-(intercept + beta * x)))`
pub fn logistic(intercept: f64, beta: f64, x: f64) -> f64 {
    1.0 / (1.0 + (-(intercept + beta * x)).exp())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurvePoint {
    /// Primary factor in log10 space.
    pub x: f64,
    pub probability: f64,
}

/// The swept range of the primary factor, in log10 space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// 0.01 to 1000 kUA/L.
    pub const SPECIFIC_IGE: Domain = Domain { min: -2.0, max: 3.0 };
    /// 1 to 10000 mg.
    pub const PROTEIN_DOSE: Domain = Domain { min: 0.0, max: 4.0 };
    pub const FALLBACK: Domain = Domain { min: 0.0, max: 1.0 };

    pub fn for_kind(kind: InputKind) -> Domain {
        match kind {
            InputKind::SpecificIge => Domain::SPECIFIC_IGE,
            InputKind::ProteinDose => Domain::PROTEIN_DOSE,
            other => {
                warn!(kind = ?other, "no curve domain for primary input kind, using [0, 1]");
                Domain::FALLBACK
            }
        }
    }

    pub fn for_input(input: &InputDefinition) -> Domain {
        Domain::for_kind(input.kind())
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Sample the logistic curve at `point_count + 1` evenly spaced x values
/// from `domain.min` to `domain.max` inclusive.
///
/// A `point_count` of zero is treated as one interval.
pub fn generate_curve(intercept: f64, beta: f64, domain: Domain, point_count: usize) -> Vec<CurvePoint> {
    let n = point_count.max(1);
    (0..=n)
        .map(|i| {
            let x = domain.min + (i as f64 / n as f64) * domain.width();
            CurvePoint {
                x,
                probability: logistic(intercept, beta, x),
            }
        })
        .collect()
}

/// The highlighted point for the currently entered primary value.
///
/// `None` when the value does not parse, is not positive, or the
/// coefficients are not finite; the caller draws no marker.
pub fn evaluate_point(intercept: f64, beta: f64, raw: &FactorValue) -> Option<CurvePoint> {
    if !intercept.is_finite() || !beta.is_finite() {
        warn!(intercept, beta, "non-finite coefficients, no point");
        return None;
    }
    let value = raw.parse_number().filter(|v| *v > 0.0)?;
    let x = value.log10();
    Some(CurvePoint {
        x,
        probability: logistic(intercept, beta, x),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AxisTick {
    pub x: f64,
    pub label: String,
}

/// Format a log10-space axis position as its linear value.
pub fn format_axis_value(log_value: f64) -> String {
    let value = 10f64.powf(log_value);
    if log_value < 1.0 && log_value != 0.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    }
}

/// `divisions + 1` evenly spaced ticks across the domain.
pub fn axis_ticks(domain: Domain, divisions: usize) -> Vec<AxisTick> {
    let n = divisions.max(1);
    (0..=n)
        .map(|i| {
            let x = domain.min + i as f64 * (domain.width() / n as f64);
            AxisTick {
                x,
                label: format_axis_value(x),
            }
        })
        .collect()
}
