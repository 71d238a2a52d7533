//! Interpolation of sparse (x, y) knots.
//!
//! Growth models report carbon every few years; credit issuance is annual.
//! With 4+ knots we fit a cubic spline with not-a-knot end conditions (the
//! same curve `scipy.interpolate.make_interp_spline(k=3)` produces). A cubic
//! through fewer knots is ill-posed, so 2 or 3 knots fall back to piecewise
//! linear and a single knot becomes a constant.

use nalgebra::{DMatrix, DVector};

use crate::config::DF;

/// Minimum number of knots before a cubic spline is attempted.
pub const MIN_CUBIC_POINTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum InterpolationKind {
    #[strum(serialize = "cubic (not-a-knot)")]
    CubicNotAKnot,
    #[strum(serialize = "linear")]
    Linear,
    #[strum(serialize = "constant")]
    Constant,
}

#[derive(Debug, Clone)]
pub struct Interpolant {
    kind: InterpolationKind,
    xs: Vec<f64>,
    ys: Vec<f64>,
    // Second derivatives at each knot. Empty unless cubic.
    second_derivs: Vec<f64>,
}

impl Interpolant {
    /// Fits an interpolant through the knots.
    /// `xs` must be strictly increasing. Returns None for empty or mismatched input.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.is_empty() || xs.len() != ys.len() {
            return None;
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let n = xs.len();
        if n == 1 {
            return Some(Self::simple(InterpolationKind::Constant, xs, ys));
        }
        if n < MIN_CUBIC_POINTS {
            return Some(Self::simple(InterpolationKind::Linear, xs, ys));
        }

        match not_a_knot_second_derivs(xs, ys) {
            Some(second_derivs) => Some(Self {
                kind: InterpolationKind::CubicNotAKnot,
                xs: xs.to_vec(),
                ys: ys.to_vec(),
                second_derivs,
            }),
            None => {
                log::warn!(
                    "[interpolation] spline system singular for {} knots, using linear",
                    n
                );
                Some(Self::simple(InterpolationKind::Linear, xs, ys))
            }
        }
    }

    fn simple(kind: InterpolationKind, xs: &[f64], ys: &[f64]) -> Self {
        if DF.log_interpolation {
            log::info!("[interpolation] {} knots -> {}", xs.len(), kind);
        }
        Self {
            kind,
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivs: Vec::new(),
        }
    }

    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    /// Evaluates the interpolant. Outside the knot range the end pieces are extended.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.kind {
            InterpolationKind::Constant => self.ys[0],
            InterpolationKind::Linear => {
                let i = self.segment(x);
                let (x0, x1) = (self.xs[i], self.xs[i + 1]);
                let (y0, y1) = (self.ys[i], self.ys[i + 1]);
                y0 + (y1 - y0) * (x - x0) / (x1 - x0)
            }
            InterpolationKind::CubicNotAKnot => {
                let i = self.segment(x);
                let (x0, x1) = (self.xs[i], self.xs[i + 1]);
                let (y0, y1) = (self.ys[i], self.ys[i + 1]);
                let (m0, m1) = (self.second_derivs[i], self.second_derivs[i + 1]);
                let h = x1 - x0;
                let a = x1 - x;
                let b = x - x0;
                m0 * a.powi(3) / (6.0 * h)
                    + m1 * b.powi(3) / (6.0 * h)
                    + (y0 / h - m0 * h / 6.0) * a
                    + (y1 / h - m1 * h / 6.0) * b
            }
        }
    }

    // Index of the left knot of the piece covering x, clamped to the end pieces.
    fn segment(&self, x: f64) -> usize {
        let last_piece = self.xs.len() - 2;
        self.xs
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(last_piece)
    }
}

/// Solves for knot second derivatives with not-a-knot end conditions
/// (third derivative continuous across the second and penultimate knots).
fn not_a_knot_second_derivs(xs: &[f64], ys: &[f64]) -> Option<Vec<f64>> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DVector::<f64>::zeros(n);

    // Left end: h1*M0 - (h0+h1)*M1 + h0*M2 = 0
    a[(0, 0)] = h[1];
    a[(0, 1)] = -(h[0] + h[1]);
    a[(0, 2)] = h[0];

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    // Right end: h[n-2]*M[n-3] - (h[n-3]+h[n-2])*M[n-2] + h[n-3]*M[n-1] = 0
    a[(n - 1, n - 3)] = h[n - 2];
    a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
    a[(n - 1, n - 1)] = h[n - 3];

    let solution = a.lu().solve(&rhs)?;
    if solution.iter().all(|m| m.is_finite()) {
        Some(solution.iter().copied().collect())
    } else {
        None
    }
}
