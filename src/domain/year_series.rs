use serde::{Deserialize, Serialize};

use crate::error::{CarbonError, CarbonResult};
use crate::utils::{Interpolant, InterpolationKind, first_difference};

/// Contiguous annual values: one value per calendar year from `start_year`, no gaps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearSeries {
    start_year: i32,
    values: Vec<f64>,
}

impl YearSeries {
    pub fn new(start_year: i32, values: Vec<f64>) -> Self {
        Self { start_year, values }
    }

    pub fn zeros(start_year: i32, len: usize) -> Self {
        Self::new(start_year, vec![0.0; len])
    }

    /// Builds an annual series from sparse (year, value) knots by interpolating
    /// every integer year between the first and last knot.
    /// Knots are sorted first; the spline is sensitive to input order.
    pub fn from_knots(knots: &[(i32, f64)], label: &str) -> CarbonResult<(Self, InterpolationKind)> {
        let mut sorted = knots.to_vec();
        sorted.sort_by_key(|(year, _)| *year);

        if let Some(w) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CarbonError::DuplicateYear {
                year: w[0].0,
                series: label.to_string(),
            });
        }

        let xs: Vec<f64> = sorted.iter().map(|(y, _)| *y as f64).collect();
        let ys: Vec<f64> = sorted.iter().map(|(_, v)| *v).collect();

        let Some(interpolant) = Interpolant::fit(&xs, &ys) else {
            return Ok((Self::default(), InterpolationKind::Constant));
        };

        let first = sorted[0].0;
        let last = sorted[sorted.len() - 1].0;
        let values = (first..=last)
            .map(|year| interpolant.evaluate(year as f64))
            .collect();

        Ok((Self::new(first, values), interpolant.kind()))
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> Option<i32> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.start_year + self.values.len() as i32 - 1)
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        let idx = usize::try_from(year - self.start_year).ok()?;
        self.values.get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.start_year + i as i32, *v))
    }

    /// Year-over-year change. The first year has no predecessor and is NaN.
    pub fn first_difference(&self) -> Self {
        Self::new(self.start_year, first_difference(&self.values))
    }
}
