//! Externally trained yield models, seen only through `YieldPredictor`.
//!
//! The reference bundle format is a set of per-(year, metric) linear regressors
//! over the degree-3 polynomial expansion of the planting vector
//! `[survival, total_tpa, sp1, sp2, sp3, sp4, si]`. Any other model format can
//! plug in by implementing the trait.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::constants::planting::POLY_DEGREE;
use crate::config::{DF, Variant};
use crate::error::{CarbonError, CarbonResult};
use crate::models::MetricTable;
use crate::utils::polynomial_features;

/// predict(feature_vector) -> per-year metrics
pub trait YieldPredictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> CarbonResult<MetricTable>;
}

/// Any closure can stand in for a trained model.
impl<F> YieldPredictor for F
where
    F: Fn(&[f64]) -> MetricTable + Send + Sync,
{
    fn predict(&self, features: &[f64]) -> CarbonResult<MetricTable> {
        Ok(self(features))
    }
}

/// One fitted regressor: `y = coef · x_poly + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub year: i32,
    pub metric: String,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn predict(&self, x_poly: &[f64]) -> CarbonResult<f64> {
        if self.coef.len() != x_poly.len() {
            return Err(CarbonError::FeatureLengthMismatch {
                year: self.year,
                metric: self.metric.clone(),
                expected: self.coef.len(),
                found: x_poly.len(),
            });
        }
        let dot: f64 = self.coef.iter().zip(x_poly).map(|(c, x)| c * x).sum();
        Ok(dot + self.intercept)
    }
}

/// The full model set for one variant / location code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionBundle {
    pub variant: Variant,
    pub loccode: String,
    #[serde(default)]
    pub version: u32,
    pub models: Vec<LinearRegressor>,
}

impl YieldPredictor for RegressionBundle {
    fn predict(&self, features: &[f64]) -> CarbonResult<MetricTable> {
        let x_poly = polynomial_features(features, POLY_DEGREE);

        // Predictions can never signal negative growth: clip at 0.
        let predictions = self
            .models
            .par_iter()
            .map(|m| m.predict(&x_poly).map(|y| (m.year, m.metric.as_str(), y.max(0.0))))
            .collect::<CarbonResult<Vec<_>>>()?;

        let mut table = MetricTable::new();
        for (year, metric, value) in predictions {
            if DF.log_yield_predictions {
                log::debug!("[yield] {} {} {} = {:.4}", self.variant, year, metric, value);
            }
            table.insert(year, metric, value);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::polynomial_feature_count;

    fn regressor(year: i32, metric: &str, first_coef: f64, intercept: f64) -> LinearRegressor {
        let mut coef = vec![0.0; polynomial_feature_count(7, POLY_DEGREE)];
        coef[0] = first_coef;
        LinearRegressor {
            year,
            metric: metric.to_string(),
            coef,
            intercept,
        }
    }

    #[test]
    fn test_bundle_predicts_and_clips() {
        let bundle = RegressionBundle {
            variant: Variant::PN,
            loccode: "603".to_string(),
            version: 3,
            models: vec![
                regressor(2030, "ABLD_C", 0.5, 1.0),
                regressor(2030, "BA", 0.0, -3.0),
            ],
        };
        // coef[0] multiplies survival
        let table = bundle.predict(&[70.0, 300.0, 100.0, 100.0, 100.0, 0.0, 120.0]).unwrap();
        assert_eq!(table.get(2030, "ABLD_C"), Some(36.0));
        assert_eq!(table.get(2030, "BA"), Some(0.0));
    }

    #[test]
    fn test_bundle_rejects_wrong_width() {
        let bundle = RegressionBundle {
            variant: Variant::PN,
            loccode: "603".to_string(),
            version: 3,
            models: vec![LinearRegressor {
                year: 2030,
                metric: "ABLD_C".to_string(),
                coef: vec![1.0; 7],
                intercept: 0.0,
            }],
        };
        let err = bundle.predict(&[1.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            CarbonError::FeatureLengthMismatch { expected: 7, found: 119, .. }
        ));
    }

    #[test]
    fn test_closure_predictor() {
        let predictor = |x: &[f64]| {
            let mut t = MetricTable::new();
            t.insert(2030, "ABLD_C", x[0]);
            t
        };
        let table = predictor.predict(&[42.0]).unwrap();
        assert_eq!(table.get(2030, "ABLD_C"), Some(42.0));
    }
}
