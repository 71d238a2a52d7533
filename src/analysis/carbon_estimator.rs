use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::yield_model::YieldPredictor;
use crate::config::constants::metrics::ABOVEGROUND_CARBON;
use crate::config::constants::rounding::CARBON_SCORE_DP;
use crate::domain::PlantingScenario;
use crate::error::CarbonResult;
use crate::models::{CarbonRecord, MetricTable, records_from_cumulative};
use crate::utils::round_to;

const SPECIES_PREFIX: &str = "TPA_";

/// One year of the linear carbon model.
/// JSON: `{"TPA_DF": .., "TPA_RC": .., "TPA_total": .., "Survival": .., "SI": .., "Intercept": ..}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    #[serde(rename = "TPA_total")]
    pub tpa_total: f64,
    #[serde(rename = "Survival")]
    pub survival: f64,
    #[serde(rename = "SI")]
    pub site_index: f64,
    #[serde(rename = "Intercept")]
    pub intercept: f64,
    /// Per-species coefficients keyed `TPA_<CODE>`
    #[serde(flatten)]
    pub species: BTreeMap<String, f64>,
}

impl CoefficientRow {
    fn species_coefficient(&self, code: &str) -> Option<f64> {
        self.species
            .iter()
            .find(|(key, _)| {
                key.get(..SPECIES_PREFIX.len())
                    .is_some_and(|p| p.eq_ignore_ascii_case(SPECIES_PREFIX))
                    && key[SPECIES_PREFIX.len()..].eq_ignore_ascii_case(code)
            })
            .map(|(_, c)| *c)
    }

    /// score = Σ coef[species]·tpa + coef[total]·total_tpa + coef[survival]·survival + coef[si]·si + intercept.
    /// None when a planted species has no coefficient.
    fn score(&self, scenario: &PlantingScenario) -> Option<f64> {
        let mut species_term = 0.0;
        for (code, &tpa) in &scenario.species_tpa {
            match self.species_coefficient(code) {
                Some(coef) => species_term += coef * tpa,
                None if tpa == 0.0 => {}
                None => return None,
            }
        }

        Some(
            species_term
                + self.tpa_total * scenario.total_tpa()
                + self.survival * scenario.survival_pct
                + self.site_index * scenario.site_index
                + self.intercept,
        )
    }
}

/// Linear carbon model coefficients keyed by year.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable(pub BTreeMap<i32, CoefficientRow>);

/// Where carbon scores come from.
#[derive(Clone, Copy)]
pub enum CarbonSource<'a> {
    /// Fixed linear regression evaluated independently per year
    Coefficients(&'a CoefficientTable),
    /// Trained per-(year, metric) models over polynomial features
    Model(&'a dyn YieldPredictor),
}

/// Carbon series plus, for model-based estimates, the full stand metric table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CarbonEstimate {
    pub records: Vec<CarbonRecord>,
    pub metrics: Option<MetricTable>,
}

pub struct CarbonEstimator;

impl CarbonEstimator {
    /// Linear-coefficient mode. Years are evaluated independently; a year whose
    /// row lacks a coefficient for a planted species is left out.
    pub fn from_coefficients(
        scenario: &PlantingScenario,
        table: &CoefficientTable,
    ) -> CarbonResult<Vec<CarbonRecord>> {
        scenario.validate()?;

        let points: Vec<(i32, f64)> = table
            .0
            .iter()
            .filter_map(|(&year, row)| match row.score(scenario) {
                Some(score) => Some((year, score)),
                None => {
                    log::warn!(
                        "[estimator] year {} has no coefficient for one of {:?}; skipping",
                        year,
                        scenario.species_tpa.keys().collect::<Vec<_>>()
                    );
                    None
                }
            })
            .collect();

        Ok(records_from_cumulative(&points, |v| round_to(v, CARBON_SCORE_DP)))
    }

    /// Polynomial-model mode. Carbon comes from the `ABLD_C` metric; other
    /// metrics are returned untouched in the table.
    pub fn from_model(
        scenario: &PlantingScenario,
        predictor: &dyn YieldPredictor,
    ) -> CarbonResult<CarbonEstimate> {
        scenario.validate()?;

        let features = scenario.feature_vector()?;
        let metrics = predictor.predict(&features)?;

        let points = metrics.column(ABOVEGROUND_CARBON);
        if points.is_empty() {
            log::warn!(
                "[estimator] yield model produced no {} values for {}",
                ABOVEGROUND_CARBON,
                scenario.variant
            );
        }

        Ok(CarbonEstimate {
            records: records_from_cumulative(&points, |v| round_to(v, CARBON_SCORE_DP)),
            metrics: Some(metrics),
        })
    }

    pub fn estimate(scenario: &PlantingScenario, source: CarbonSource<'_>) -> CarbonResult<CarbonEstimate> {
        match source {
            CarbonSource::Coefficients(table) => Ok(CarbonEstimate {
                records: Self::from_coefficients(scenario, table)?,
                metrics: None,
            }),
            CarbonSource::Model(predictor) => Self::from_model(scenario, predictor),
        }
    }
}

/// Year-indexed cumulative and annual carbon for a scenario.
pub fn estimate_carbon(
    scenario: &PlantingScenario,
    source: CarbonSource<'_>,
) -> CarbonResult<Vec<CarbonRecord>> {
    CarbonEstimator::estimate(scenario, source).map(|e| e.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    fn example_scenario() -> PlantingScenario {
        let inputs = [
            ("tpa_df", 50.0),
            ("tpa_rc", 20.0),
            ("tpa_wh", 10.0),
            ("survival", 70.0),
            ("si", 120.0),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
        PlantingScenario::from_flat_inputs(Variant::PN, &inputs).unwrap()
    }

    fn row(df: f64, intercept: f64) -> CoefficientRow {
        CoefficientRow {
            tpa_total: 0.02,
            survival: 0.01,
            site_index: 0.01,
            intercept,
            species: [("TPA_DF", df), ("TPA_RC", 0.05), ("TPA_WH", 0.05)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn test_linear_example_scores_eleven() {
        let json = r#"{"2025": {"TPA_DF": 0.1, "TPA_RC": 0.05, "TPA_WH": 0.05,
                       "TPA_total": 0.02, "Survival": 0.01, "SI": 0.01, "Intercept": 1.0}}"#;
        let table: CoefficientTable = serde_json::from_str(json).unwrap();
        let records = estimate_carbon(&example_scenario(), CarbonSource::Coefficients(&table)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2025);
        assert_eq!(records[0].cumulative_score, 11.0);
        assert_eq!(records[0].annual_score, 11.0);
    }

    #[test]
    fn test_linear_monotone_and_additive() {
        let mut table = CoefficientTable::default();
        for (i, year) in [2029, 2034, 2039, 2044].iter().enumerate() {
            table.0.insert(*year, row(0.1 * (i + 1) as f64, 1.0 + i as f64));
        }
        let records = CarbonEstimator::from_coefficients(&example_scenario(), &table).unwrap();
        assert_eq!(records.len(), 4);
        for w in records.windows(2) {
            assert!(w[1].cumulative_score >= w[0].cumulative_score);
            let diff = w[1].cumulative_score - w[0].cumulative_score;
            assert!((w[1].annual_score - diff).abs() < 1e-3);
        }
    }

    #[test]
    fn test_year_missing_species_coefficient_is_skipped() {
        let mut table = CoefficientTable::default();
        table.0.insert(2025, row(0.1, 1.0));
        let mut incomplete = row(0.1, 1.0);
        incomplete.species.remove("TPA_RC");
        table.0.insert(2030, incomplete);

        let records = CarbonEstimator::from_coefficients(&example_scenario(), &table).unwrap();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2025]);
    }

    #[test]
    fn test_model_mode_uses_aboveground_carbon() {
        let predictor = |x: &[f64]| {
            let mut t = MetricTable::new();
            // survival drives growth in this toy model
            t.insert(2029, "ABLD_C", x[0] * 0.1);
            t.insert(2034, "ABLD_C", x[0] * 0.3);
            t.insert(2034, "QMD", 6.5);
            t.insert(2039, "SDI", 210.0);
            t
        };
        let estimate = CarbonEstimator::estimate(&example_scenario(), CarbonSource::Model(&predictor)).unwrap();
        assert_eq!(estimate.records.len(), 2);
        assert_eq!(estimate.records[0].cumulative_score, 7.0);
        assert_eq!(estimate.records[1].annual_score, 14.0);

        let metrics = estimate.metrics.unwrap();
        assert_eq!(metrics.get(2034, "QMD"), Some(6.5));
        assert_eq!(metrics.get(2039, "SDI"), Some(210.0));
    }

    #[test]
    fn test_invalid_scenario_fails_fast() {
        let mut scenario = example_scenario();
        scenario.survival_pct = -5.0;
        let table = CoefficientTable::default();
        assert!(CarbonEstimator::from_coefficients(&scenario, &table).is_err());
    }
}
