//! Scenario -> carbon -> carbon units -> proforma, as plain function composition.
//!
//! The scenario and the financial parameters must agree on net acres.
//! Every stage takes the previous stage's output by value or reference and
//! nothing is cached between runs: the same request always yields the same
//! output.

use serde::{Deserialize, Serialize};

use crate::analysis::{
    CarbonEstimator, CarbonSource, CoefficientTable, RegressionBundle, compute_proforma, convert_to_units,
};
use crate::config::{DF, ProformaParams, ProtocolRules};
use crate::domain::PlantingScenario;
use crate::error::{CarbonError, CarbonResult};
use crate::models::{CarbonRecord, CarbonUnitRecord, MetricTable, ProformaOutput, final_output, with_start_year};

/// Carbon model input for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbonModelInput {
    Coefficients(CoefficientTable),
    Model(RegressionBundle),
}

impl CarbonModelInput {
    pub fn as_source(&self) -> CarbonSource<'_> {
        match self {
            Self::Coefficients(table) => CarbonSource::Coefficients(table),
            Self::Model(bundle) => CarbonSource::Model(bundle),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub scenario: PlantingScenario,
    pub carbon_model: CarbonModelInput,
    pub protocols: Vec<String>,
    /// Caller overrides. `None` uses the built-in rule table.
    #[serde(default)]
    pub rules: Option<ProtocolRules>,
    #[serde(default)]
    pub params: ProformaParams,
    /// Prepend the zero-carbon row at the project start year.
    #[serde(default)]
    pub prepend_start_year: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub carbon: Vec<CarbonRecord>,
    /// Full stand metrics when the carbon came from yield models.
    pub metrics: Option<MetricTable>,
    pub carbon_units: Vec<CarbonUnitRecord>,
    pub proforma: ProformaOutput,
}

impl PipelineOutput {
    /// Last modelled year and its cumulative carbon per acre.
    pub fn final_carbon(&self) -> Option<(i32, f64)> {
        final_output(&self.carbon)
    }
}

pub struct Pipeline;

impl Pipeline {
    pub fn run(request: &PipelineRequest) -> CarbonResult<PipelineOutput> {
        // 1. Fail fast on the inputs every stage depends on
        if request.protocols.is_empty() {
            return Err(CarbonError::EmptyProtocolList);
        }
        request.scenario.validate()?;
        request.params.validate()?;
        if request.scenario.net_acres != request.params.net_acres {
            return Err(CarbonError::InvalidParams {
                field: "net_acres",
                reason: format!(
                    "{} does not match the scenario's {} acres",
                    request.params.net_acres, request.scenario.net_acres
                ),
            });
        }

        // 2. Carbon
        let estimate = crate::trace_time!("carbon estimate", 0, {
            CarbonEstimator::estimate(&request.scenario, request.carbon_model.as_source())
        })?;
        let carbon = if request.prepend_start_year {
            with_start_year(estimate.records, request.params.project_start_year)
        } else {
            estimate.records
        };

        // 3. Carbon units
        let default_rules;
        let rules = match &request.rules {
            Some(rules) => rules,
            None => {
                default_rules = ProtocolRules::default();
                &default_rules
            }
        };
        let carbon_units = crate::trace_time!("unit conversion", 0, {
            convert_to_units(&carbon, request.protocols.as_slice(), rules)
        })?;

        // 4. Proforma
        let proforma = crate::trace_time!("proforma", 0, {
            compute_proforma(&carbon_units, &request.params)
        })?;

        if DF.log_pipeline {
            log::info!(
                "[pipeline] {} carbon rows, {} unit rows, {} proforma rows across {} protocol(s)",
                carbon.len(),
                carbon_units.len(),
                proforma.proforma_rows.len(),
                proforma.summaries.len()
            );
        }

        Ok(PipelineOutput {
            carbon,
            metrics: estimate.metrics,
            carbon_units,
            proforma,
        })
    }
}
