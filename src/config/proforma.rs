//! Financial assumptions for the proforma model.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::constants::{DEFAULT_HORIZON_YEARS, DEFAULT_NPV_YEARS, DEFAULT_START_YEAR};
use crate::error::{CarbonError, CarbonResult};

/// When the planting and seedling costs land in the proforma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneTimeCostTiming {
    /// Charged on every row. Reproduces the established model output; callers
    /// wanting a one-off charge zero the costs after the first year.
    #[default]
    EveryYear,
    /// Charged only on the first row of each protocol series
    FirstYearOnly,
}

/// Immutable financial assumptions. All rates are fractions (0.03 = 3%).
/// Aliases accept the key names of the proforma presets file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProformaParams {
    pub net_acres: f64,
    pub num_plots: f64,
    #[serde(alias = "cost_per_cfi_plot")]
    pub cost_per_plot: f64,
    #[serde(alias = "price_per_ert_initial")]
    pub initial_credit_price: f64,
    #[serde(alias = "credit_price_increase")]
    pub annual_price_growth_rate: f64,
    #[serde(alias = "registry_fees")]
    pub registry_fee: f64,
    pub validation_cost: f64,
    pub verification_cost: f64,
    #[serde(alias = "issuance_fee_per_ert")]
    pub issuance_fee_per_unit: f64,
    #[serde(alias = "anticipated_inflation")]
    pub inflation_rate: f64,
    pub discount_rate: f64,
    pub planting_cost: f64,
    pub seedling_cost: f64,
    #[serde(alias = "year_start")]
    pub project_start_year: i32,
    #[serde(alias = "years_advance")]
    pub horizon_years: i32,
    pub npv_years: i32,
    pub one_time_costs: OneTimeCostTiming,
}

pub const PROFORMA_DEFAULTS: ProformaParams = ProformaParams {
    net_acres: 1000.0,
    num_plots: 30.0,
    cost_per_plot: 250.0,
    initial_credit_price: 20.0,
    annual_price_growth_rate: 0.03,
    registry_fee: 1000.0,
    validation_cost: 25000.0,
    verification_cost: 15000.0,
    issuance_fee_per_unit: 0.20,
    inflation_rate: 0.02,
    discount_rate: 0.05,
    planting_cost: 0.0,
    seedling_cost: 0.0,
    project_start_year: DEFAULT_START_YEAR,
    horizon_years: DEFAULT_HORIZON_YEARS,
    npv_years: DEFAULT_NPV_YEARS,
    one_time_costs: OneTimeCostTiming::EveryYear,
};

impl Default for ProformaParams {
    fn default() -> Self {
        PROFORMA_DEFAULTS
    }
}

impl ProformaParams {
    /// Discount rate used for NPV: inflation plus the real discount rate.
    pub fn npv_rate(&self) -> f64 {
        self.inflation_rate + self.discount_rate
    }

    pub fn last_year(&self) -> i32 {
        self.project_start_year + self.horizon_years
    }

    pub fn npv_cutoff_year(&self) -> i32 {
        self.project_start_year + self.npv_years
    }

    /// Survey cost for one inventory round, inflated one year.
    pub fn survey_cost(&self) -> f64 {
        self.num_plots * self.cost_per_plot * (1.0 + self.inflation_rate)
    }

    pub fn validate(&self) -> CarbonResult<()> {
        if !self.net_acres.is_finite() || self.net_acres <= 0.0 {
            return Err(CarbonError::NonPositiveAcres(self.net_acres));
        }

        let amounts = [
            ("num_plots", self.num_plots),
            ("cost_per_plot", self.cost_per_plot),
            ("initial_credit_price", self.initial_credit_price),
            ("registry_fee", self.registry_fee),
            ("validation_cost", self.validation_cost),
            ("verification_cost", self.verification_cost),
            ("issuance_fee_per_unit", self.issuance_fee_per_unit),
            ("planting_cost", self.planting_cost),
            ("seedling_cost", self.seedling_cost),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(CarbonError::InvalidParams {
                    field,
                    reason: format!("must be finite and >= 0 (got {})", value),
                });
            }
        }

        let rates = [
            ("annual_price_growth_rate", self.annual_price_growth_rate),
            ("inflation_rate", self.inflation_rate),
            ("discount_rate", self.discount_rate),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value <= -1.0 {
                return Err(CarbonError::InvalidParams {
                    field,
                    reason: format!("must be finite and > -1 (got {})", value),
                });
            }
        }
        if self.npv_rate() <= -1.0 {
            return Err(CarbonError::InvalidParams {
                field: "discount_rate",
                reason: "inflation + discount must be > -1".to_string(),
            });
        }

        if self.horizon_years <= 0 {
            return Err(CarbonError::InvalidParams {
                field: "horizon_years",
                reason: format!("must be > 0 (got {})", self.horizon_years),
            });
        }
        if self.npv_years < 0 {
            return Err(CarbonError::InvalidParams {
                field: "npv_years",
                reason: format!("must be >= 0 (got {})", self.npv_years),
            });
        }
        Ok(())
    }
}
