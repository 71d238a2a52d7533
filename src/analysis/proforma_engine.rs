//! Project-level revenue, cost and NPV projection from per-acre carbon units.
//!
//! Units accumulate between checkpoints (the start year and every fifth year
//! after it) and are issued and sold in one lump at each checkpoint. Costs
//! follow the verification cycle: validation at the start, verification at
//! later checkpoints, a field survey the year before each checkpoint.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::config::constants::ISSUANCE_PERIOD_YEARS;
use crate::config::{DF, OneTimeCostTiming, ProformaParams};
use crate::error::CarbonResult;
use crate::models::{CarbonUnitRecord, ProformaOutput, ProformaRow, ProformaSummary};
use crate::utils::{growth_factor, npv};

pub struct ProformaEngine;

impl ProformaEngine {
    /// Start year, then every issuance period after it.
    #[inline]
    pub fn is_checkpoint(year: i32, start_year: i32) -> bool {
        year == start_year || (year > start_year && (year - start_year) % ISSUANCE_PERIOD_YEARS == 0)
    }

    /// The year immediately before each checkpoint.
    #[inline]
    pub fn is_survey_year(year: i32, start_year: i32) -> bool {
        (year - start_year).rem_euclid(ISSUANCE_PERIOD_YEARS) == ISSUANCE_PERIOD_YEARS - 1
    }

    /// Rows for one protocol. `series` must be sorted by year.
    pub fn project_protocol(
        protocol_id: &str,
        series: &[CarbonUnitRecord],
        params: &ProformaParams,
    ) -> Vec<ProformaRow> {
        let start = params.project_start_year;
        let last = params.last_year();

        let in_horizon: Vec<&CarbonUnitRecord> = series.iter().filter(|r| r.year <= last).collect();
        let available: Vec<(i32, f64)> = in_horizon
            .iter()
            .map(|r| (r.year, r.carbon_units * params.net_acres))
            .collect();

        in_horizon
            .iter()
            .zip(&available)
            .enumerate()
            .map(|(i, (record, &(year, units_available)))| {
                // 1. Lump sale of everything generated in the trailing window
                let units_sold = if Self::is_checkpoint(year, start) {
                    let window_start = year - (ISSUANCE_PERIOD_YEARS - 1);
                    available
                        .iter()
                        .filter(|(y, _)| (window_start..=year).contains(y))
                        .map(|(_, u)| u)
                        .sum()
                } else {
                    0.0
                };

                // 2. Revenue
                let credit_price =
                    params.initial_credit_price * growth_factor(params.annual_price_growth_rate, year - start);
                let revenue = units_sold * credit_price;

                // 3. Costs
                let validation_verification_cost = if year == start {
                    params.validation_cost
                } else if Self::is_checkpoint(year, start) {
                    params.verification_cost
                } else {
                    0.0
                };
                let survey_cost = if Self::is_survey_year(year, start) {
                    params.survey_cost()
                } else {
                    0.0
                };
                let issuance_fee = units_sold * params.issuance_fee_per_unit;
                let (planting_cost, seedling_cost) = match params.one_time_costs {
                    OneTimeCostTiming::EveryYear => (params.planting_cost, params.seedling_cost),
                    OneTimeCostTiming::FirstYearOnly if i == 0 => (params.planting_cost, params.seedling_cost),
                    OneTimeCostTiming::FirstYearOnly => (0.0, 0.0),
                };

                let total_cost = validation_verification_cost
                    + survey_cost
                    + params.registry_fee
                    + issuance_fee
                    + planting_cost
                    + seedling_cost;

                ProformaRow {
                    year,
                    protocol_id: protocol_id.to_string(),
                    units_per_acre: record.carbon_units,
                    units_available,
                    units_sold,
                    credit_price,
                    revenue,
                    validation_verification_cost,
                    survey_cost,
                    registry_fee: params.registry_fee,
                    issuance_fee,
                    planting_cost,
                    seedling_cost,
                    total_cost,
                    net_revenue: revenue - total_cost,
                }
            })
            .collect()
    }

    /// Totals and NPV for one protocol's rows. Rows with a non-finite net
    /// revenue are left out of every aggregate.
    pub fn summarize(protocol_id: &str, rows: &[ProformaRow], params: &ProformaParams) -> ProformaSummary {
        let valid: Vec<&ProformaRow> = rows.iter().filter(|r| r.net_revenue.is_finite()).collect();
        if valid.len() < rows.len() {
            log::debug!(
                "[proforma] {}: {} rows with non-finite net revenue left out of the summary",
                protocol_id,
                rows.len() - valid.len()
            );
        }

        let total_net_revenue: f64 = valid.iter().map(|r| r.net_revenue).sum();

        let cutoff = params.npv_cutoff_year();
        let cashflows: Vec<f64> = valid
            .iter()
            .filter(|r| r.year <= cutoff)
            .map(|r| r.net_revenue)
            .collect();
        let npv_at_year_20 = npv(params.npv_rate(), &cashflows);

        ProformaSummary {
            protocol_id: protocol_id.to_string(),
            total_net_revenue,
            npv_at_year_20,
            npv_per_acre: npv_at_year_20 / params.net_acres,
        }
    }

    pub fn compute(cu_series: &[CarbonUnitRecord], params: &ProformaParams) -> CarbonResult<ProformaOutput> {
        params.validate()?;

        // Group by protocol, sorted by name then year
        let mut groups: BTreeMap<&str, Vec<CarbonUnitRecord>> = BTreeMap::new();
        for record in cu_series {
            groups
                .entry(record.protocol_id.as_str())
                .or_default()
                .push(record.clone());
        }
        for series in groups.values_mut() {
            series.sort_by_key(|r| r.year);
        }

        let projected: Vec<(Vec<ProformaRow>, ProformaSummary)> = groups
            .par_iter()
            .map(|(protocol_id, series)| {
                let rows = Self::project_protocol(protocol_id, series, params);
                let summary = Self::summarize(protocol_id, &rows, params);
                (rows, summary)
            })
            .collect();

        let mut output = ProformaOutput::default();
        for (rows, summary) in projected {
            if DF.log_proforma {
                let revenue: f64 = rows.iter().map(|r| r.revenue).sum();
                let cost: f64 = rows.iter().map(|r| r.total_cost).sum();
                log::info!(
                    "[proforma] {}: revenue ${:.2}, costs ${:.2}, NPV ${:.2}",
                    summary.protocol_id,
                    revenue,
                    cost,
                    summary.npv_at_year_20
                );
            }
            output.proforma_rows.extend(rows);
            output.summaries.push(summary);
        }
        Ok(output)
    }
}

/// Proforma rows and per-protocol summaries for a carbon unit series.
pub fn compute_proforma(cu_series: &[CarbonUnitRecord], params: &ProformaParams) -> CarbonResult<ProformaOutput> {
    ProformaEngine::compute(cu_series, params)
}

/// Only the checkpoint years (start, start+5, ...), as used for the net revenue chart.
pub fn checkpoint_rows<'a>(rows: &'a [ProformaRow], params: &ProformaParams) -> Vec<&'a ProformaRow> {
    rows.iter()
        .filter(|r| ProformaEngine::is_checkpoint(r.year, params.project_start_year))
        .collect()
}
