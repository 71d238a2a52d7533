use itertools::Itertools;
use rayon::prelude::*;

use crate::config::constants::rounding::CARBON_UNIT_DP;
use crate::config::{DF, ProtocolRule, ProtocolRules};
use crate::domain::YearSeries;
use crate::error::{CarbonError, CarbonResult};
use crate::models::{CarbonRecord, CarbonUnitRecord};
use crate::utils::round_to;

pub struct UnitConverter;

impl UnitConverter {
    /// Annual carbon units for one protocol.
    ///
    /// 1. Cumulative carbon -> CO2e with the protocol's factor and coefficient.
    /// 2. Interpolate to every integer year.
    /// 3. Difference against a flat zero baseline, withhold the buffer.
    /// 4. Round and drop non-finite rows (the first year never has a delta).
    pub fn convert_protocol(
        carbon: &[CarbonRecord],
        protocol_id: &str,
        rule: &ProtocolRule,
    ) -> CarbonResult<Vec<CarbonUnitRecord>> {
        Self::check_rule(protocol_id, rule)?;

        // 1. CO2e knots
        let knots: Vec<(i32, f64)> = carbon
            .iter()
            .map(|r| (r.year, rule.to_co2e(r.cumulative_score)))
            .collect();

        // 2. Annual project series
        let (project, kind) = YearSeries::from_knots(&knots, "carbon records")?;
        if DF.log_interpolation {
            log::info!(
                "[converter] {}: {} knots -> {} years ({})",
                protocol_id,
                knots.len(),
                project.len(),
                kind
            );
        }

        // 3. Deltas against the zero-sequestration counterfactual
        let baseline = YearSeries::zeros(project.start_year(), project.len());
        let delta_project = project.first_difference();
        let delta_baseline = baseline.first_difference();

        let mut dropped = 0usize;
        let records: Vec<CarbonUnitRecord> = delta_project
            .iter()
            .zip(delta_baseline.values())
            .filter_map(|((year, dp), &db)| {
                let net = dp - db;
                let buffer = rule.buffer_for(net);
                let units = net - buffer;

                // 4. Boundary artefacts never reach the output
                if !units.is_finite() {
                    dropped += 1;
                    return None;
                }
                Some(CarbonUnitRecord {
                    year,
                    protocol_id: protocol_id.to_string(),
                    delta_project: round_to(dp, CARBON_UNIT_DP),
                    delta_baseline: round_to(db, CARBON_UNIT_DP),
                    net_delta: round_to(net, CARBON_UNIT_DP),
                    buffer_amount: round_to(buffer, CARBON_UNIT_DP),
                    carbon_units: round_to(units, CARBON_UNIT_DP),
                })
            })
            .collect();

        if dropped > 0 {
            log::debug!("[converter] {}: dropped {} non-finite rows", protocol_id, dropped);
        }
        if DF.log_converter {
            let total: f64 = records.iter().map(|r| r.carbon_units).sum();
            log::info!(
                "[converter] {}: {} years, {:.2} CU/ac total",
                protocol_id,
                records.len(),
                total
            );
        }

        Ok(records)
    }

    fn check_rule(protocol_id: &str, rule: &ProtocolRule) -> CarbonResult<()> {
        if rule.buffer_applies && !(0.0..1.0).contains(&rule.buffer_fraction) {
            return Err(CarbonError::InvalidParams {
                field: "BUF",
                reason: format!(
                    "buffer fraction for {} must be within [0, 1) (got {})",
                    protocol_id, rule.buffer_fraction
                ),
            });
        }
        if !rule.to_co2e(1.0).is_finite() {
            return Err(CarbonError::InvalidParams {
                field: "co2_conversion_factor",
                reason: format!("conversion for {} is not finite", protocol_id),
            });
        }
        Ok(())
    }
}

/// Carbon units for each requested protocol, concatenated in request order.
/// Protocols are independent and computed in parallel. A protocol listed twice
/// is converted once, at its first position. An empty protocol list yields an
/// empty result.
pub fn convert_to_units<P>(
    carbon: &[CarbonRecord],
    protocols: &[P],
    rules: &ProtocolRules,
) -> CarbonResult<Vec<CarbonUnitRecord>>
where
    P: AsRef<str> + Sync,
{
    if protocols.is_empty() {
        log::warn!("[converter] no protocols requested; nothing to convert");
        return Ok(Vec::new());
    }

    let unique: Vec<&str> = protocols.iter().map(|p| p.as_ref()).unique().collect();
    if unique.len() < protocols.len() {
        log::warn!(
            "[converter] {} duplicate protocol(s) ignored",
            protocols.len() - unique.len()
        );
    }

    let per_protocol = unique
        .par_iter()
        .map(|&id| UnitConverter::convert_protocol(carbon, id, &rules.resolve(id)))
        .collect::<CarbonResult<Vec<_>>>()?;

    Ok(per_protocol.into_iter().flatten().collect())
}
