use std::path::Path;

use anyhow::{Result, bail};

use super::output::{emit_carbon, emit_proforma, emit_units};
use crate::analysis::{CarbonEstimator, compute_proforma, convert_to_units};
use crate::config::constants::DEFAULT_START_YEAR;
use crate::config::{ProformaParams, ProtocolRules, Variant};
use crate::data::{
    ProformaRequest, UnitsRequest, load_coefficients, load_json, load_model_bundle, load_proforma_params,
    load_protocol_rules, load_scenario,
};
use crate::domain::PlantingScenario;
use crate::engine::{CarbonModelInput, Pipeline, PipelineRequest};
use crate::models::with_start_year;
use crate::report::{ProformaCsv, timestamped_csv_path};
use crate::{Cli, Command, ModelArgs, OutputFormat};

/// CLI entry point for the binary.
pub fn run_app(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Carbon { model } => carbon(model, cli.format),
        Command::Units { request } => units(request, cli.format),
        Command::Proforma { request, csv_dir } => proforma(request, csv_dir.as_deref(), cli.format),
        Command::Run {
            model,
            protocols,
            rules,
            params,
            csv_dir,
        } => run(
            model,
            protocols,
            rules.as_deref(),
            params.as_deref(),
            csv_dir.as_deref(),
            cli.format,
        ),
    }
}

fn requested_variant(model: &ModelArgs) -> Option<Variant> {
    model.variant.as_deref().map(Variant::resolve)
}

fn resolve_scenario(model: &ModelArgs) -> Result<PlantingScenario> {
    let variant = requested_variant(model);
    match &model.scenario {
        Some(path) => load_scenario(path, variant),
        None => {
            let variant = variant.unwrap_or_default();
            log::info!("[cli] no scenario file given, using the {} preset", variant);
            Ok(PlantingScenario::from_preset(variant, 1.0))
        }
    }
}

fn resolve_carbon_model(model: &ModelArgs, variant: Variant) -> Result<CarbonModelInput> {
    if let Some(path) = &model.coefficients {
        return Ok(CarbonModelInput::Coefficients(load_coefficients(path)?));
    }
    if let Some(loccode) = &model.loccode {
        let bundle = load_model_bundle(model.models_dir.as_deref(), variant, loccode)?;
        return Ok(CarbonModelInput::Model(bundle));
    }
    bail!("No carbon model given: pass --coefficients <file> or --loccode <code>")
}

fn carbon(model: &ModelArgs, format: OutputFormat) -> Result<()> {
    let scenario = resolve_scenario(model)?;
    let carbon_model = resolve_carbon_model(model, scenario.variant)?;

    let estimate = CarbonEstimator::estimate(&scenario, carbon_model.as_source())?;
    let records = if model.prepend_start_year {
        with_start_year(estimate.records, DEFAULT_START_YEAR)
    } else {
        estimate.records
    };
    emit_carbon(&records, estimate.metrics.as_ref(), format)
}

fn units(request: &Path, format: OutputFormat) -> Result<()> {
    let req: UnitsRequest = load_json(request)?;
    let rules = req.protocol_rules.unwrap_or_default();
    let records = convert_to_units(&req.carbon_rows, req.protocols.as_slice(), &rules)?;
    emit_units(&records, format)
}

fn proforma(request: &Path, csv_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let req: ProformaRequest = load_json(request)?;
    let output = compute_proforma(&req.cu_rows, &req.params)?;

    if let Some(dir) = csv_dir {
        let mut csv = ProformaCsv::new();
        csv.add_rows(&output.proforma_rows);
        csv.write_to(&timestamped_csv_path(dir))?;
    }
    emit_proforma(&output, format)
}

fn run(
    model: &ModelArgs,
    protocols: &[String],
    rules: Option<&Path>,
    params: Option<&Path>,
    csv_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut scenario = resolve_scenario(model)?;
    let carbon_model = resolve_carbon_model(model, scenario.variant)?;
    let rules: Option<ProtocolRules> = rules.map(load_protocol_rules).transpose()?;

    // Acreage comes from whichever side was given as a file. With both, they must agree.
    let params: ProformaParams = match params.map(load_proforma_params).transpose()? {
        Some(params) => {
            if model.scenario.is_none() {
                scenario.net_acres = params.net_acres;
            }
            params
        }
        None => ProformaParams {
            net_acres: scenario.net_acres,
            ..ProformaParams::default()
        },
    };

    let request = PipelineRequest {
        scenario,
        carbon_model,
        protocols: protocols.to_vec(),
        rules,
        params,
        prepend_start_year: model.prepend_start_year,
    };
    let output = Pipeline::run(&request)?;

    if let Some(dir) = csv_dir {
        let mut csv = ProformaCsv::new();
        csv.add_rows(&output.proforma.proforma_rows);
        csv.write_to(&timestamped_csv_path(dir))?;
    }

    match format {
        OutputFormat::Json => super::output::print_json(&output),
        OutputFormat::Table => {
            emit_carbon(&output.carbon, output.metrics.as_ref(), format)?;
            emit_units(&output.carbon_units, format)?;
            emit_proforma(&output.proforma, format)
        }
    }
}
