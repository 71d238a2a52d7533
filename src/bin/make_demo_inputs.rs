use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

use forest_carbon::analysis::{CoefficientRow, CoefficientTable, LinearRegressor, RegressionBundle};
use forest_carbon::config::constants::metrics::ABOVEGROUND_CARBON;
use forest_carbon::config::constants::planting::POLY_DEGREE;
use forest_carbon::config::constants::{DEFAULT_HORIZON_YEARS, DEFAULT_START_YEAR};
use forest_carbon::config::{PERSISTENCE, PROFORMA_DEFAULTS, ProtocolRules, Variant, model_bundle_filename};
use forest_carbon::data::save_json;
use forest_carbon::domain::PlantingScenario;
use forest_carbon::utils::polynomial_feature_count;

// Growth-model output cadence
const DEMO_STEP_YEARS: usize = 5;
const DEMO_LOCCODE: &str = "DEMO";
const DEMO_NET_ACRES: f64 = 1000.0;

/// Linear coefficients for a stand that accumulates carbon along an S-curve.
fn demo_coefficients(variant: Variant) -> CoefficientTable {
    let first = DEFAULT_START_YEAR + DEMO_STEP_YEARS as i32;
    let last = DEFAULT_START_YEAR + DEFAULT_HORIZON_YEARS;

    let mut table = CoefficientTable::default();
    for year in (first..=last).step_by(DEMO_STEP_YEARS) {
        let age = (year - DEFAULT_START_YEAR) as f64;
        // Logistic growth, scaled per tree planted
        let growth = 1.0 / (1.0 + (-(age - 20.0) / 6.0).exp());

        let species: BTreeMap<String, f64> = variant
            .species()
            .iter()
            .enumerate()
            .map(|(slot, code)| (format!("TPA_{}", code), growth * (0.25 - 0.04 * slot as f64)))
            .collect();

        table.0.insert(
            year,
            CoefficientRow {
                tpa_total: 0.02 * growth,
                survival: 0.15 * growth,
                site_index: 0.08 * growth,
                intercept: 0.0,
                species,
            },
        );
    }
    table
}

/// Polynomial bundle exercising the model path. Only first-order terms are non-zero.
fn demo_bundle(variant: Variant) -> RegressionBundle {
    let width = polynomial_feature_count(7, POLY_DEGREE);
    let mut models = Vec::new();

    for year in (DEFAULT_START_YEAR + 5..=DEFAULT_START_YEAR + DEFAULT_HORIZON_YEARS).step_by(DEMO_STEP_YEARS) {
        let age = (year - DEFAULT_START_YEAR) as f64;

        // [survival, total_tpa, sp1..sp4, si]
        let mut carbon = vec![0.0; width];
        carbon[0] = 0.004 * age;
        carbon[1] = 0.002 * age;
        carbon[6] = 0.003 * age;
        models.push(LinearRegressor {
            year,
            metric: ABOVEGROUND_CARBON.to_string(),
            coef: carbon,
            intercept: 0.0,
        });

        let mut basal_area = vec![0.0; width];
        basal_area[1] = 0.01 * age;
        models.push(LinearRegressor {
            year,
            metric: "BA".to_string(),
            coef: basal_area,
            intercept: 2.0,
        });
    }

    RegressionBundle {
        variant,
        loccode: DEMO_LOCCODE.to_string(),
        version: PERSISTENCE.models.version,
        models,
    }
}

fn main() -> Result<()> {
    // 1. Setup Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let demo = &PERSISTENCE.demo;
    let dir = PathBuf::from(demo.directory);
    let variant = Variant::default();

    log::info!("Writing demo inputs for variant {} into {:?}", variant, dir);

    // 2. Scenario from the variant preset
    let scenario = PlantingScenario::from_preset(variant, DEMO_NET_ACRES);
    save_json(&dir.join(demo.scenario_file), &scenario)?;

    // 3. Carbon models
    save_json(&dir.join(demo.coefficients_file), &demo_coefficients(variant))?;
    let bundle_path = dir
        .join(PERSISTENCE.models.directory)
        .join(model_bundle_filename(variant, DEMO_LOCCODE));
    save_json(&bundle_path, &demo_bundle(variant))?;

    // 4. Protocol rules and financial assumptions
    save_json(&dir.join(demo.protocol_rules_file), &ProtocolRules::default())?;
    let params = forest_carbon::ProformaParams {
        net_acres: DEMO_NET_ACRES,
        ..PROFORMA_DEFAULTS
    };
    save_json(&dir.join(demo.proforma_params_file), &params)?;

    log::info!("Done. Try:");
    log::info!(
        "   forest-carbon run --scenario {0}/{1} --coefficients {0}/{2} --params {0}/{3} --protocols GS,ISO",
        demo.directory,
        demo.scenario_file,
        demo.coefficients_file,
        demo.proforma_params_file
    );
    log::info!(
        "   forest-carbon carbon --loccode {} --models-dir {}/{}",
        DEMO_LOCCODE,
        demo.directory,
        PERSISTENCE.models.directory
    );

    Ok(())
}
