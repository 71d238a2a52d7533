//! End-to-end checks of the scenario -> carbon -> units -> proforma chain.

use std::collections::BTreeMap;

use forest_carbon::analysis::{CoefficientRow, LinearRegressor, YieldPredictor, checkpoint_rows};
use forest_carbon::config::constants::planting::POLY_DEGREE;
use forest_carbon::config::{PROFORMA_DEFAULTS, ProtocolRule};
use forest_carbon::models::{CarbonRecord, CarbonUnitRecord, MetricTable};
use forest_carbon::utils::polynomial_feature_count;
use forest_carbon::{
    CarbonError, CarbonModelInput, CarbonSource, CoefficientTable, Pipeline, PipelineRequest, PlantingScenario,
    ProformaParams, ProtocolRules, RegressionBundle, Variant, compute_proforma, convert_to_units, estimate_carbon,
};

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn flat(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Coefficients every 5 years from 2029 to 2059 with steadily increasing weights.
fn five_year_table() -> CoefficientTable {
    let mut table = CoefficientTable::default();
    for (i, year) in (2029..=2059).step_by(5).enumerate() {
        let w = (i + 1) as f64;
        table.0.insert(
            year,
            CoefficientRow {
                tpa_total: 0.01 * w,
                survival: 0.02 * w,
                site_index: 0.01 * w,
                intercept: 0.5 * w,
                species: [("TPA_DF", 0.01 * w), ("TPA_WH", 0.008 * w), ("TPA_RC", 0.006 * w), ("TPA_SS", 0.004 * w)]
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
            },
        );
    }
    table
}

fn pn_scenario() -> PlantingScenario {
    PlantingScenario::from_flat_inputs(
        Variant::PN,
        &flat(&[
            ("tpa_df", 150.0),
            ("tpa_wh", 60.0),
            ("tpa_rc", 40.0),
            ("survival", 70.0),
            ("si", 120.0),
            ("net_acres", PROFORMA_DEFAULTS.net_acres),
        ]),
    )
    .unwrap()
}

#[test]
fn test_documented_linear_example() {
    let table: CoefficientTable = serde_json::from_str(
        r#"{"2025": {"TPA_DF": 0.1, "TPA_RC": 0.05, "TPA_WH": 0.05, "TPA_total": 0.02,
                     "Survival": 0.01, "SI": 0.01, "Intercept": 1.0}}"#,
    )
    .unwrap();
    let scenario = PlantingScenario::from_flat_inputs(
        Variant::PN,
        &flat(&[("tpa_df", 50.0), ("tpa_rc", 20.0), ("tpa_wh", 10.0), ("survival", 70.0), ("si", 120.0)]),
    )
    .unwrap();

    let records = estimate_carbon(&scenario, CarbonSource::Coefficients(&table)).unwrap();
    assert_eq!(records, vec![CarbonRecord { year: 2025, cumulative_score: 11.0, annual_score: 11.0 }]);
}

#[test]
fn test_carbon_monotone_and_additive() {
    let records = estimate_carbon(&pn_scenario(), CarbonSource::Coefficients(&five_year_table())).unwrap();
    assert_eq!(records.len(), 7);
    assert_eq!(records[0].annual_score, records[0].cumulative_score);
    for w in records.windows(2) {
        assert!(w[1].cumulative_score >= w[0].cumulative_score);
        assert!(approx(w[1].annual_score, w[1].cumulative_score - w[0].cumulative_score, 1e-3));
    }
}

#[test]
fn test_converter_examples_and_independence() {
    // CO2e rises by exactly 10 per year
    let carbon: Vec<CarbonRecord> = (0..4)
        .map(|i| CarbonRecord {
            year: 2024 + i,
            cumulative_score: 10.0 * i as f64 / 3.667,
            annual_score: 0.0,
        })
        .collect();
    let rules = ProtocolRules::default();

    let gs = convert_to_units(&carbon, &["GS"], &rules).unwrap();
    let acr = convert_to_units(&carbon, &["ACR/CAR/VERRA"], &rules).unwrap();

    let gs_units: Vec<f64> = gs.iter().map(|r| r.carbon_units).collect();
    let acr_units: Vec<f64> = acr.iter().map(|r| r.carbon_units).collect();
    assert_eq!(gs_units, vec![10.0, 10.0, 10.0]);
    assert_eq!(acr_units, vec![8.0, 8.0, 8.0]);

    let gs_delta: Vec<f64> = gs.iter().map(|r| r.delta_project).collect();
    let acr_delta: Vec<f64> = acr.iter().map(|r| r.delta_project).collect();
    assert_eq!(gs_delta, acr_delta);
}

#[test]
fn test_rule_overrides_fall_back_to_callers_default() {
    let carbon: Vec<CarbonRecord> = (0..4)
        .map(|i| CarbonRecord {
            year: 2030 + i,
            cumulative_score: 10.0 * i as f64 / 3.667,
            annual_score: 0.0,
        })
        .collect();

    let mut rules = ProtocolRules::new(BTreeMap::new());
    rules.insert("ACR/CAR/VERRA", ProtocolRule::buffered(0.5));
    let out = convert_to_units(&carbon, &["SOMETHING_ELSE"], &rules).unwrap();
    assert!(out.iter().all(|r| r.carbon_units == 5.0));

    // Without a caller fallback the built-in 20% applies
    let out = convert_to_units(&carbon, &["SOMETHING_ELSE"], &ProtocolRules::new(BTreeMap::new())).unwrap();
    assert!(out.iter().all(|r| r.carbon_units == 8.0));
}

#[test]
fn test_proforma_documented_example() {
    let cu: Vec<CarbonUnitRecord> = (0..10)
        .map(|i| CarbonUnitRecord {
            year: 2024 + i,
            protocol_id: "GS".to_string(),
            delta_project: 1.0,
            delta_baseline: 0.0,
            net_delta: 1.0,
            buffer_amount: 0.0,
            carbon_units: 1.0,
        })
        .collect();
    let params = ProformaParams {
        net_acres: 1000.0,
        initial_credit_price: 10.0,
        annual_price_growth_rate: 0.0,
        ..PROFORMA_DEFAULTS
    };

    let out = compute_proforma(&cu, &params).unwrap();
    let revenue: BTreeMap<i32, f64> = out.proforma_rows.iter().map(|r| (r.year, r.revenue)).collect();
    assert_eq!(revenue[&2024], 10_000.0);
    assert_eq!(revenue[&2029], 50_000.0);
    assert!(revenue.iter().filter(|(y, _)| ![2024, 2029].contains(*y)).all(|(_, r)| *r == 0.0));

    let years: Vec<i32> = checkpoint_rows(&out.proforma_rows, &params).iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2024, 2029]);
}

#[test]
fn test_full_pipeline_properties() {
    let request = PipelineRequest {
        scenario: pn_scenario(),
        carbon_model: CarbonModelInput::Coefficients(five_year_table()),
        protocols: vec!["ISO".to_string(), "GS".to_string(), "ACR/CAR/VERRA".to_string()],
        rules: None,
        params: PROFORMA_DEFAULTS,
        prepend_start_year: true,
    };
    let out = Pipeline::run(&request).unwrap();

    // Zero row at the start year, annual delta 0
    assert_eq!(out.carbon[0], CarbonRecord { year: 2024, cumulative_score: 0.0, annual_score: 0.0 });

    // Buffer bound
    for r in out.carbon_units.iter().filter(|r| r.net_delta >= 0.0) {
        assert!(r.carbon_units >= 0.0);
        assert!(r.carbon_units <= r.net_delta + 1e-9);
    }

    // Summaries in sorted protocol order, GS (no buffer) earns the most
    let ids: Vec<&str> = out.proforma.summaries.iter().map(|s| s.protocol_id.as_str()).collect();
    assert_eq!(ids, vec!["ACR/CAR/VERRA", "GS", "ISO"]);
    let npv: BTreeMap<&str, f64> = out
        .proforma
        .summaries
        .iter()
        .map(|s| (s.protocol_id.as_str(), s.npv_at_year_20))
        .collect();
    assert!(npv["GS"] > npv["ACR/CAR/VERRA"]);
    assert!(npv["ACR/CAR/VERRA"] > npv["ISO"]);

    // Horizon: nothing beyond 2059
    assert!(out.proforma.proforma_rows.iter().all(|r| r.year <= 2059));
}

#[test]
fn test_npv_scale_invariance_through_pipeline() {
    let base = PipelineRequest {
        scenario: pn_scenario(),
        carbon_model: CarbonModelInput::Coefficients(five_year_table()),
        protocols: vec!["GS".to_string()],
        rules: None,
        params: ProformaParams {
            registry_fee: 0.0,
            validation_cost: 0.0,
            verification_cost: 0.0,
            num_plots: 0.0,
            ..PROFORMA_DEFAULTS
        },
        prepend_start_year: true,
    };
    let mut doubled = base.clone();
    doubled.params.net_acres *= 2.0;
    doubled.scenario.net_acres *= 2.0;

    let a = &Pipeline::run(&base).unwrap().proforma.summaries[0];
    let b = &Pipeline::run(&doubled).unwrap().proforma.summaries[0];
    assert!(approx(b.total_net_revenue, 2.0 * a.total_net_revenue, 1e-6));
    assert!(approx(b.npv_at_year_20, 2.0 * a.npv_at_year_20, 1e-6));
    assert!(approx(b.npv_per_acre, a.npv_per_acre, 1e-9));
}

#[test]
fn test_repeated_protocol_not_double_counted() {
    let mut request = PipelineRequest {
        scenario: pn_scenario(),
        carbon_model: CarbonModelInput::Coefficients(five_year_table()),
        protocols: vec!["GS".to_string()],
        rules: None,
        params: PROFORMA_DEFAULTS,
        prepend_start_year: true,
    };
    let once = Pipeline::run(&request).unwrap();
    request.protocols = vec!["GS".to_string(), "GS".to_string()];
    let twice = Pipeline::run(&request).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_model_bundle_pipeline() {
    let width = polynomial_feature_count(7, POLY_DEGREE);
    let models = (1..=7)
        .map(|i| {
            let mut coef = vec![0.0; width];
            // carbon grows with total TPA
            coef[1] = 0.01 * i as f64;
            LinearRegressor {
                year: 2024 + 5 * i,
                metric: "ABLD_C".to_string(),
                coef,
                intercept: 0.0,
            }
        })
        .collect();
    let bundle = RegressionBundle {
        variant: Variant::PN,
        loccode: "603".to_string(),
        version: 3,
        models,
    };

    let metrics: MetricTable = bundle.predict(&pn_scenario().feature_vector().unwrap()).unwrap();
    assert_eq!(metrics.get(2029, "ABLD_C"), Some(2.5));

    let request = PipelineRequest {
        scenario: pn_scenario(),
        carbon_model: CarbonModelInput::Model(bundle),
        protocols: vec!["GS".to_string()],
        rules: None,
        params: PROFORMA_DEFAULTS,
        prepend_start_year: true,
    };
    let out = Pipeline::run(&request).unwrap();
    assert!(out.metrics.is_some());
    assert_eq!(out.carbon.len(), 8);
    assert_eq!(out.final_carbon(), Some((2059, 17.5)));
}

#[test]
fn test_contract_violations() {
    let mut request = PipelineRequest {
        scenario: pn_scenario(),
        carbon_model: CarbonModelInput::Coefficients(five_year_table()),
        protocols: vec![],
        rules: None,
        params: PROFORMA_DEFAULTS,
        prepend_start_year: false,
    };
    assert_eq!(Pipeline::run(&request), Err(CarbonError::EmptyProtocolList));

    request.protocols = vec!["GS".to_string()];
    request.params.net_acres = 0.0;
    assert_eq!(Pipeline::run(&request), Err(CarbonError::NonPositiveAcres(0.0)));

    let err = PlantingScenario::from_flat_inputs(Variant::EC, &flat(&[("tpa_ss", 10.0), ("survival", 70.0), ("si", 120.0)]))
        .unwrap_err();
    assert!(matches!(err, CarbonError::InvalidScenario(_)));
}
