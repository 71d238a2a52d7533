mod inputs;
mod requests;

pub use {
    inputs::{
        load_coefficients, load_json, load_model_bundle, load_proforma_params, load_protocol_rules,
        load_scenario, model_bundle_path, save_json,
    },
    requests::{ProformaRequest, UnitsRequest},
};
