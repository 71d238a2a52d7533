//! File locations and naming conventions for inputs and yield-model bundles.
use crate::config::Variant;

/// Configuration for yield-model bundles
pub struct ModelPersistenceConfig {
    /// Directory holding `{variant}_v{version}_{loccode}_models.json` bundles
    pub directory: &'static str,
    /// Current model bundle version
    pub version: u32,
}

/// Configuration for demo input files
pub struct DemoPersistenceConfig {
    pub directory: &'static str,
    pub scenario_file: &'static str,
    pub coefficients_file: &'static str,
    pub protocol_rules_file: &'static str,
    pub proforma_params_file: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub models: ModelPersistenceConfig,
    pub demo: DemoPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    models: ModelPersistenceConfig {
        directory: "models",
        version: 3,
    },
    demo: DemoPersistenceConfig {
        directory: "demo",
        scenario_file: "scenario.json",
        coefficients_file: "carbon_model_coefficients.json",
        protocol_rules_file: "protocol_rules.json",
        proforma_params_file: "proforma_presets.json",
    },
};

/// Model bundle filename for a variant / location code.
/// Example: "PN_v3_603_models.json"
pub fn model_bundle_filename(variant: Variant, loccode: &str) -> String {
    format!(
        "{}_v{}_{}_models.json",
        variant, PERSISTENCE.models.version, loccode
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_filename_convention() {
        assert_eq!(model_bundle_filename(Variant::PN, "603"), "PN_v3_603_models.json");
        assert_eq!(model_bundle_filename(Variant::EC, "DEMO"), "EC_v3_DEMO_models.json");
    }
}
