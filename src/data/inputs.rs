use {
    crate::analysis::{CoefficientTable, RegressionBundle},
    crate::config::{PERSISTENCE, ProformaParams, ProtocolRules, Variant, model_bundle_filename},
    crate::domain::PlantingScenario,
    anyhow::{Context, Result, bail},
    serde::{Serialize, de::DeserializeOwned},
    std::collections::BTreeMap,
    std::fs::{self, File},
    std::io::{BufReader, BufWriter, Write},
    std::path::{Path, PathBuf},
};

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Pretty-printed JSON. Parent directories are created as needed.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

pub fn load_coefficients(path: &Path) -> Result<CoefficientTable> {
    let table: CoefficientTable = load_json(path)?;
    if table.0.is_empty() {
        log::warn!("[data] coefficient table {} has no years", path.display());
    }
    Ok(table)
}

pub fn load_protocol_rules(path: &Path) -> Result<ProtocolRules> {
    load_json(path)
}

pub fn load_proforma_params(path: &Path) -> Result<ProformaParams> {
    load_json(path)
}

/// Reads a scenario in either shape:
/// - structured `{variant, survival, si, species_tpa: {..}, net_acres}`
/// - flat `{variant?, tpa_df, tpa_rc, survival, si}`
///
/// `variant_override` wins over any variant named in the file.
pub fn load_scenario(path: &Path, variant_override: Option<Variant>) -> Result<PlantingScenario> {
    let raw: serde_json::Value = load_json(path)?;
    let Some(object) = raw.as_object() else {
        bail!("Scenario file {} must contain a JSON object", path.display());
    };

    let mut scenario = if object.contains_key("species_tpa") {
        serde_json::from_value::<PlantingScenario>(raw.clone())
            .with_context(|| format!("Invalid scenario in {}", path.display()))?
    } else {
        let variant = object
            .get("variant")
            .and_then(|v| v.as_str())
            .map(Variant::resolve)
            .unwrap_or_default();

        let mut inputs = BTreeMap::new();
        for (key, value) in object.iter().filter(|(k, _)| k.as_str() != "variant") {
            let Some(number) = value.as_f64() else {
                bail!("Scenario input '{}' in {} is not a number", key, path.display());
            };
            inputs.insert(key.clone(), number);
        }
        PlantingScenario::from_flat_inputs(variant_override.unwrap_or(variant), &inputs)
            .with_context(|| format!("Invalid scenario in {}", path.display()))?
    };

    if let Some(variant) = variant_override {
        scenario.variant = variant;
    }
    scenario.validate()?;
    Ok(scenario)
}

pub fn model_bundle_path(dir: Option<&Path>, variant: Variant, loccode: &str) -> PathBuf {
    let dir = dir.unwrap_or_else(|| Path::new(PERSISTENCE.models.directory));
    dir.join(model_bundle_filename(variant, loccode))
}

/// Loads `{variant}_v{version}_{loccode}_models.json` from `dir` (default `models/`).
pub fn load_model_bundle(dir: Option<&Path>, variant: Variant, loccode: &str) -> Result<RegressionBundle> {
    let path = model_bundle_path(dir, variant, loccode);
    let bundle: RegressionBundle =
        load_json(&path).with_context(|| format!("No usable yield models for {} / {}", variant, loccode))?;

    if bundle.variant != variant || bundle.loccode != loccode {
        log::warn!(
            "[data] {} declares {} / {}, expected {} / {}",
            path.display(),
            bundle.variant,
            bundle.loccode,
            variant,
            loccode
        );
    }
    log::info!("[data] loaded {} yield models from {}", bundle.models.len(), path.display());
    Ok(bundle)
}
