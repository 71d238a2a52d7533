use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Variant;
use crate::config::constants::planting::MODEL_SPECIES_SLOTS;
use crate::error::{CarbonError, CarbonResult};

fn default_net_acres() -> f64 {
    1.0
}

/// Planting inputs for one what-if scenario.
///
/// Species are keyed by the variant's species codes (e.g. `DF`, `WH`). The set of
/// allowed codes is fixed per variant rather than discovered from input keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingScenario {
    #[serde(default)]
    pub variant: Variant,

    /// Seedling survival, percent in [0, 100]
    #[serde(rename = "survival", alias = "survival_pct")]
    pub survival_pct: f64,

    #[serde(rename = "si", alias = "site_index")]
    pub site_index: f64,

    /// Trees per acre by species code
    pub species_tpa: BTreeMap<String, f64>,

    /// Defaults to 1 acre, i.e. per-acre results.
    #[serde(default = "default_net_acres")]
    pub net_acres: f64,
}

impl PlantingScenario {
    /// The preset planting for a variant.
    pub fn from_preset(variant: Variant, net_acres: f64) -> Self {
        let preset = variant.preset();
        let species_tpa = preset
            .species
            .iter()
            .zip(preset.default_tpa)
            .map(|(code, tpa)| (code.to_string(), tpa))
            .collect();

        Self {
            variant,
            survival_pct: preset.survival,
            site_index: preset.site_index,
            species_tpa,
            net_acres,
        }
    }

    /// Builds a scenario from flat inputs such as
    /// `{"tpa_df": 50, "tpa_rc": 20, "survival": 70, "si": 120}`.
    /// Every `tpa_<code>` key must name one of the variant's species slots.
    pub fn from_flat_inputs(variant: Variant, inputs: &BTreeMap<String, f64>) -> CarbonResult<Self> {
        let mut species_tpa = BTreeMap::new();
        let mut survival = None;
        let mut site_index = None;
        let mut net_acres = default_net_acres();

        for (key, &value) in inputs {
            let lower = key.to_ascii_lowercase();
            if let Some(code) = lower.strip_prefix("tpa_") {
                let slot = variant.slot_of(code).ok_or_else(|| {
                    CarbonError::InvalidScenario(format!(
                        "species '{}' is not a {} species (expected one of {:?})",
                        code.to_ascii_uppercase(),
                        variant,
                        variant.species()
                    ))
                })?;
                species_tpa.insert(variant.species()[slot].to_string(), value);
                continue;
            }
            match lower.as_str() {
                "survival" | "survival_pct" => survival = Some(value),
                "si" | "site_index" => site_index = Some(value),
                "net_acres" => net_acres = value,
                _ => {
                    return Err(CarbonError::InvalidScenario(format!(
                        "unexpected input '{}'",
                        key
                    )));
                }
            }
        }

        let scenario = Self {
            variant,
            survival_pct: survival
                .ok_or_else(|| CarbonError::InvalidScenario("missing 'survival'".to_string()))?,
            site_index: site_index
                .ok_or_else(|| CarbonError::InvalidScenario("missing 'si'".to_string()))?,
            species_tpa,
            net_acres,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> CarbonResult<()> {
        if !self.survival_pct.is_finite() || !(0.0..=100.0).contains(&self.survival_pct) {
            return Err(CarbonError::InvalidScenario(format!(
                "survival must be within [0, 100] (got {})",
                self.survival_pct
            )));
        }
        if !self.site_index.is_finite() || self.site_index <= 0.0 {
            return Err(CarbonError::InvalidScenario(format!(
                "site index must be > 0 (got {})",
                self.site_index
            )));
        }
        if !self.net_acres.is_finite() || self.net_acres <= 0.0 {
            return Err(CarbonError::NonPositiveAcres(self.net_acres));
        }
        let mut seen = [false; MODEL_SPECIES_SLOTS];
        for (code, &tpa) in &self.species_tpa {
            let Some(slot) = self.variant.slot_of(code) else {
                return Err(CarbonError::InvalidScenario(format!(
                    "species '{}' is not a {} species",
                    code, self.variant
                )));
            };
            // Keys differing only by case would be summed into the total but read once per slot
            if std::mem::replace(&mut seen[slot], true) {
                return Err(CarbonError::InvalidScenario(format!(
                    "species '{}' is given more than once",
                    self.variant.species()[slot]
                )));
            }
            if !tpa.is_finite() || tpa < 0.0 {
                return Err(CarbonError::InvalidScenario(format!(
                    "TPA for {} must be >= 0 (got {})",
                    code, tpa
                )));
            }
        }

        if self.exceeds_tpa_cap() {
            log::warn!(
                "[scenario] Total initial TPA {} exceeds {} and may present an unrealistic scenario.",
                self.total_tpa(),
                self.variant.preset().tpa_cap
            );
        }
        for (name, value, (lo, hi)) in self.advisory_violations() {
            log::warn!(
                "[scenario] {} {} is outside the usual {} range [{}, {}].",
                name,
                value,
                self.variant,
                lo,
                hi
            );
        }
        Ok(())
    }

    /// Inputs outside the preset's advisory ranges, as (name, value, range).
    pub fn advisory_violations(&self) -> Vec<(&'static str, f64, (f64, f64))> {
        let preset = self.variant.preset();
        [
            ("survival", self.survival_pct, preset.survival_range),
            ("site index", self.site_index, preset.site_index_range),
        ]
        .into_iter()
        .filter(|(_, value, (lo, hi))| !(*lo..=*hi).contains(value))
        .collect()
    }

    /// Sum of all species TPA. Informational; not a hard constraint.
    pub fn total_tpa(&self) -> f64 {
        self.species_tpa.values().sum()
    }

    pub fn exceeds_tpa_cap(&self) -> bool {
        self.total_tpa() > self.variant.preset().tpa_cap
    }

    /// TPA for a species code (case-insensitive). Unplanted species are 0.
    pub fn tpa_of(&self, code: &str) -> f64 {
        self.species_tpa
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(code))
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    /// TPA in the variant's fixed model slot order (sp1..sp4).
    pub fn slot_tpa(&self) -> CarbonResult<[f64; MODEL_SPECIES_SLOTS]> {
        let species = self.variant.species();
        if species.len() < MODEL_SPECIES_SLOTS {
            return Err(CarbonError::InsufficientFeatures {
                variant: self.variant.to_string(),
                required: MODEL_SPECIES_SLOTS,
                found: species.len(),
            });
        }
        let mut slots = [0.0; MODEL_SPECIES_SLOTS];
        for (slot, code) in slots.iter_mut().zip(species) {
            *slot = self.tpa_of(code);
        }
        Ok(slots)
    }

    /// Raw yield-model inputs: `[survival, total_tpa, sp1, sp2, sp3, sp4, si]`.
    pub fn feature_vector(&self) -> CarbonResult<[f64; 7]> {
        let [sp1, sp2, sp3, sp4] = self.slot_tpa()?;
        Ok([
            self.survival_pct,
            self.total_tpa(),
            sp1,
            sp2,
            sp3,
            sp4,
            self.site_index,
        ])
    }
}
