//! FVS variant presets: the species slots each regional growth model was trained on.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::constants::planting::{
    DEFAULT_SITE_INDEX, DEFAULT_SURVIVAL, SITE_INDEX_RANGE, SURVIVAL_RANGE, TPA_CAP,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Variant {
    /// Pacific Northwest Coast
    #[default]
    PN,
    /// East Cascades
    EC,
}

/// Default planting for a variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantPreset {
    pub variant: Variant,
    /// Species codes in model feature order. The order is significant: the trained
    /// yield models read sp1..sp4 positionally.
    pub species: [&'static str; 4],
    pub default_tpa: [f64; 4],
    pub survival: f64,
    pub site_index: f64,
    pub tpa_cap: f64,
    /// Advisory bounds. Inputs outside them are accepted with a warning.
    pub survival_range: (f64, f64),
    pub site_index_range: (f64, f64),
}

pub const VARIANTS: &[VariantPreset] = &[
    VariantPreset {
        variant: Variant::PN,
        species: ["DF", "WH", "RC", "SS"],
        default_tpa: [200.0, 80.0, 50.0, 0.0],
        survival: DEFAULT_SURVIVAL,
        site_index: DEFAULT_SITE_INDEX,
        tpa_cap: TPA_CAP,
        survival_range: SURVIVAL_RANGE,
        site_index_range: SITE_INDEX_RANGE,
    },
    VariantPreset {
        variant: Variant::EC,
        species: ["PP", "DF", "WL", "PM"],
        default_tpa: [150.0, 100.0, 50.0, 0.0],
        survival: DEFAULT_SURVIVAL,
        site_index: DEFAULT_SITE_INDEX,
        tpa_cap: TPA_CAP,
        survival_range: SURVIVAL_RANGE,
        site_index_range: SITE_INDEX_RANGE,
    },
];

impl Variant {
    /// Parses a variant name, falling back to PN for anything unrecognised.
    pub fn resolve(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            log::warn!(
                "[variant] '{}' not found in presets ({}). Falling back to 'PN'.",
                name,
                Variant::iter().join(", ")
            );
            Variant::PN
        })
    }

    pub fn preset(self) -> &'static VariantPreset {
        match self {
            Variant::PN => &VARIANTS[0],
            Variant::EC => &VARIANTS[1],
        }
    }

    pub fn species(self) -> &'static [&'static str] {
        &self.preset().species
    }

    /// Slot index of a species code (case-insensitive).
    pub fn slot_of(self, code: &str) -> Option<usize> {
        self.species()
            .iter()
            .position(|s| s.eq_ignore_ascii_case(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_line_up_with_enum() {
        for v in Variant::iter() {
            assert_eq!(v.preset().variant, v);
            assert_eq!(v.species().len(), 4);
        }
    }

    #[test]
    fn test_resolve_falls_back_to_pn() {
        assert_eq!(Variant::resolve("ec"), Variant::EC);
        assert_eq!(Variant::resolve("ZZ"), Variant::PN);
    }

    #[test]
    fn test_species_order() {
        assert_eq!(Variant::PN.slot_of("rc"), Some(2));
        assert_eq!(Variant::EC.slot_of("PP"), Some(0));
        assert_eq!(Variant::EC.slot_of("RC"), None);
    }
}
