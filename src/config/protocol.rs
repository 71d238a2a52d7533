//! Carbon accounting protocol rules (buffer pool deductions and conversion factors).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::constants::CO2_PER_CARBON;

/// Protocols with a built-in rule. Requests may name any string; unknown names
/// resolve to the `AcrCarVerra` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum KnownProtocol {
    #[strum(serialize = "ACR/CAR/VERRA")]
    AcrCarVerra,
    #[strum(serialize = "GS")]
    Gs,
    #[strum(serialize = "ISO")]
    Iso,
}

impl KnownProtocol {
    pub const FALLBACK: Self = Self::AcrCarVerra;

    pub const fn default_rule(self) -> ProtocolRule {
        match self {
            Self::AcrCarVerra => ProtocolRule::buffered(0.20),
            Self::Gs => ProtocolRule::unbuffered(),
            Self::Iso => ProtocolRule::buffered(0.25),
        }
    }
}

fn default_coefficient() -> f64 {
    1.0
}

fn default_co2_factor() -> f64 {
    CO2_PER_CARBON
}

/// One protocol's conversion rule.
/// JSON keys follow the rules file: `{"BUF": 0.2, "coeff": 1.0, "apply_buf": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolRule {
    /// Fraction of net sequestration withheld in the risk pool, in [0, 1).
    #[serde(rename = "BUF", default)]
    pub buffer_fraction: f64,

    #[serde(rename = "apply_buf")]
    pub buffer_applies: bool,

    /// Protocol-specific scaling on CO2e (currently 1.0 everywhere).
    #[serde(rename = "coeff", default = "default_coefficient")]
    pub protocol_coefficient: f64,

    #[serde(default = "default_co2_factor")]
    pub co2_conversion_factor: f64,
}

impl ProtocolRule {
    pub const fn buffered(buffer_fraction: f64) -> Self {
        Self {
            buffer_fraction,
            buffer_applies: true,
            protocol_coefficient: 1.0,
            co2_conversion_factor: CO2_PER_CARBON,
        }
    }

    pub const fn unbuffered() -> Self {
        Self {
            buffer_fraction: 0.0,
            buffer_applies: false,
            protocol_coefficient: 1.0,
            co2_conversion_factor: CO2_PER_CARBON,
        }
    }

    /// Buffer withheld from `net_delta` under this rule.
    #[inline]
    pub fn buffer_for(&self, net_delta: f64) -> f64 {
        if self.buffer_applies {
            net_delta * self.buffer_fraction
        } else {
            0.0
        }
    }

    /// Tons C -> tons CO2e for this protocol.
    #[inline]
    pub fn to_co2e(&self, carbon: f64) -> f64 {
        carbon * self.co2_conversion_factor * self.protocol_coefficient
    }
}

pub const DEFAULT_PROTOCOL_RULES: &[(KnownProtocol, ProtocolRule)] = &[
    (KnownProtocol::AcrCarVerra, KnownProtocol::AcrCarVerra.default_rule()),
    (KnownProtocol::Gs, KnownProtocol::Gs.default_rule()),
    (KnownProtocol::Iso, KnownProtocol::Iso.default_rule()),
];

/// A rule set keyed by protocol id. Either the built-in table or a caller override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolRules(BTreeMap<String, ProtocolRule>);

impl Default for ProtocolRules {
    fn default() -> Self {
        Self(
            DEFAULT_PROTOCOL_RULES
                .iter()
                .map(|(p, r)| (p.to_string(), *r))
                .collect(),
        )
    }
}

impl ProtocolRules {
    pub fn new(rules: BTreeMap<String, ProtocolRule>) -> Self {
        Self(rules)
    }

    pub fn insert(&mut self, protocol: impl Into<String>, rule: ProtocolRule) {
        self.0.insert(protocol.into(), rule);
    }

    pub fn get(&self, protocol: &str) -> Option<&ProtocolRule> {
        self.0.get(protocol)
    }

    /// Rule for `protocol`. Unknown ids silently take the ACR/CAR/VERRA rule:
    /// first from this set, else the built-in one.
    pub fn resolve(&self, protocol: &str) -> ProtocolRule {
        if let Some(rule) = self.0.get(protocol) {
            return *rule;
        }
        log::warn!(
            "[protocol] no rule for '{}', falling back to {}",
            protocol,
            KnownProtocol::FALLBACK
        );
        self.0
            .get(&KnownProtocol::FALLBACK.to_string())
            .copied()
            .unwrap_or(KnownProtocol::FALLBACK.default_rule())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProtocolRule)> {
        self.0.iter()
    }
}
