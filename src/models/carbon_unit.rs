use serde::{Deserialize, Serialize};

/// Tradable carbon units for one (protocol, year), tons CO2e per acre.
/// JSON keys follow the converter output: `{Year, Protocol, delta_project, delta_baseline, C_total, BUF, CU}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonUnitRecord {
    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Protocol")]
    pub protocol_id: String,

    #[serde(default)]
    pub delta_project: f64,

    /// Always 0: the baseline is a flat zero-sequestration counterfactual.
    #[serde(default)]
    pub delta_baseline: f64,

    #[serde(rename = "C_total", default)]
    pub net_delta: f64,

    #[serde(rename = "BUF", default)]
    pub buffer_amount: f64,

    #[serde(rename = "CU")]
    pub carbon_units: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_minimal_rows() {
        // Proforma requests only carry {Year, CU, Protocol}
        let r: CarbonUnitRecord =
            serde_json::from_str(r#"{"Year": 2030, "CU": 8.5, "Protocol": "GS"}"#).unwrap();
        assert_eq!(r.protocol_id, "GS");
        assert_eq!(r.carbon_units, 8.5);
        assert_eq!(r.net_delta, 0.0);
    }
}
