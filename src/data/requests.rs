//! JSON request bodies for the individual stages. Key names follow the
//! established service payloads so existing request files load unchanged.

use serde::{Deserialize, Serialize};

use crate::config::{ProformaParams, ProtocolRules};
use crate::models::{CarbonRecord, CarbonUnitRecord};

/// `{carbon_rows: [{Year, C_Score}], protocols: [..], protocol_rules?: {..}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsRequest {
    pub carbon_rows: Vec<CarbonRecord>,
    pub protocols: Vec<String>,
    #[serde(default)]
    pub protocol_rules: Option<ProtocolRules>,
}

/// `{df_ert_ac: [{Year, CU, Protocol}], params: {..}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProformaRequest {
    #[serde(rename = "df_ert_ac", alias = "cu_rows")]
    pub cu_rows: Vec<CarbonUnitRecord>,
    #[serde(default)]
    pub params: ProformaParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_request_payload() {
        let json = r#"{
            "carbon_rows": [{"Year": 2024, "C_Score": 0.0}, {"Year": 2029, "C_Score": 12.5}],
            "protocols": ["GS"],
            "protocol_rules": {"GS": {"BUF": 0.1, "coeff": 1.0, "apply_buf": true}}
        }"#;
        let req: UnitsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.carbon_rows[1].cumulative_score, 12.5);
        let rules = req.protocol_rules.unwrap();
        assert_eq!(rules.get("GS").unwrap().buffer_fraction, 0.1);
    }

    #[test]
    fn test_proforma_request_payload() {
        let json = r#"{
            "df_ert_ac": [{"Year": 2025, "CU": 3.2, "Protocol": "ISO"}],
            "params": {"net_acres": 250, "year_start": 2025}
        }"#;
        let req: ProformaRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.cu_rows[0].carbon_units, 3.2);
        assert_eq!(req.params.net_acres, 250.0);
        assert_eq!(req.params.project_start_year, 2025);
    }
}
