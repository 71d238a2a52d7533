use serde::{Deserialize, Serialize};

/// One projected year for one protocol. JSON keys match the proforma CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProformaRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Protocol")]
    pub protocol_id: String,

    /// Carbon units per acre (input)
    #[serde(rename = "CU_ac")]
    pub units_per_acre: f64,
    /// Units generated by the whole project this year
    #[serde(rename = "CU")]
    pub units_available: f64,
    /// Units issued and sold; non-zero only on checkpoint years
    #[serde(rename = "CUs_Sold")]
    pub units_sold: f64,
    #[serde(rename = "CU_Credit_Price")]
    pub credit_price: f64,
    #[serde(rename = "Total_Revenue")]
    pub revenue: f64,

    #[serde(rename = "Validation_and_Verification")]
    pub validation_verification_cost: f64,
    #[serde(rename = "Survey_Cost")]
    pub survey_cost: f64,
    #[serde(rename = "Registry_Fees")]
    pub registry_fee: f64,
    #[serde(rename = "Issuance_Fees")]
    pub issuance_fee: f64,
    #[serde(rename = "Planting_Cost")]
    pub planting_cost: f64,
    #[serde(rename = "Seedling_Cost")]
    pub seedling_cost: f64,

    #[serde(rename = "Total_Costs")]
    pub total_cost: f64,
    #[serde(rename = "Net_Revenue")]
    pub net_revenue: f64,
}

/// Investment summary per protocol. JSON: `{Protocol, total_net, npv_yr20, npv_per_acre}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProformaSummary {
    #[serde(rename = "Protocol")]
    pub protocol_id: String,
    #[serde(rename = "total_net")]
    pub total_net_revenue: f64,
    #[serde(rename = "npv_yr20")]
    pub npv_at_year_20: f64,
    pub npv_per_acre: f64,
}

/// Rows for every protocol (sorted by protocol, then year) plus one summary per protocol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProformaOutput {
    pub proforma_rows: Vec<ProformaRow>,
    pub summaries: Vec<ProformaSummary>,
}
