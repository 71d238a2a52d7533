//! Contract violations raised by the carbon, unit and proforma computations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CarbonError {
    #[error("Invalid planting scenario: {0}")]
    InvalidScenario(String),

    #[error("net_acres must be a finite value > 0 (got {0})")]
    NonPositiveAcres(f64),

    #[error("No protocols requested")]
    EmptyProtocolList,

    #[error("Year {year} appears more than once in {series}")]
    DuplicateYear { year: i32, series: String },

    #[error("Polynomial yield models need {required} species slots, variant {variant} has {found}")]
    InsufficientFeatures {
        variant: String,
        required: usize,
        found: usize,
    },

    #[error("Model for year {year} / {metric} expects {expected} features, got {found}")]
    FeatureLengthMismatch {
        year: i32,
        metric: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid proforma parameter `{field}`: {reason}")]
    InvalidParams { field: &'static str, reason: String },
}

pub type CarbonResult<T> = Result<T, CarbonError>;
