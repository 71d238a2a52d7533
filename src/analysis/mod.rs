// The three pipeline stages plus the yield model seam
pub mod carbon_estimator;
pub mod proforma_engine;
pub mod unit_converter;
pub mod yield_model;

pub use {
    carbon_estimator::{
        CarbonEstimate, CarbonEstimator, CarbonSource, CoefficientRow, CoefficientTable, estimate_carbon,
    },
    proforma_engine::{ProformaEngine, checkpoint_rows, compute_proforma},
    unit_converter::{UnitConverter, convert_to_units},
    yield_model::{LinearRegressor, RegressionBundle, YieldPredictor},
};
