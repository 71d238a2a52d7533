mod interpolation;
mod maths_utils;
mod perf;
mod poly_features;

pub use interpolation::{Interpolant, InterpolationKind, MIN_CUBIC_POINTS};
pub use maths_utils::{first_difference, growth_factor, npv, round_to};
pub use poly_features::{polynomial_feature_count, polynomial_features};
