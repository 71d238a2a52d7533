//! Configuration module for the forest carbon model.

// Can all be private now because we have a public re-export.
mod debug;
mod persistence;
mod proforma;
mod protocol;
mod variant;

// Public
pub mod constants;

// Re-export commonly used items
pub use debug::DF;
pub use persistence::{
    PERSISTENCE, model_bundle_filename,
};
pub use proforma::{OneTimeCostTiming, PROFORMA_DEFAULTS, ProformaParams};
pub use protocol::{DEFAULT_PROTOCOL_RULES, KnownProtocol, ProtocolRule, ProtocolRules};
pub use variant::{VARIANTS, Variant, VariantPreset};
