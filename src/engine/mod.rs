mod pipeline;

pub use pipeline::{CarbonModelInput, Pipeline, PipelineOutput, PipelineRequest};
