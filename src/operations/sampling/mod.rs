mod sample_curve;

pub use sample_curve::{SampleCurve, DEFAULT_SAMPLE_STEP};
