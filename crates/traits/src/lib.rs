pub mod measure;

pub use measure::{HeightProbe, InMemoryHeightProbe, ProbeError};
