pub mod schema;

pub use schema::{
    Config, ControlConfig, EngineConfig, GenerationConfig, LimiterConfig, ObservabilityConfig,
    StorageConfig, TrackingConfig,
};
