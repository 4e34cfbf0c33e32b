pub mod engine;

pub use engine::{EngineConfig, ProviderKind, DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH};
