pub mod config_errors;
pub mod design;
pub mod raider_x;

pub use config_errors::ConfigError;
pub use design::RawDesignParameters;
pub use raider_x::RaiderX;
