pub mod analysis_config;
mod loader;

pub use analysis_config::AnalysisConfig;
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from, parse_config,
    CONFIG_FILE_NAME,
};
