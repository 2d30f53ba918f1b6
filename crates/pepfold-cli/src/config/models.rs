use pepfold::engine::config::FoldConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub sequence: String,
    pub output_path: PathBuf,
    pub core_config: FoldConfig,
}
