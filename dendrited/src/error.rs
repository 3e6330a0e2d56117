use dendrite::error::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file {path}: {detail}")]
    Config { path: String, detail: String },

    #[error("parameter file {path}: {cause}")]
    Params { path: String, cause: EngineError },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
