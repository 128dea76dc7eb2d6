use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no room fit on a {width}x{height} floor at depth {depth}")]
    NoRooms { width: i32, height: i32, depth: i32 },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("generation error: {source}")]
    Generation {
        #[from]
        source: GenerationError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown command {command:?} on line {line}")]
    UnknownCommand { line: usize, command: char },
}
