use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Grid shape mismatch for {layer}: expected {expected} tiles, got {actual}")]
    GridShape {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid grid dimensions: {cols}x{rows} with tile size {tile_size}")]
    InvalidDimensions {
        cols: i32,
        rows: i32,
        tile_size: f32,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl From<&str> for SimError {
    fn from(msg: &str) -> Self {
        SimError::Config(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
