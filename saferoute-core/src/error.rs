use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Malformed transit payload: {0}")]
    TransitPayload(String),
}

impl From<geojson::Error> for Error {
    fn from(error: geojson::Error) -> Self {
        Error::GeoJsonError(error.to_string())
    }
}
