pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed taxonomy: {message}")]
    MalformedTaxonomy { message: String },

    #[error("Invalid chart config: {message}")]
    InvalidConfig { message: String },

    #[error("taxonomy JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
