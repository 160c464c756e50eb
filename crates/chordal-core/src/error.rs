pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid flow record #{index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("Duplicate entity name: {name}")]
    DuplicateEntity { name: String },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("Flow records JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
