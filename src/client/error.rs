use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Authentication failed. Please check your credentials.")]
    AuthenticationFailed,

    #[error("Please log in to access the prediction functionalities.")]
    NotLoggedIn,

    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Error: {detail}")]
    Api { status: u16, detail: String },

    #[error("Internal Server Error: {0}")]
    Upload(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
