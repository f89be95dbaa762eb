#[derive(Debug, thiserror::Error)]
pub enum Happy8Error {
    #[error("Argument invalide : {0}")]
    InvalidArgument(String),

    /// La source de tirages n'a rien pu fournir. Le noyau ne réessaie jamais.
    #[error("Source de tirages indisponible : {0}")]
    UpstreamUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Happy8Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Happy8Error::InvalidArgument(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Happy8Error::UpstreamUnavailable(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Happy8Error::InvalidArgument(_))
    }
}

pub type Result<T, E = Happy8Error> = std::result::Result<T, E>;
