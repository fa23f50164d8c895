/// Typed failures of the use-case layer. The REST boundary translates each
/// kind into its status code and `{code, message}` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid name")]
    InvalidName,
    #[error("Map not found")]
    MapNotFound,
    #[error("Player token has not been found")]
    UnknownToken,
    #[error("Record page size exceeds {}", fd_core::RECORDS_PAGE_LIMIT)]
    PageLimit,
    #[error(transparent)]
    Store(anyhow::Error),
}

impl AppError {
    /// Machine-readable error code of the REST contract.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "invalidArgument",
            Self::MapNotFound => "mapNotFound",
            Self::UnknownToken => "unknownToken",
            Self::PageLimit => "invalidArgument",
            Self::Store(_) => "internalError",
        }
    }
}
