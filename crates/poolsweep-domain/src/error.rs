use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid region: {0:?}")]
    InvalidRegion(String),

    #[error("invalid page token: {0:?}")]
    InvalidPageToken(String),

    #[error("invalid sweeper name: {0:?}")]
    InvalidSweeperName(String),
}
