use poolsweep_domain::{DomainError, Region, SweeperName};
use poolsweep_driver::ClientError;
use thiserror::Error;

/// Fatal termination of a sweep. Skips are not errors.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("error getting client: {0}")]
    Setup(#[source] ClientError),

    #[error("error retrieving user pools in {region}: {source}")]
    List {
        region: Region,
        #[source]
        source: ClientError,
    },

    #[error("error deleting user pool {name}: {source}")]
    Delete {
        name: String,
        id: String,
        #[source]
        source: ClientError,
    },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("sweeper '{0}' is already registered")]
    Duplicate(SweeperName),

    #[error("unknown sweeper '{0}'")]
    UnknownSweeper(String),

    #[error("sweeper '{sweeper}' depends on unknown sweeper '{dependency}'")]
    UnknownDependency { sweeper: SweeperName, dependency: SweeperName },

    #[error("dependency cycle involving sweeper '{0}'")]
    Cycle(SweeperName),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unexpected pre-check error: {0}")]
    PreCheck(#[source] ClientError),

    #[error("no user pool id set")]
    MissingId,

    #[error("error describing user pool {id}: {source}")]
    Describe {
        id: String,
        #[source]
        source: ClientError,
    },

    #[error("user pool {id} still exists")]
    StillExists { id: String },
}
