pub mod aws;
pub mod classify;
pub mod client;
pub mod error;
pub mod fixture;
pub mod local;

pub use aws::{CognitoClient, CognitoClientFactory};
pub use classify::classify;
pub use client::{ClientFactory, DirectoryClient};
pub use error::ClientError;
pub use fixture::UserPoolFixture;
pub use local::{Call, InMemoryDirectory, InMemoryFactory};
