// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::core::{
    artifact::ArtifactError, deployment::EncodingError, event::EventParseError,
    lifecycle::LifecycleError, resolver::LookupError, service::ChainRpcError,
    verification::VerificationError,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Artifact(#[from] ArtifactError),
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("{0}")]
    Event(#[from] EventParseError),
    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),
    #[error("{0}")]
    Rpc(#[from] ChainRpcError),
    #[error("{0}")]
    Verification(#[from] VerificationError),
}
