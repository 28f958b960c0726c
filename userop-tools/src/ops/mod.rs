// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! High-level operations, one per action the CLI exposes.
//!
//! Each operation is a small configuration of the same pipeline: which calls to submit, and what
//! to check once they are confirmed.

pub mod counter;
pub mod deploy;

pub use counter::counter;
pub use deploy::{deploy, deploy_proxy, DeploymentOutcome, ProxyDeployment};
