// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Tools for deploying and driving contracts through account-abstraction user operations.
//!
//! The pipeline is split the same way the operations flow:
//!
//! - [`core::deployment`] builds salted payloads for a deterministic deployment factory,
//! - [`core::lifecycle`] submits calls to an [`AbstractionService`] and waits for confirmation,
//! - [`core::resolver`] recovers the deployed address from the confirmed transaction's logs,
//! - [`core::verification`] checks the state delta produced by a mutating call.
//!
//! [`AbstractionService`]: core::service::AbstractionService

#[macro_use]
mod macros;

pub mod core;
pub(crate) mod error;
pub mod ops;
pub mod utils;

pub use error::{Error, Result};
