// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub mod artifact;
pub mod counter;
pub mod deployment;
pub mod event;
pub mod lifecycle;
pub mod receipt;
pub mod resolver;
pub mod service;
pub mod verification;
