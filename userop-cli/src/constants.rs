// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

/// The default endpoint for chain reads.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8545";

/// The default endpoint of the EIP-5792 wallet submitting user operations.
pub const DEFAULT_WALLET_ENDPOINT: &str = "http://localhost:4337";
